use http::StatusCode;
use synthara_core::HttpError;
use synthara_imagegen::ImageGenError;
use synthara_llm::LlmError;
use synthara_music::MusicError;
use synthara_storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failure of any generation stage
///
/// Every stage aborts the request; there is no partial result.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Music(#[from] MusicError),

    #[error(transparent)]
    ImageGen(#[from] ImageGenError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Scratch directory or file handling failed
    #[error("scratch I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The generation slots were closed
    #[error("generation capacity is unavailable")]
    Unavailable,
}

impl HttpError for PipelineError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Llm(e) => e.status_code(),
            Self::Music(e) => e.status_code(),
            Self::ImageGen(e) => e.status_code(),
            Self::Storage(e) => e.status_code(),
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Llm(e) => e.error_type(),
            Self::Music(e) => e.error_type(),
            Self::ImageGen(e) => e.error_type(),
            Self::Storage(e) => e.error_type(),
            Self::Io(_) => "internal_error",
            Self::Unavailable => "unavailable",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Llm(e) => e.client_message(),
            Self::Music(e) => e.client_message(),
            Self::ImageGen(e) => e.client_message(),
            Self::Storage(e) => e.client_message(),
            Self::Io(_) => "an internal error occurred".to_owned(),
            Self::Unavailable => "the service is shutting down".to_owned(),
        }
    }
}
