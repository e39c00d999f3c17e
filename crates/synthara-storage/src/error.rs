use http::StatusCode;
use synthara_core::HttpError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Artifact storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The object store rejected or failed the upload
    #[error("upload of `{key}` failed: {message}")]
    Upload { key: String, message: String },

    /// Reading or copying the local file failed
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend could not be built from configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl HttpError for StorageError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Upload { .. } => StatusCode::BAD_GATEWAY,
            Self::Io(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Upload { .. } => "storage_error",
            Self::Io(_) | Self::Config(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Upload { key, .. } => format!("failed to store artifact `{key}`"),
            Self::Io(_) | Self::Config(_) => "an internal error occurred".to_owned(),
        }
    }
}
