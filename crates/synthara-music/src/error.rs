use http::StatusCode;
use synthara_core::{HttpError, upstream_status};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MusicError>;

/// Music synthesis errors
#[derive(Debug, Error)]
pub enum MusicError {
    /// The backend could not be reached
    #[error("connection error: {0}")]
    Connection(String),

    /// The HTTP backend returned a non-success status
    #[error("music backend error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// The generation daemon reported a failure
    #[error("generation failed: {0}")]
    Generation(String),

    /// The backend sent something we could not understand
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Generation did not finish in time
    #[error("generation timed out after {0}s")]
    Timeout(u64),

    /// Writing the waveform failed
    #[error("failed to write audio: {0}")]
    Io(#[from] std::io::Error),

    /// Backend could not be built from configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl HttpError for MusicError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Connection(_) | Self::Generation(_) | Self::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            Self::Upstream { status, .. } => upstream_status(*status),
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Io(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Io(_) | Self::Config(_) => "internal_error",
            _ => "music_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Upstream { .. } => "the music backend rejected the request".to_owned(),
            Self::Io(_) | Self::Config(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}
