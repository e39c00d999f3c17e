use http::StatusCode;
use synthara_core::{HttpError, upstream_status};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImageGenError>;

/// Image generation errors with appropriate HTTP status codes
#[derive(Debug, Error)]
pub enum ImageGenError {
    /// Provider API returned an error
    #[error("image provider error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// Network or connection error
    #[error("connection error: {0}")]
    ConnectionError(String),

    /// Provider answered without usable image data
    #[error("invalid image response: {0}")]
    InvalidResponse(String),

    /// Writing the image failed
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl HttpError for ImageGenError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ConnectionError(_) | Self::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            Self::ProviderApiError { status, .. } => upstream_status(*status),
            Self::Io(_) | Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::ConnectionError(_) | Self::ProviderApiError { .. } | Self::InvalidResponse(_) => "imagegen_error",
            Self::Io(_) | Self::ConfigError(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::ProviderApiError { .. } => "the image backend rejected the request".to_string(),
            Self::Io(_) | Self::ConfigError(_) => "an internal error occurred".to_string(),
            _ => self.to_string(),
        }
    }
}
