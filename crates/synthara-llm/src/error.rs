use http::StatusCode;
use synthara_core::{HttpError, upstream_status};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur while calling the language model
#[derive(Debug, Error)]
pub enum LlmError {
    /// The model server could not be reached
    #[error("connection error: {0}")]
    Connection(String),

    /// The model server returned a non-success status
    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// The model server answered with a body we could not read
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Adapter could not be built from configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Build an error from a failed HTTP call
    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_decode() {
            Self::InvalidResponse(error.to_string())
        } else {
            Self::Connection(error.to_string())
        }
    }
}

impl HttpError for LlmError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Connection(_) | Self::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            Self::Upstream { status, .. } => upstream_status(*status),
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Connection(_) | Self::Upstream { .. } | Self::InvalidResponse(_) => "llm_error",
            Self::Config(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Upstream { .. } => "the language model backend rejected the request".to_owned(),
            Self::Config(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}
