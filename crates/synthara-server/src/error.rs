use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use synthara_core::HttpError;
use synthara_pipeline::PipelineError;

/// Handler error rendered as a JSON body
pub struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(error: PipelineError) -> Self {
        Self(error)
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    message: String,
    r#type: String,
    code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "request failed");
        } else {
            tracing::warn!(error = %self.0, status = status.as_u16(), "request rejected");
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                message: self.0.client_message(),
                r#type: self.0.error_type().to_owned(),
                code: status.as_u16(),
            },
        };

        (status, Json(body)).into_response()
    }
}
