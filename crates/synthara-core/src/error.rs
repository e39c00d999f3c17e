use http::StatusCode;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. The server layer
/// turns these into JSON error bodies, so model and storage adapters
/// never depend on axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `upstream_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}

/// Map a model server's HTTP status onto the status we report
///
/// Every backend rejection is a bad gateway for our callers, including auth
/// failures. Rate limiting surfaces as 503.
#[must_use]
pub const fn upstream_status(status: u16) -> StatusCode {
    match status {
        429 => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    }
}
