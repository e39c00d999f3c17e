use axum::response::IntoResponse;
use http::StatusCode;

/// Liveness probe; model backends are not contacted
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
