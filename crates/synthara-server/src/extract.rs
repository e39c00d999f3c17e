use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::de::DeserializeOwned;

/// JSON body extractor with a size cap and plain-text rejections
pub struct ExtractPayload<T>(pub T);

/// Body limit for generation requests (1 MiB)
const BODY_LIMIT_BYTES: usize = 1 << 20;

fn is_json(content_type: &http::HeaderValue) -> bool {
    content_type
        .to_str()
        .ok()
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

impl<S, T: DeserializeOwned> axum::extract::FromRequest<S> for ExtractPayload<T>
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        if !parts.headers.get(http::header::CONTENT_TYPE).is_some_and(is_json) {
            return Err((
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported Content-Type, expected: 'Content-Type: application/json'",
            )
                .into_response());
        }

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|err| {
            if std::error::Error::source(&err).is_some_and(|source| source.is::<http_body_util::LengthLimitError>()) {
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    format!("Request body is too large, limit is {BODY_LIMIT_BYTES} bytes"),
                )
            } else {
                (StatusCode::BAD_REQUEST, format!("Failed to read request body: {err}"))
            }
            .into_response()
        })?;

        let payload = serde_json::from_slice::<T>(&bytes).map_err(|e| {
            (StatusCode::BAD_REQUEST, format!("Failed to parse request body: {e}")).into_response()
        })?;

        Ok(Self(payload))
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::routing::post;
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Deserialize)]
    struct Echo {
        prompt: String,
    }

    async fn echo(ExtractPayload(body): ExtractPayload<Echo>) -> String {
        body.prompt
    }

    fn app() -> Router {
        Router::new().route("/echo", post(echo))
    }

    fn request(content_type: Option<&str>, body: impl Into<Body>) -> http::Request<Body> {
        let mut builder = http::Request::post("/echo");
        if let Some(content_type) = content_type {
            builder = builder.header(http::header::CONTENT_TYPE, content_type);
        }
        builder.body(body.into()).unwrap()
    }

    #[tokio::test]
    async fn accepts_json_with_charset() {
        let response = app()
            .oneshot(request(Some("application/json; charset=utf-8"), r#"{"prompt":"pop"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"pop");
    }

    #[tokio::test]
    async fn rejects_missing_or_wrong_content_type() {
        let missing = app().oneshot(request(None, r#"{"prompt":"pop"}"#)).await.unwrap();
        assert_eq!(missing.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let text = app()
            .oneshot(request(Some("text/plain"), r#"{"prompt":"pop"}"#))
            .await
            .unwrap();
        assert_eq!(text.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn rejects_malformed_body() {
        let response = app()
            .oneshot(request(Some("application/json"), r#"{"lyrics":"no prompt"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("prompt"));
    }

    #[tokio::test]
    async fn rejects_oversized_body() {
        let padding = "a".repeat(BODY_LIMIT_BYTES);
        let response = app()
            .oneshot(request(Some("application/json"), format!(r#"{{"prompt":"{padding}"}}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
