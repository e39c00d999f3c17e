pub(crate) mod completion;
pub(crate) mod openai;

use http::StatusCode;

use crate::error::LlmError;

/// Map a non-success response into an error, logging the body
pub(crate) async fn upstream_error(provider: &str, response: reqwest::Response) -> LlmError {
    let status: StatusCode = response.status();
    let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

    tracing::error!(provider, status = %status, "language model API error");

    LlmError::Upstream {
        status: status.as_u16(),
        message,
    }
}

/// Join an endpoint path onto a configured base URL
pub(crate) fn endpoint(base_url: &url::Url, path: &str) -> String {
    format!("{}/{path}", base_url.as_str().trim_end_matches('/'))
}
