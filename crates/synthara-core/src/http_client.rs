use std::time::Duration;

use http::{HeaderMap, HeaderValue, header};
use reqwest::Client;

/// Build the HTTP client used to reach a model server
///
/// Model calls are long-running, so every adapter gets its own client
/// with the timeout from its config section.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));

    Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Some(Duration::from_secs(15)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .default_headers(headers)
        .build()
}
