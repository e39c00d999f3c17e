use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Music synthesis backend configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MusicConfig {
    /// Backend type
    #[serde(rename = "type")]
    pub provider_type: MusicProviderType,
    /// Base URL of an HTTP inference server (`http` backend)
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Unix socket of a resident generation daemon (`ace_step` backend)
    #[serde(default)]
    pub socket: Option<PathBuf>,
    /// API key for the HTTP inference server
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Time allowed for a single synthesis, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Supported music synthesis backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicProviderType {
    /// JSON over HTTP, waveform returned in the response body
    Http,
    /// Line-delimited JSON over a Unix socket, waveform written by the daemon
    AceStep,
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout_secs() -> u64 {
    600
}
