use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Thumbnail image backend configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageGenConfig {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: ImageGenProviderType,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Image size (e.g. "512x512")
    #[serde(default = "default_size")]
    pub size: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Supported image generation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageGenProviderType {
    /// OpenAI-compatible image generation
    Openai,
}

fn default_model() -> String {
    "stabilityai/sdxl-turbo".to_string()
}

fn default_size() -> String {
    "512x512".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout_secs() -> u64 {
    120
}
