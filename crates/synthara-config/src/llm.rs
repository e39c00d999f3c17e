use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Language model configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Provider protocol type
    #[serde(rename = "type")]
    pub provider_type: LlmProviderType,
    /// Base URL of the model server (e.g. `http://localhost:8000/v1`)
    pub base_url: Url,
    /// API key for authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Upper bound on newly generated tokens per call
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    /// Ask a `completion` server to echo the prompt back
    ///
    /// The echoed prompt is stripped before the text is returned.
    #[serde(default)]
    pub echo: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Supported language model protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProviderType {
    /// OpenAI-compatible chat completions; the server applies the chat template
    Openai,
    /// OpenAI-compatible raw completions; Synthara renders the chat template
    Completion,
}

fn default_model() -> String {
    "Qwen/Qwen2-7B-Instruct".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_new_tokens() -> u32 {
    512
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout_secs() -> u64 {
    300
}
