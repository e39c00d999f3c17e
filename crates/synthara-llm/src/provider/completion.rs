//! Raw completions provider with client-side chat templating

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use synthara_config::LlmConfig;
use url::Url;

use super::{endpoint, upstream_error};
use crate::{
    LanguageModel,
    chat_template::{render_user_turn, strip_prompt_echo},
    error::{LlmError, Result},
};

/// Instruction model served through a plain `/completions` endpoint
///
/// The prompt is rendered with the model's ChatML template before it is
/// sent. When the server echoes the prompt, the echo is sliced off so
/// callers only see the continuation.
pub(crate) struct CompletionModel {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    model: String,
    max_new_tokens: u32,
    echo: bool,
}

impl CompletionModel {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = synthara_core::http_client(Duration::from_secs(config.timeout_secs))
            .map_err(|e| LlmError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_new_tokens: config.max_new_tokens,
            echo: config.echo,
        })
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    echo: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl LanguageModel for CompletionModel {
    async fn generate(&self, instruction: &str) -> Result<String> {
        let prompt = render_user_turn(instruction);

        let body = CompletionRequest {
            model: &self.model,
            prompt: &prompt,
            max_tokens: self.max_new_tokens,
            echo: self.echo,
        };

        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            echo = self.echo,
            "sending completion request"
        );

        let mut request = self.client.post(endpoint(&self.base_url, "completions")).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(model = %self.model, error = %e, "completion request failed");
            LlmError::from_reqwest(&e)
        })?;

        if !response.status().is_success() {
            return Err(upstream_error(self.name(), response).await);
        }

        let response: CompletionResponse = response.json().await.map_err(|e| LlmError::from_reqwest(&e))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?;

        let text = strip_prompt_echo(&prompt, &choice.text).to_string();

        tracing::debug!(model = %self.model, completion_len = text.len(), "completion complete");

        Ok(text)
    }

    fn name(&self) -> &str {
        "completion"
    }
}
