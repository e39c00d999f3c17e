//! OpenAI-compatible chat completions provider

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
    error::{LlmError, Result},
};

/// Chat model served behind an OpenAI-compatible API
///
/// The server owns the chat template, so the instruction is sent as a
/// single `user` message and the reply contains only new text.
pub(crate) struct OpenAiChatModel {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    model: String,
    max_new_tokens: u32,
}

impl OpenAiChatModel {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = synthara_core::http_client(Duration::from_secs(config.timeout_secs))
            .map_err(|e| LlmError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_new_tokens: config.max_new_tokens,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    async fn generate(&self, instruction: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: instruction,
            }],
            max_tokens: self.max_new_tokens,
        };

        tracing::debug!(
            model = %self.model,
            instruction_len = instruction.len(),
            "sending chat completion request"
        );

        let mut request = self.client.post(endpoint(&self.base_url, "chat/completions")).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(model = %self.model, error = %e, "chat completion request failed");
            LlmError::from_reqwest(&e)
        })?;

        if !response.status().is_success() {
            return Err(upstream_error(self.name(), response).await);
        }

        let response: ChatResponse = response.json().await.map_err(|e| LlmError::from_reqwest(&e))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        tracing::debug!(model = %self.model, completion_len = text.len(), "chat completion complete");

        Ok(text)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
