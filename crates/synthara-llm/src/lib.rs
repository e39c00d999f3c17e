#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod chat_template;
mod error;
mod provider;

use std::sync::Arc;

use async_trait::async_trait;
use synthara_config::{LlmConfig, LlmProviderType};

pub use error::{LlmError, Result};

use provider::{completion::CompletionModel, openai::OpenAiChatModel};

/// Instruction-tuned language model
///
/// One instruction in, one completion out. Implementations wrap the
/// instruction as a single user turn and return only the newly generated
/// text, never the echoed prompt.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for a single user instruction
    async fn generate(&self, instruction: &str) -> Result<String>;

    /// Get the provider name
    fn name(&self) -> &str;
}

/// Build the configured language model
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed
pub fn build_model(config: &LlmConfig) -> Result<Arc<dyn LanguageModel>> {
    tracing::debug!(model = %config.model, "initializing language model");

    let model: Arc<dyn LanguageModel> = match config.provider_type {
        LlmProviderType::Openai => Arc::new(OpenAiChatModel::new(config)?),
        LlmProviderType::Completion => Arc::new(CompletionModel::new(config)?),
    };

    Ok(model)
}
