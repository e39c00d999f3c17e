#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod provider;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use synthara_config::{ImageGenConfig, ImageGenProviderType};

pub use error::{ImageGenError, Result};

use provider::openai::OpenAiImageGenProvider;

/// Parameters for one text-to-image generation
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    /// Text description of the desired image
    pub prompt: String,
    /// Number of denoising steps
    pub num_inference_steps: u32,
    /// Classifier-free guidance scale; 0 disables guidance
    pub guidance_scale: f64,
}

/// Text-to-image backend
#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    /// Generate one image and write it to `output`
    async fn synthesize(&self, request: &ImageRequest, output: &Path) -> Result<()>;

    /// Get the provider name
    fn name(&self) -> &str;
}

/// Build the configured image backend
///
/// # Errors
///
/// Returns an error if the provider fails to initialize
pub fn build_synthesizer(config: &ImageGenConfig) -> Result<Arc<dyn ImageSynthesizer>> {
    let synthesizer: Arc<dyn ImageSynthesizer> = match config.provider_type {
        ImageGenProviderType::Openai => Arc::new(OpenAiImageGenProvider::new(config)?),
    };

    tracing::debug!(provider = synthesizer.name(), model = %config.model, "image synthesizer initialized");

    Ok(synthesizer)
}
