#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod provider;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use synthara_config::{MusicConfig, MusicProviderType};

pub use error::{MusicError, Result};

/// Parameters for one text-to-music generation
///
/// Every tunable is forwarded to the backend untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct MusicRequest {
    /// Comma-separated style tags
    pub prompt: String,
    /// Lyrics with section tags, or the instrumental sentinel
    pub lyrics: String,
    /// Track length in seconds
    pub audio_duration: f64,
    /// Number of denoising steps
    pub infer_step: i64,
    /// Classifier-free guidance scale
    pub guidance_scale: f64,
    /// Fixed seed; `None` lets the backend pick one
    pub seed: Option<u64>,
}

/// Text-to-music backend
#[async_trait]
pub trait MusicSynthesizer: Send + Sync {
    /// Generate a waveform and write it to `output`
    async fn synthesize(&self, request: &MusicRequest, output: &Path) -> Result<()>;

    /// Get the provider name
    fn name(&self) -> &str;
}

/// Build the configured music backend
///
/// # Errors
///
/// Returns an error if required settings are missing or the client cannot
/// be constructed
pub fn build_synthesizer(config: &MusicConfig) -> Result<Arc<dyn MusicSynthesizer>> {
    let synthesizer: Arc<dyn MusicSynthesizer> = match config.provider_type {
        MusicProviderType::Http => Arc::new(provider::http_api::HttpMusicProvider::new(config)?),
        #[cfg(unix)]
        MusicProviderType::AceStep => Arc::new(provider::ace_step::AceStepProvider::new(config)?),
        #[cfg(not(unix))]
        MusicProviderType::AceStep => {
            return Err(MusicError::Config(
                "the ace_step backend requires Unix domain sockets".to_string(),
            ));
        }
    };

    tracing::debug!(provider = synthesizer.name(), "music synthesizer initialized");

    Ok(synthesizer)
}
