#![allow(clippy::must_use_candidate)]

mod env;
pub mod imagegen;
pub mod llm;
mod loader;
pub mod music;
pub mod pipeline;
pub mod server;
pub mod storage;
pub mod telemetry;

use serde::Deserialize;

pub use imagegen::*;
pub use llm::*;
pub use music::*;
pub use pipeline::*;
pub use server::*;
pub use storage::*;
pub use telemetry::{ExportProtocol, OtlpConfig, TelemetryConfig};

/// Top-level Synthara configuration
///
/// The three model sections and the storage section are required; the
/// server refuses to start without a backend for every pipeline stage.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Language model used for tags, lyrics and categories
    pub llm: LlmConfig,
    /// Music synthesis backend
    pub music: MusicConfig,
    /// Thumbnail image backend
    pub imagegen: ImageGenConfig,
    /// Object storage for generated artifacts
    pub storage: StorageConfig,
    /// Request pipeline tuning
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
