use std::path::PathBuf;

use serde::Deserialize;

/// Request pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Parent directory for per-request scratch directories
    ///
    /// Defaults to the system temporary directory.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
    /// Number of generations allowed to run at once
    ///
    /// All requests share one set of model backends, so the default
    /// serves a single request at a time.
    #[serde(default = "default_max_concurrent_generations")]
    pub max_concurrent_generations: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scratch_dir: None,
            max_concurrent_generations: default_max_concurrent_generations(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_concurrent_generations() -> usize {
    1
}
