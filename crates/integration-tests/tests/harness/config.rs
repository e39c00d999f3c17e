//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::path::Path;

use secrecy::SecretString;
use synthara_config::{
    Config, HealthConfig, ImageGenConfig, ImageGenProviderType, LlmConfig, LlmProviderType, MusicConfig,
    MusicProviderType, PipelineConfig, ServerConfig, StorageConfig, StorageType,
};

use super::mock_models::MockModels;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Point every model backend at the mock and store artifacts in `storage_dir`
    pub fn new(mock: &MockModels, storage_dir: &Path) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                },
                llm: LlmConfig {
                    provider_type: LlmProviderType::Openai,
                    base_url: mock.llm_url().parse().expect("valid URL"),
                    api_key: Some(SecretString::from("test-key")),
                    model: "Qwen/Qwen2-7B-Instruct".to_owned(),
                    max_new_tokens: 512,
                    echo: false,
                    timeout_secs: 10,
                },
                music: MusicConfig {
                    provider_type: MusicProviderType::Http,
                    base_url: Some(mock.music_url().parse().expect("valid URL")),
                    socket: None,
                    api_key: None,
                    timeout_secs: 10,
                },
                imagegen: ImageGenConfig {
                    provider_type: ImageGenProviderType::Openai,
                    base_url: Some(mock.llm_url().parse().expect("valid URL")),
                    api_key: None,
                    model: "stabilityai/sdxl-turbo".to_owned(),
                    size: "512x512".to_owned(),
                    timeout_secs: 10,
                },
                storage: StorageConfig {
                    storage_type: StorageType::Local,
                    bucket: None,
                    region: None,
                    endpoint_url: None,
                    force_path_style: false,
                    access_key_id: None,
                    secret_access_key: None,
                    prefix: None,
                    path: Some(storage_dir.to_path_buf()),
                },
                pipeline: PipelineConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Talk to the language model through the raw completions endpoint
    pub fn with_completion_llm(mut self, echo: bool) -> Self {
        self.config.llm.provider_type = LlmProviderType::Completion;
        self.config.llm.echo = echo;
        self
    }

    /// Store artifacts below a key prefix
    pub fn with_storage_prefix(mut self, prefix: &str) -> Self {
        self.config.storage.prefix = Some(prefix.to_owned());
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
