use std::path::Path;

use crate::{Config, LlmProviderType, MusicProviderType, StorageType};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable expansion, TOML parsing,
    /// or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a backend is missing the settings its type requires
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_llm_config()?;
        self.validate_music_config()?;
        self.validate_storage_config()?;
        self.validate_pipeline_config()?;
        Ok(())
    }

    fn validate_llm_config(&self) -> anyhow::Result<()> {
        if self.llm.max_new_tokens == 0 {
            anyhow::bail!("llm.max_new_tokens must be greater than 0");
        }

        if self.llm.echo && self.llm.provider_type == LlmProviderType::Openai {
            anyhow::bail!("llm.echo is only supported by the `completion` provider");
        }

        Ok(())
    }

    fn validate_music_config(&self) -> anyhow::Result<()> {
        match self.music.provider_type {
            MusicProviderType::Http if self.music.base_url.is_none() => {
                anyhow::bail!("music.base_url is required for the `http` backend");
            }
            MusicProviderType::AceStep if self.music.socket.is_none() => {
                anyhow::bail!("music.socket is required for the `ace_step` backend");
            }
            _ => Ok(()),
        }
    }

    fn validate_storage_config(&self) -> anyhow::Result<()> {
        match self.storage.storage_type {
            StorageType::S3 if self.storage.bucket.as_deref().is_none_or(str::is_empty) => {
                anyhow::bail!("storage.bucket is required for the `s3` backend");
            }
            StorageType::S3
                if self.storage.access_key_id.is_some() != self.storage.secret_access_key.is_some() =>
            {
                anyhow::bail!("storage.access_key_id and storage.secret_access_key must be set together");
            }
            StorageType::Local if self.storage.path.is_none() => {
                anyhow::bail!("storage.path is required for the `local` backend");
            }
            _ => Ok(()),
        }
    }

    fn validate_pipeline_config(&self) -> anyhow::Result<()> {
        if self.pipeline.max_concurrent_generations == 0 {
            anyhow::bail!("pipeline.max_concurrent_generations must be greater than 0");
        }

        Ok(())
    }
}
