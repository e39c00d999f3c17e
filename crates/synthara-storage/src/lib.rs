//! Artifact storage for generated audio and thumbnails

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod local;
mod s3;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use synthara_config::{StorageConfig, StorageType};

pub use error::{Result, StorageError};
pub use local::LocalStore;
pub use s3::S3Store;

/// Destination for finished artifacts
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload the file at `path` under `key`
    ///
    /// Returns the key the object was stored under, including any
    /// configured prefix.
    async fn put_file(&self, path: &Path, key: &str, content_type: &str) -> Result<String>;

    /// Get the backend name
    fn name(&self) -> &str;
}

/// Build the configured storage backend
///
/// # Errors
///
/// Returns an error if the backend is missing required settings
pub async fn build_store(config: &StorageConfig) -> Result<Arc<dyn ArtifactStore>> {
    let store: Arc<dyn ArtifactStore> = match config.storage_type {
        StorageType::S3 => Arc::new(S3Store::from_config(config).await?),
        StorageType::Local => {
            let root = config
                .path
                .clone()
                .ok_or_else(|| StorageError::Config("storage.path is required for the local backend".to_string()))?;
            Arc::new(LocalStore::new(root, config.prefix.clone()))
        }
    };

    tracing::debug!(backend = store.name(), "artifact store initialized");

    Ok(store)
}

/// Prepend the configured prefix to an object key
pub(crate) fn prefixed_key(prefix: Option<&str>, key: &str) -> String {
    match prefix.map(|p| p.trim_matches('/')) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}/{key}"),
        _ => key.to_string(),
    }
}
