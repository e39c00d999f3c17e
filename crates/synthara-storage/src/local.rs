use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{ArtifactStore, error::Result, prefixed_key};

/// Directory on the local filesystem
///
/// Mirrors the object layout of a bucket: each key becomes a file below
/// the root directory.
pub struct LocalStore {
    root: PathBuf,
    prefix: Option<String>,
}

impl LocalStore {
    pub const fn new(root: PathBuf, prefix: Option<String>) -> Self {
        Self { root, prefix }
    }
}

#[async_trait]
impl ArtifactStore for LocalStore {
    async fn put_file(&self, path: &Path, key: &str, _content_type: &str) -> Result<String> {
        let key = prefixed_key(self.prefix.as_deref(), key);
        let destination = self.root.join(&key);

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = tokio::fs::copy(path, &destination).await?;

        tracing::info!(key = %key, bytes, root = %self.root.display(), "artifact stored");

        Ok(key)
    }

    fn name(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copies_file_under_key() {
        let scratch = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let source = scratch.path().join("song.wav");
        std::fs::write(&source, b"RIFF").unwrap();

        let store = LocalStore::new(root.path().to_path_buf(), None);
        let key = store.put_file(&source, "abc.wav", "audio/wav").await.unwrap();

        assert_eq!(key, "abc.wav");
        assert_eq!(std::fs::read(root.path().join("abc.wav")).unwrap(), b"RIFF");
        assert!(source.exists());
    }

    #[tokio::test]
    async fn prefix_creates_subdirectory() {
        let scratch = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let source = scratch.path().join("cover.png");
        std::fs::write(&source, b"PNG").unwrap();

        let store = LocalStore::new(root.path().to_path_buf(), Some("thumbnails/".to_string()));
        let key = store.put_file(&source, "abc.png", "image/png").await.unwrap();

        assert_eq!(key, "thumbnails/abc.png");
        assert!(root.path().join("thumbnails").join("abc.png").exists());
    }

    #[tokio::test]
    async fn missing_source_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalStore::new(root.path().to_path_buf(), None);

        let result = store.put_file(Path::new("/nonexistent/song.wav"), "abc.wav", "audio/wav").await;
        assert!(result.is_err());
    }
}
