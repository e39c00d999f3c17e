use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use secrecy::ExposeSecret;
use synthara_config::StorageConfig;

use crate::{ArtifactStore, StorageError, error::Result, prefixed_key};

/// Amazon S3 (or compatible) bucket
pub struct S3Store {
    client: Client,
    bucket: String,
    prefix: Option<String>,
}

impl S3Store {
    /// Create a store around an existing client
    pub fn new(client: Client, bucket: String, prefix: Option<String>) -> Self {
        Self { client, bucket, prefix }
    }

    /// Build an S3 client from storage configuration
    ///
    /// Explicit credentials win; otherwise the default AWS provider chain
    /// (environment, profile, instance role) is used.
    pub async fn from_config(config: &StorageConfig) -> Result<Self> {
        let bucket = config
            .bucket
            .clone()
            .ok_or_else(|| StorageError::Config("storage.bucket is required for the s3 backend".to_string()))?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint.as_str());
        }

        if let (Some(access_key), Some(secret_key)) = (&config.access_key_id, &config.secret_access_key) {
            let credentials = aws_credential_types::Credentials::new(
                access_key.expose_secret(),
                secret_key.expose_secret(),
                None, // session token
                None, // expiry
                "synthara-config",
            );
            loader = loader.credentials_provider(credentials);
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        tracing::debug!(bucket = %bucket, "s3 client configured");

        Ok(Self::new(Client::from_conf(s3_config), bucket, config.prefix.clone()))
    }
}

#[async_trait]
impl ArtifactStore for S3Store {
    async fn put_file(&self, path: &Path, key: &str, content_type: &str) -> Result<String> {
        let key = prefixed_key(self.prefix.as_deref(), key);

        let body = ByteStream::from_path(path).await.map_err(|e| StorageError::Upload {
            key: key.clone(),
            message: format!("failed to read {}: {e}", path.display()),
        })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(bucket = %self.bucket, key = %key, error = %DisplayErrorContext(&e), "s3 upload failed");
                StorageError::Upload {
                    key: key.clone(),
                    message: DisplayErrorContext(&e).to_string(),
                }
            })?;

        tracing::info!(bucket = %self.bucket, key = %key, "artifact uploaded");

        Ok(key)
    }

    fn name(&self) -> &str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode, Uri, header};
    use axum::{Router, routing};
    use secrecy::SecretString;
    use synthara_config::StorageType;

    use super::*;

    #[derive(Default)]
    struct Uploads {
        reject: bool,
        objects: Mutex<Vec<(String, String, Bytes)>>,
    }

    async fn put_object(State(uploads): State<Arc<Uploads>>, uri: Uri, headers: HeaderMap, body: Bytes) -> StatusCode {
        if uploads.reject {
            return StatusCode::FORBIDDEN;
        }

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        uploads
            .objects
            .lock()
            .unwrap()
            .push((uri.path().to_string(), content_type, body));

        StatusCode::OK
    }

    async fn mock_bucket(uploads: Arc<Uploads>) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/{*key}", routing::put(put_object))
            .with_state(uploads);

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }

    fn config(endpoint: Option<SocketAddr>, bucket: Option<&str>) -> StorageConfig {
        StorageConfig {
            storage_type: StorageType::S3,
            bucket: bucket.map(str::to_string),
            region: Some("us-east-1".to_string()),
            endpoint_url: endpoint.map(|addr| format!("http://{addr}").parse().unwrap()),
            force_path_style: true,
            access_key_id: Some(SecretString::from("test-access".to_string())),
            secret_access_key: Some(SecretString::from("test-secret".to_string())),
            prefix: Some("songs".to_string()),
            path: None,
        }
    }

    #[tokio::test]
    async fn missing_bucket_is_a_config_error() {
        let result = S3Store::from_config(&config(None, None)).await;
        assert!(matches!(result, Err(StorageError::Config(_))));
    }

    #[tokio::test]
    async fn uploads_file_under_prefixed_key() {
        let uploads = Arc::new(Uploads::default());
        let addr = mock_bucket(Arc::clone(&uploads)).await;
        let store = S3Store::from_config(&config(Some(addr), Some("synthara-music")))
            .await
            .unwrap();

        let scratch = tempfile::tempdir().unwrap();
        let source = scratch.path().join("song.wav");
        std::fs::write(&source, b"RIFF-synthara-wave").unwrap();

        let key = store.put_file(&source, "abc.wav", "audio/wav").await.unwrap();

        assert_eq!(key, prefixed_key(Some("songs"), "abc.wav"));
        let objects = uploads.objects.lock().unwrap();
        assert_eq!(objects.len(), 1);
        let (path, content_type, body) = &objects[0];
        assert_eq!(path, &format!("/synthara-music/{key}"));
        assert_eq!(content_type, "audio/wav");
        assert!(body.windows(18).any(|w| w == b"RIFF-synthara-wave"));
    }

    #[tokio::test]
    async fn rejected_upload_is_an_upload_error() {
        let uploads = Arc::new(Uploads {
            reject: true,
            ..Uploads::default()
        });
        let addr = mock_bucket(uploads).await;
        let store = S3Store::from_config(&config(Some(addr), Some("synthara-music")))
            .await
            .unwrap();

        let scratch = tempfile::tempdir().unwrap();
        let source = scratch.path().join("cover.png");
        std::fs::write(&source, b"PNG").unwrap();

        let err = store.put_file(&source, "cover.png", "image/png").await.unwrap_err();

        assert!(matches!(err, StorageError::Upload { ref key, .. } if key.ends_with("cover.png")));
    }
}
