use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Artifact storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Storage backend
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    /// Bucket receiving the artifacts (`s3`)
    #[serde(default)]
    pub bucket: Option<String>,
    /// AWS region (`s3`); the default provider chain is used when absent
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override for S3-compatible stores (`s3`)
    #[serde(default)]
    pub endpoint_url: Option<Url>,
    /// Use path-style addressing (`s3`)
    #[serde(default)]
    pub force_path_style: bool,
    /// Access key ID (optional, uses default credential chain if absent)
    #[serde(default)]
    pub access_key_id: Option<SecretString>,
    /// Secret access key
    #[serde(default)]
    pub secret_access_key: Option<SecretString>,
    /// Prefix prepended to every object key
    #[serde(default)]
    pub prefix: Option<String>,
    /// Root directory (`local`)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    /// Amazon S3 or an S3-compatible store
    S3,
    /// A directory on the local filesystem
    Local,
}
