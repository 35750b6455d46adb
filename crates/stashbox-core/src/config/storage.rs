//! Object store and gateway operation configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// S3-compatible object store connection settings.
///
/// The original deployment target is an R2 bucket, so the endpoint is
/// always explicit and the region is a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    /// Endpoint URL (e.g., `https://<account>.r2.cloudflarestorage.com`).
    #[serde(default)]
    pub endpoint: String,
    /// Region name.
    #[serde(default = "default_region")]
    pub region: String,
    /// Bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Per-call timeout in seconds for object store operations.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_seconds: u64,
}

impl ObjectStoreConfig {
    /// Per-call timeout as a [`Duration`].
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_seconds)
    }
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            operation_timeout_seconds: default_operation_timeout(),
        }
    }
}

/// Signed-URL grant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantConfig {
    /// Default grant validity in seconds.
    #[serde(default = "default_grant_ttl")]
    pub default_ttl_seconds: u64,
}

impl GrantConfig {
    /// Default grant validity as a [`Duration`].
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }
}

impl Default for GrantConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: default_grant_ttl(),
        }
    }
}

/// Archive assembly settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Chunk size in bytes for streaming the finished archive out.
    #[serde(default = "default_archive_chunk")]
    pub stream_chunk_bytes: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            stream_chunk_bytes: default_archive_chunk(),
        }
    }
}

/// Upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum upload size in bytes (default 5 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_operation_timeout() -> u64 {
    30
}

fn default_grant_ttl() -> u64 {
    300
}

fn default_archive_chunk() -> usize {
    65_536
}

fn default_max_upload() -> u64 {
    5_242_880 // 5 MB
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let grants = GrantConfig::default();
        assert_eq!(grants.default_ttl(), Duration::from_secs(300));

        let upload = UploadConfig::default();
        assert_eq!(upload.max_upload_size_bytes, 5 * 1024 * 1024);

        let store = ObjectStoreConfig::default();
        assert_eq!(store.region, "auto");
        assert_eq!(store.operation_timeout(), Duration::from_secs(30));
    }
}
