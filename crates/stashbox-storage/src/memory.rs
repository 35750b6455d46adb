//! In-memory object store.
//!
//! Backs the test suites with the same contract as the S3 store, including
//! signed URLs that actually expire: [`MemoryObjectStore::verify_url`]
//! enforces the expiry a grant was issued with, so tests can observe a URL
//! going stale without talking to a real bucket. An `offline` switch makes
//! every call fail `StorageUnavailable` to exercise transport-failure
//! paths, and a separate `fail_signing` switch rejects `sign_get` with
//! `GrantIssuance` to exercise signing-rejection paths.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use stashbox_core::error::AppError;
use stashbox_core::result::AppResult;
use stashbox_core::traits::{ByteStream, ObjectStore};
use stashbox_core::types::StorageKey;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
}

/// In-memory, name-addressed object store.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
    offline: Arc<AtomicBool>,
    fail_signing: Arc<AtomicBool>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store being unreachable. While offline, every
    /// operation fails with `StorageUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make `sign_get` reject every request with `GrantIssuance`, the way
    /// the real store does when the signer refuses a request.
    pub fn set_fail_signing(&self, fail: bool) {
        self.fail_signing.store(fail, Ordering::SeqCst);
    }

    fn check_online(&self, op: &str) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(AppError::storage_unavailable(format!(
                "Object store unreachable during {op}"
            )))
        } else {
            Ok(())
        }
    }

    /// Whether a blob exists at the given key.
    pub async fn contains(&self, key: &StorageKey) -> bool {
        self.objects.read().await.contains_key(key.as_str())
    }

    /// Stored content type of the blob at `key`, if present.
    pub async fn content_type(&self, key: &StorageKey) -> Option<String> {
        self.objects
            .read()
            .await
            .get(key.as_str())
            .map(|o| o.content_type.clone())
    }

    /// Validate a signed URL at the given instant, the way the real store
    /// would when the URL is used: the key must still exist and the expiry
    /// must not have passed.
    pub async fn verify_url(&self, url: &str, at: DateTime<Utc>) -> bool {
        let Some(rest) = url.strip_prefix("memory://") else {
            return false;
        };
        let Some((key, query)) = rest.split_once('?') else {
            return false;
        };
        let Some(expires) = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("expires="))
            .and_then(|v| v.parse::<i64>().ok())
        else {
            return false;
        };

        at.timestamp() <= expires && self.objects.read().await.contains_key(key)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &StorageKey, data: Bytes, content_type: &str) -> AppResult<String> {
        self.check_online("put")?;
        let mut objects = self.objects.write().await;
        debug!(key = %key, bytes = data.len(), "Stored object");
        objects.insert(
            key.as_str().to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{key}"))
    }

    async fn get(&self, key: &StorageKey) -> AppResult<ByteStream> {
        self.check_online("get")?;
        let objects = self.objects.read().await;
        let object = objects
            .get(key.as_str())
            .ok_or_else(|| AppError::not_found(format!("No object at key '{key}'")))?;

        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![Ok(object.data.clone())];
        Ok(Box::pin(futures::stream::iter(chunks)))
    }

    async fn delete(&self, key: &StorageKey) -> AppResult<()> {
        self.check_online("delete")?;
        self.objects.write().await.remove(key.as_str());
        Ok(())
    }

    async fn sign_get(&self, key: &StorageKey, ttl: Duration) -> AppResult<String> {
        self.check_online("sign_get")?;
        if self.fail_signing.load(Ordering::SeqCst) {
            return Err(AppError::grant_issuance(format!(
                "Signer rejected request for '{key}'"
            )));
        }

        // The real store signs blindly; the fake refuses so tests can
        // exercise per-file grant failures.
        if !self.objects.read().await.contains_key(key.as_str()) {
            return Err(AppError::grant_issuance(format!(
                "Refusing to sign for missing object '{key}'"
            )));
        }

        let expires = Utc::now().timestamp() + ttl.as_secs() as i64;
        let token = Uuid::new_v4().simple();
        Ok(format!("memory://{key}?expires={expires}&token={token}"))
    }
}
