//! Object store trait for pluggable blob backends.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;
use crate::types::StorageKey;

/// A byte stream type used for reading blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for name-addressed blob stores.
///
/// The trait is defined here in `stashbox-core` and implemented in
/// `stashbox-storage`. Blobs are written once per key and never overwritten
/// in place, so individual operations are independently retryable by
/// callers that want retries; the gateway itself performs none.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Store a blob under the given key and return its location URL.
    async fn put(&self, key: &StorageKey, data: Bytes, content_type: &str) -> AppResult<String>;

    /// Read the blob at the given key as a byte stream.
    ///
    /// Returns a `NotFound` error if no blob exists at the key.
    async fn get(&self, key: &StorageKey) -> AppResult<ByteStream>;

    /// Delete the blob at the given key. Deleting a missing blob is not an
    /// error.
    async fn delete(&self, key: &StorageKey) -> AppResult<()>;

    /// Issue a time-bounded signed GET URL for the blob at the given key.
    ///
    /// The URL authorizes reads for `ttl` from issuance. No side effects on
    /// the store.
    async fn sign_get(&self, key: &StorageKey, ttl: Duration) -> AppResult<String>;
}
