//! S3-compatible object store backed by aws-sdk-s3.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::presigning::PresigningConfig;
use bytes::Bytes;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use stashbox_core::config::ObjectStoreConfig;
use stashbox_core::error::{AppError, ErrorKind};
use stashbox_core::result::AppResult;
use stashbox_core::traits::{ByteStream, ObjectStore};
use stashbox_core::types::StorageKey;

/// S3-compatible object store.
///
/// All connection parameters come from the explicit [`ObjectStoreConfig`];
/// nothing is read from ambient environment variables.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    endpoint: String,
    region: String,
}

impl std::fmt::Debug for S3ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStore")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl S3ObjectStore {
    /// Create a new S3 object store from explicit configuration.
    pub async fn new(config: &ObjectStoreConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("Object store bucket is not set"));
        }

        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "stashbox",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if !config.endpoint.is_empty() {
            loader = loader.endpoint_url(&config.endpoint);
        }
        let sdk_config = loader.load().await;

        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 object store"
        );

        Ok(Self {
            client: Client::new(&sdk_config),
            bucket: config.bucket.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            region: config.region.clone(),
        })
    }

    /// Public location URL of the object at `key`.
    fn object_url(&self, key: &StorageKey) -> String {
        if self.endpoint.is_empty() {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        } else {
            format!("{}/{}/{}", self.endpoint, self.bucket, key)
        }
    }
}

/// Map an SDK failure to the gateway taxonomy. Transport failures and
/// timeouts become `StorageUnavailable`; everything else is `Storage`.
fn classify_sdk_error<E, R>(op: &str, err: SdkError<E, R>) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let unavailable = matches!(
        &err,
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_)
    );
    if unavailable {
        AppError::with_source(
            ErrorKind::StorageUnavailable,
            format!("Object store unreachable during {op}"),
            err,
        )
    } else {
        AppError::with_source(ErrorKind::Storage, format!("Object store {op} failed"), err)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &StorageKey, data: Bytes, content_type: &str) -> AppResult<String> {
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .content_type(content_type)
            .body(data.into())
            .send()
            .await
            .map_err(|e| classify_sdk_error("put", e))?;

        debug!(key = %key, bytes = size, "Stored object");
        Ok(self.object_url(key))
    }

    async fn get(&self, key: &StorageKey) -> AppResult<ByteStream> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| {
                let missing = matches!(&e, SdkError::ServiceError(se) if se.err().is_no_such_key());
                if missing {
                    AppError::not_found(format!("No object at key '{key}'"))
                } else {
                    classify_sdk_error("get", e)
                }
            })?;

        let reader = output.body.into_async_read();
        Ok(Box::pin(ReaderStream::new(reader)))
    }

    async fn delete(&self, key: &StorageKey) -> AppResult<()> {
        // S3 delete is idempotent: deleting a missing key succeeds.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| classify_sdk_error("delete", e))?;

        debug!(key = %key, "Deleted object");
        Ok(())
    }

    async fn sign_get(&self, key: &StorageKey, ttl: Duration) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(ttl).map_err(|e| {
            AppError::grant_issuance(format!("Invalid presigning expiry {ttl:?}: {e}"))
        })?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .presigned(presigning)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::GrantIssuance,
                    format!("Failed to sign GET for key '{key}'"),
                    e,
                )
            })?;

        Ok(presigned.uri().to_string())
    }
}
