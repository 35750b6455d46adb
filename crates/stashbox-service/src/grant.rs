//! Time-bounded access grant issuance (signed URLs).

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use stashbox_core::config::GrantConfig;
use stashbox_core::error::AppError;
use stashbox_core::result::AppResult;
use stashbox_core::traits::ObjectStore;
use stashbox_core::types::{FolderId, StorageKey, UserId};
use stashbox_entity::MetadataCatalog;

use crate::keymap::KeyMapper;
use crate::util::bounded;

/// Maximum grant validity (the S3 presign ceiling).
pub const MAX_GRANT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// A signed URL authorizing reads of one object until its expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrl {
    /// The signed URL.
    pub url: String,
    /// Validity from issuance.
    pub expires_in: Duration,
}

/// One granted URL in a folder batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileGrant {
    /// Logical file name.
    pub name: String,
    /// The signed URL.
    pub url: String,
}

/// One file whose grant could not be issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantFailure {
    /// Logical file name.
    pub name: String,
    /// Why signing failed.
    pub reason: String,
}

/// Result of a folder-wide grant batch. Partial success is the contract:
/// a file whose signing fails is reported in `failures` without sinking
/// the rest of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderGrants {
    /// Successfully granted URLs, in catalog order.
    pub urls: Vec<FileGrant>,
    /// Files whose grants failed.
    pub failures: Vec<GrantFailure>,
}

/// Issues time-bounded read grants for stored objects.
#[derive(Debug, Clone)]
pub struct GrantService {
    /// Metadata catalog.
    catalog: Arc<dyn MetadataCatalog>,
    /// Object store.
    store: Arc<dyn ObjectStore>,
    /// Key mapper.
    mapper: KeyMapper,
    /// Grant settings.
    config: GrantConfig,
    /// Per-call object store timeout.
    operation_timeout: Duration,
}

impl GrantService {
    /// Creates a new grant service.
    pub fn new(
        catalog: Arc<dyn MetadataCatalog>,
        store: Arc<dyn ObjectStore>,
        config: GrantConfig,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            store,
            mapper: KeyMapper::new(),
            config,
            operation_timeout,
        }
    }

    /// Issue a grant for a single object key.
    ///
    /// A signing failure is always surfaced to the caller, never retried.
    pub async fn issue_grant(&self, key: &StorageKey, ttl: Duration) -> AppResult<SignedUrl> {
        if ttl.is_zero() {
            return Err(AppError::validation("Grant ttl must be greater than zero"));
        }
        if ttl > MAX_GRANT_TTL {
            return Err(AppError::validation(format!(
                "Grant ttl {ttl:?} exceeds maximum {MAX_GRANT_TTL:?}"
            )));
        }

        let url = bounded(self.operation_timeout, "sign_get", self.store.sign_get(key, ttl)).await?;
        Ok(SignedUrl {
            url,
            expires_in: ttl,
        })
    }

    /// Issue a grant for an owner's file by name, with the default ttl.
    pub async fn issue_grant_for_name(
        &self,
        owner_id: UserId,
        file_name: &str,
    ) -> AppResult<SignedUrl> {
        let key = self.mapper.derive_key(owner_id, file_name)?;
        self.issue_grant(&key, self.config.default_ttl()).await
    }

    /// Issue grants for every direct file of a folder.
    ///
    /// Only a missing folder fails the whole call; per-file signing
    /// failures are collected individually.
    pub async fn issue_grants_for_folder(&self, folder_id: FolderId) -> AppResult<FolderGrants> {
        let folder = self
            .catalog
            .find_folder(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        let files = self
            .catalog
            .list_files(folder.owner_id, Some(folder_id))
            .await?;

        let mut urls = Vec::new();
        let mut failures = Vec::new();
        for file in files {
            match self
                .issue_grant(&file.storage_key, self.config.default_ttl())
                .await
            {
                Ok(grant) => urls.push(FileGrant {
                    name: file.name,
                    url: grant.url,
                }),
                Err(e) => {
                    warn!(folder_id = %folder_id, file = %file.name, error = %e, "Grant failed");
                    failures.push(GrantFailure {
                        name: file.name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            folder_id = %folder_id,
            granted = urls.len(),
            failed = failures.len(),
            "Issued folder grants"
        );

        Ok(FolderGrants { urls, failures })
    }
}
