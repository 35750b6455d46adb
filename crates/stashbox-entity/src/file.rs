//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stashbox_core::types::{FileId, FolderId, StorageKey, UserId};

/// A file stored in Stashbox.
///
/// The metadata row owns the file's place in the folder tree; the blob
/// itself lives in the object store under `storage_key`, which is assigned
/// once and never changes while the blob exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The file owner.
    pub owner_id: UserId,
    /// The folder containing this file (None for root-level files).
    pub folder_id: Option<FolderId>,
    /// The file name (including extension).
    pub name: String,
    /// The key addressing the blob in the object store.
    pub storage_key: StorageKey,
    /// MIME type of the file.
    pub content_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file owner.
    pub owner_id: UserId,
    /// The folder to place the file in (None for root-level).
    pub folder_id: Option<FolderId>,
    /// The file name.
    pub name: String,
    /// The key addressing the blob in the object store.
    pub storage_key: StorageKey,
    /// MIME type.
    pub content_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
}
