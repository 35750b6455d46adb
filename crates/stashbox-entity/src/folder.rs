//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stashbox_core::types::{FolderId, UserId};

/// A folder in the logical file hierarchy.
///
/// Folders form a forest per owner, rooted at `parent_id = None`. Cycles
/// are impossible by construction: a folder is only ever created under an
/// existing parent (or none), and parents are never reparented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The folder owner. Descendants always share this owner.
    pub owner_id: UserId,
    /// Parent folder ID (None for root folders).
    pub parent_id: Option<FolderId>,
    /// Folder name. Sibling names are not required to be unique.
    pub name: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new folder row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// The folder owner.
    pub owner_id: UserId,
    /// Parent folder (None for root).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
}
