//! Metadata catalog trait.
//!
//! The catalog is the authoritative store of folder and file rows. It is an
//! external collaborator: the relational implementation lives outside this
//! core, and the gateway only depends on this narrow query/mutation
//! surface. Row-level write atomicity is the catalog's responsibility.

use async_trait::async_trait;

use stashbox_core::result::AppResult;
use stashbox_core::types::{FileId, FolderId, UserId};

use crate::file::{CreateFile, File};
use crate::folder::{CreateFolder, Folder};

/// Narrow query/mutation interface over the persistent metadata store.
#[async_trait]
pub trait MetadataCatalog: Send + Sync + std::fmt::Debug + 'static {
    /// Find a folder by ID.
    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Find a file by ID.
    async fn find_file(&self, id: FileId) -> AppResult<Option<File>>;

    /// List an owner's folders under the given parent (None for roots).
    async fn list_folders(
        &self,
        owner_id: UserId,
        parent_id: Option<FolderId>,
    ) -> AppResult<Vec<Folder>>;

    /// List an owner's direct files in the given folder (None for
    /// root-level files), ordered by creation time ascending.
    async fn list_files(
        &self,
        owner_id: UserId,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<File>>;

    /// Insert a folder row and return it.
    async fn create_folder(&self, folder: &CreateFolder) -> AppResult<Folder>;

    /// Insert a file row and return it.
    async fn create_file(&self, file: &CreateFile) -> AppResult<File>;

    /// Delete a file row. Returns `true` if a row was deleted.
    async fn delete_file(&self, id: FileId) -> AppResult<bool>;

    /// Delete a folder row. Returns `true` if a row was deleted.
    ///
    /// This deletes the single row only; it does not touch files or
    /// subfolders. Cascading is the caller's decision.
    async fn delete_folder(&self, id: FolderId) -> AppResult<bool>;
}
