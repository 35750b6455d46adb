//! Tree mutation: folder creation, upload, and cascading deletion.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, info, warn};

use stashbox_core::config::UploadConfig;
use stashbox_core::error::AppError;
use stashbox_core::result::AppResult;
use stashbox_core::traits::ObjectStore;
use stashbox_core::types::{FileId, FolderId, UserId};
use stashbox_entity::{CreateFile, CreateFolder, File, Folder, MetadataCatalog};

use crate::keymap::KeyMapper;
use crate::util::bounded;

/// Request to create a new folder.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateFolderRequest {
    /// The folder owner.
    pub owner_id: UserId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root-level).
    pub parent_id: Option<FolderId>,
}

/// Request to store a new file.
#[derive(Debug, Clone)]
pub struct StoreFileRequest {
    /// The file owner.
    pub owner_id: UserId,
    /// Target folder (None for root-level).
    pub folder_id: Option<FolderId>,
    /// File name.
    pub name: String,
    /// MIME type.
    pub content_type: String,
    /// File content.
    pub data: Bytes,
}

/// Performs folder creation and recursive deletion across the metadata
/// catalog and the object store.
///
/// Deletion ordering is fixed metadata-first: a failure deleting a blob
/// never leaves a phantom row visible to users. An orphaned blob left
/// behind after its row is gone is logged and accepted; no reconciliation
/// pass exists in this core.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Metadata catalog.
    catalog: Arc<dyn MetadataCatalog>,
    /// Object store.
    store: Arc<dyn ObjectStore>,
    /// Key mapper.
    mapper: KeyMapper,
    /// Upload settings.
    config: UploadConfig,
    /// Per-call object store timeout.
    operation_timeout: Duration,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(
        catalog: Arc<dyn MetadataCatalog>,
        store: Arc<dyn ObjectStore>,
        config: UploadConfig,
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

    /// Require that `parent_id` names an existing folder owned by
    /// `owner_id`.
    async fn require_parent(&self, owner_id: UserId, parent_id: FolderId) -> AppResult<Folder> {
        let parent = self
            .catalog
            .find_folder(parent_id)
            .await?
            .ok_or_else(|| AppError::invalid_parent("Parent folder not found"))?;
        if parent.owner_id != owner_id {
            return Err(AppError::invalid_parent(
                "Parent folder belongs to another owner",
            ));
        }
        Ok(parent)
    }

    /// Creates a new folder.
    ///
    /// Sibling names are not required to be unique; duplicates are
    /// permitted by design.
    pub async fn create_folder(&self, req: CreateFolderRequest) -> AppResult<Folder> {
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }

        if let Some(parent_id) = req.parent_id {
            self.require_parent(req.owner_id, parent_id).await?;
        }

        let folder = self
            .catalog
            .create_folder(&CreateFolder {
                owner_id: req.owner_id,
                parent_id: req.parent_id,
                name: req.name,
            })
            .await?;

        info!(owner_id = %req.owner_id, folder_id = %folder.id, name = %folder.name, "Folder created");
        Ok(folder)
    }

    /// Stores a file: blob first, then the metadata row.
    ///
    /// A put failure leaves no row behind, so a row never references a
    /// blob that was never written.
    ///
    /// Storage keys encode only `(owner, filename)`, so storing a name the
    /// owner already holds, in any folder, overwrites that blob while both
    /// rows remain. An accepted residual of the key scheme; see
    /// [`KeyMapper`].
    pub async fn store_file(&self, req: StoreFileRequest) -> AppResult<File> {
        if let Some(folder_id) = req.folder_id {
            self.require_parent(req.owner_id, folder_id).await?;
        }

        if req.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File size {} exceeds maximum {} bytes",
                req.data.len(),
                self.config.max_upload_size_bytes
            )));
        }

        let key = self.mapper.derive_key(req.owner_id, &req.name)?;
        let size_bytes = req.data.len() as i64;

        let location = bounded(
            self.operation_timeout,
            "put",
            self.store.put(&key, req.data, &req.content_type),
        )
        .await?;
        debug!(key = %key, location = %location, "Blob stored");

        let file = self
            .catalog
            .create_file(&CreateFile {
                owner_id: req.owner_id,
                folder_id: req.folder_id,
                name: req.name,
                storage_key: key,
                content_type: Some(req.content_type),
                size_bytes,
            })
            .await?;

        info!(owner_id = %req.owner_id, file_id = %file.id, name = %file.name, "File stored");
        Ok(file)
    }

    /// Deletes a file: metadata row first, then the blob.
    pub async fn delete_file(&self, file_id: FileId) -> AppResult<()> {
        let file = self
            .catalog
            .find_file(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.catalog.delete_file(file_id).await?;
        self.delete_blob(&file).await;

        info!(file_id = %file_id, name = %file.name, "File deleted");
        Ok(())
    }

    /// Deletes a folder: all direct files (metadata row then blob, each),
    /// then the folder row itself.
    ///
    /// Shallow by design: subfolders and their files are not touched, and
    /// a subfolder's `parent_id` is left pointing at the deleted row.
    pub async fn delete_folder(&self, folder_id: FolderId) -> AppResult<()> {
        let folder = self
            .catalog
            .find_folder(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        let files = self
            .catalog
            .list_files(folder.owner_id, Some(folder_id))
            .await?;
        let direct_files = files.len();

        for file in &files {
            self.catalog.delete_file(file.id).await?;
            self.delete_blob(file).await;
        }

        self.catalog.delete_folder(folder_id).await?;

        info!(folder_id = %folder_id, name = %folder.name, direct_files, "Folder deleted");
        Ok(())
    }

    /// Best-effort blob deletion after the metadata row is gone. The file
    /// is already invisible to users, so a failure here only leaves an
    /// orphaned blob, which is an accepted residual.
    async fn delete_blob(&self, file: &File) {
        let result = bounded(
            self.operation_timeout,
            "delete",
            self.store.delete(&file.storage_key),
        )
        .await;
        if let Err(e) = result {
            warn!(
                key = %file.storage_key,
                error = %e,
                "Blob delete failed after metadata delete; orphaned blob accepted"
            );
        }
    }

    /// Lists an owner's folders under the given parent (None for roots).
    pub async fn list_folders(
        &self,
        owner_id: UserId,
        parent_id: Option<FolderId>,
    ) -> AppResult<Vec<Folder>> {
        self.catalog.list_folders(owner_id, parent_id).await
    }

    /// Lists an owner's direct files in the given folder (None for
    /// root-level files).
    pub async fn list_files(
        &self,
        owner_id: UserId,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<File>> {
        self.catalog.list_files(owner_id, folder_id).await
    }
}
