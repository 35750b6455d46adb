//! In-memory metadata catalog used by the test suites.
//!
//! Behaves like the relational catalog this gateway is deployed against:
//! plain row storage with row-level atomicity and no cascading. Deleting
//! a folder row does not touch its children.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use stashbox_core::result::AppResult;
use stashbox_core::types::{FileId, FolderId, UserId};
use stashbox_entity::{CreateFile, CreateFolder, File, Folder, MetadataCatalog};

#[derive(Debug, Default)]
struct State {
    // Insertion order doubles as created_at-ascending order.
    folders: Vec<Folder>,
    files: Vec<File>,
}

/// In-memory [`MetadataCatalog`] double.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    state: Arc<RwLock<State>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of folder rows, across all owners.
    pub async fn folder_count(&self) -> usize {
        self.state.read().await.folders.len()
    }

    /// Number of file rows, across all owners.
    pub async fn file_count(&self) -> usize {
        self.state.read().await.files.len()
    }
}

#[async_trait]
impl MetadataCatalog for MemoryCatalog {
    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        let state = self.state.read().await;
        Ok(state.folders.iter().find(|f| f.id == id).cloned())
    }

    async fn find_file(&self, id: FileId) -> AppResult<Option<File>> {
        let state = self.state.read().await;
        Ok(state.files.iter().find(|f| f.id == id).cloned())
    }

    async fn list_folders(
        &self,
        owner_id: UserId,
        parent_id: Option<FolderId>,
    ) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        Ok(state
            .folders
            .iter()
            .filter(|f| f.owner_id == owner_id && f.parent_id == parent_id)
            .cloned()
            .collect())
    }

    async fn list_files(
        &self,
        owner_id: UserId,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<File>> {
        let state = self.state.read().await;
        Ok(state
            .files
            .iter()
            .filter(|f| f.owner_id == owner_id && f.folder_id == folder_id)
            .cloned()
            .collect())
    }

    async fn create_folder(&self, folder: &CreateFolder) -> AppResult<Folder> {
        let row = Folder {
            id: FolderId::new(),
            owner_id: folder.owner_id,
            parent_id: folder.parent_id,
            name: folder.name.clone(),
            created_at: Utc::now(),
        };
        self.state.write().await.folders.push(row.clone());
        Ok(row)
    }

    async fn create_file(&self, file: &CreateFile) -> AppResult<File> {
        let row = File {
            id: FileId::new(),
            owner_id: file.owner_id,
            folder_id: file.folder_id,
            name: file.name.clone(),
            storage_key: file.storage_key.clone(),
            content_type: file.content_type.clone(),
            size_bytes: file.size_bytes,
            created_at: Utc::now(),
        };
        self.state.write().await.files.push(row.clone());
        Ok(row)
    }

    async fn delete_file(&self, id: FileId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.files.len();
        state.files.retain(|f| f.id != id);
        Ok(state.files.len() < before)
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.folders.len();
        state.folders.retain(|f| f.id != id);
        Ok(state.folders.len() < before)
    }
}
