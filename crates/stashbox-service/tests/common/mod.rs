//! Shared test helpers for the gateway integration tests.

use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;

use stashbox_core::config::{ArchiveConfig, GrantConfig, UploadConfig};
use stashbox_core::traits::ByteStream;
use stashbox_core::types::{FolderId, UserId};
use stashbox_entity::{File, Folder};
use stashbox_service::testing::MemoryCatalog;
use stashbox_service::{
    Archive, ArchiveService, CreateFolderRequest, GrantService, StoreFileRequest, TreeService,
};
use stashbox_storage::MemoryObjectStore;

/// Per-call object store timeout used by the test gateway.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A fully wired gateway over in-memory collaborators.
pub struct TestGateway {
    pub catalog: Arc<MemoryCatalog>,
    pub store: Arc<MemoryObjectStore>,
    pub tree: TreeService,
    pub grants: GrantService,
    pub archives: ArchiveService,
}

impl TestGateway {
    pub fn new() -> Self {
        let catalog = Arc::new(MemoryCatalog::new());
        let store = Arc::new(MemoryObjectStore::new());

        let tree = TreeService::new(
            catalog.clone(),
            store.clone(),
            UploadConfig::default(),
            TEST_TIMEOUT,
        );
        let grants = GrantService::new(
            catalog.clone(),
            store.clone(),
            GrantConfig::default(),
            TEST_TIMEOUT,
        );
        let archives = ArchiveService::new(
            catalog.clone(),
            store.clone(),
            ArchiveConfig::default(),
            TEST_TIMEOUT,
        );

        Self {
            catalog,
            store,
            tree,
            grants,
            archives,
        }
    }

    /// Create a folder, panicking on failure.
    pub async fn folder(&self, owner: UserId, name: &str, parent: Option<FolderId>) -> Folder {
        self.tree
            .create_folder(CreateFolderRequest {
                owner_id: owner,
                name: name.to_string(),
                parent_id: parent,
            })
            .await
            .expect("create_folder failed")
    }

    /// Store a plain-text file, panicking on failure.
    pub async fn file(
        &self,
        owner: UserId,
        folder: Option<FolderId>,
        name: &str,
        contents: &str,
    ) -> File {
        self.tree
            .store_file(StoreFileRequest {
                owner_id: owner,
                folder_id: folder,
                name: name.to_string(),
                content_type: "text/plain".to_string(),
                data: Bytes::from(contents.to_string()),
            })
            .await
            .expect("store_file failed")
    }
}

/// Drain a byte stream into memory.
pub async fn collect(mut stream: ByteStream) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(chunk) = stream.next().await {
        out.extend_from_slice(&chunk.expect("stream chunk failed"));
    }
    out
}

/// Read a finished archive back into `(entry name, bytes)` pairs, in
/// archive order.
pub async fn read_archive(archive: Archive) -> Vec<(String, Vec<u8>)> {
    let bytes = collect(archive.stream).await;
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).expect("not a valid zip");

    let mut entries = Vec::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).expect("missing zip entry");
        let mut data = Vec::new();
        entry.read_to_end(&mut data).expect("failed to read entry");
        entries.push((entry.name().to_string(), data));
    }
    entries
}
