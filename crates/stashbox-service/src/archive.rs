//! Archive assembly: streams a folder's direct files as one zip.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncSeekExt;
use tokio::task;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use stashbox_core::config::ArchiveConfig;
use stashbox_core::error::{AppError, ErrorKind};
use stashbox_core::result::AppResult;
use stashbox_core::traits::{ByteStream, ObjectStore};
use stashbox_core::types::FolderId;
use stashbox_entity::{File, MetadataCatalog};

use crate::util::bounded;

/// A finished archive ready to stream to the caller.
pub struct Archive {
    /// Suggested download filename (`folder-<id>.zip`).
    pub file_name: String,
    /// Always `application/zip`.
    pub content_type: String,
    /// The archive bytes.
    pub stream: ByteStream,
    /// Total archive size in bytes.
    pub size_bytes: u64,
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("file_name", &self.file_name)
            .field("size_bytes", &self.size_bytes)
            .finish()
    }
}

/// Assembles a folder's direct files into a single zip archive.
///
/// Assembly is non-recursive: only files whose `folder_id` equals the
/// requested folder are included, never nested subfolders. The policy for
/// a missing object is abort-on-missing: one `FetchFailure` fails the
/// whole request. The archive spools to an unlinked temp file
/// and is only handed to the caller after it is finalized, so a failed
/// assembly yields zero bytes.
#[derive(Clone)]
pub struct ArchiveService {
    /// Metadata catalog.
    catalog: Arc<dyn MetadataCatalog>,
    /// Object store.
    store: Arc<dyn ObjectStore>,
    /// Archive settings.
    config: ArchiveConfig,
    /// Per-call object store timeout.
    operation_timeout: Duration,
}

impl std::fmt::Debug for ArchiveService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveService").finish()
    }
}

impl ArchiveService {
    /// Creates a new archive service.
    pub fn new(
        catalog: Arc<dyn MetadataCatalog>,
        store: Arc<dyn ObjectStore>,
        config: ArchiveConfig,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            store,
            config,
            operation_timeout,
        }
    }

    /// Assemble the direct files of a folder into a zip archive.
    ///
    /// Memory stays bounded by one file at a time: each object is fetched,
    /// appended to the spool, and dropped before the next fetch. Dropping
    /// the returned future mid-assembly cancels the in-flight fetch and
    /// reclaims the unlinked spool; nothing is finalized.
    pub async fn assemble(&self, folder_id: FolderId) -> AppResult<Archive> {
        let folder = self
            .catalog
            .find_folder(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        let files = self
            .catalog
            .list_files(folder.owner_id, Some(folder_id))
            .await?;
        if files.is_empty() {
            return Err(AppError::empty_folder(format!(
                "Folder '{}' has no files",
                folder.name
            )));
        }

        let spool = tempfile::tempfile()?;
        let mut writer = ZipWriter::new(spool);

        let entries = files.len();
        for file in &files {
            let data = self.fetch_object(file).await?;
            debug!(folder_id = %folder_id, file = %file.name, bytes = data.len(), "Appending entry");

            let name = file.name.clone();
            writer = task::spawn_blocking(move || -> AppResult<ZipWriter<std::fs::File>> {
                writer
                    .start_file(name, SimpleFileOptions::default())
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Storage, "Failed to start archive entry", e)
                    })?;
                writer.write_all(&data)?;
                Ok(writer)
            })
            .await
            .map_err(|e| AppError::internal(format!("Archive writer task failed: {e}")))??;
        }

        let spool = task::spawn_blocking(move || {
            writer.finish().map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to finalize archive", e)
            })
        })
        .await
        .map_err(|e| AppError::internal(format!("Archive writer task failed: {e}")))??;

        let mut spool = tokio::fs::File::from_std(spool);
        let size_bytes = spool.metadata().await?.len();
        spool.rewind().await?;

        info!(folder_id = %folder_id, entries, size_bytes, "Assembled archive");

        Ok(Archive {
            file_name: format!("folder-{folder_id}.zip"),
            content_type: "application/zip".to_string(),
            stream: Box::pin(ReaderStream::with_capacity(
                spool,
                self.config.stream_chunk_bytes,
            )),
            size_bytes,
        })
    }

    /// Fetch one object's bytes, bounded by the operation timeout.
    ///
    /// A missing or unreadable object maps to `FetchFailure` naming the
    /// file; transport failures stay `StorageUnavailable`.
    async fn fetch_object(&self, file: &File) -> AppResult<Vec<u8>> {
        bounded(self.operation_timeout, "get", async {
            let mut stream = self.store.get(&file.storage_key).await.map_err(|e| {
                if e.kind == ErrorKind::StorageUnavailable {
                    e
                } else {
                    AppError::fetch_failure(&file.name)
                }
            })?;

            let mut data = Vec::new();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|_| AppError::fetch_failure(&file.name))?;
                data.extend_from_slice(&chunk);
            }
            Ok(data)
        })
        .await
    }
}
