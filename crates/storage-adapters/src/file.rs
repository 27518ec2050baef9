//! # File-backed document store
//!
//! Keeps every document in a [`MemoryDocumentStore`] and rewrites a single
//! JSON snapshot file after each mutation. The snapshot is written to a
//! sibling temp file first and renamed into place. A mutation whose snapshot
//! cannot be written is undone in memory before the error is returned.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use domains::{Document, DocumentStore, Patch, Query, Snapshot, StoreError};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::memory::{Collections, MemoryDocumentStore};

pub struct FileDocumentStore {
    inner: MemoryDocumentStore,
    path: PathBuf,
    /// Held across a mutation and its snapshot write, so a failed write can
    /// be undone before any other mutation lands.
    write_lock: Mutex<()>,
}

impl FileDocumentStore {
    /// Loads `path` if it exists, otherwise starts empty. Parent
    /// directories are created on demand.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let inner = match fs::read(&path).await {
            Ok(bytes) => {
                let collections: Collections = serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::Malformed(format!("{}: {e}", path.display())))?;
                info!(path = %path.display(), collections = collections.len(), "loaded document snapshot");
                MemoryDocumentStore::from_collections(collections)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "starting with an empty document store");
                MemoryDocumentStore::new()
            }
            Err(e) => return Err(io_error(e)),
        };

        Ok(Self {
            inner,
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Callers must hold `write_lock`.
    async fn write_snapshot(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&self.inner.export())
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        fs::write(&tmp, bytes).await.map_err(io_error)?;
        fs::rename(&tmp, &self.path).await.map_err(io_error)?;
        debug!(path = %self.path.display(), "document snapshot written");
        Ok(())
    }

    /// Writes the snapshot, or puts `previous` back for `collection/id` when
    /// the write fails.
    async fn persist_or_restore(
        &self,
        collection: &str,
        id: &str,
        previous: Option<Snapshot>,
    ) -> Result<(), StoreError> {
        let Err(e) = self.write_snapshot().await else {
            return Ok(());
        };

        warn!(error = %e, collection, id, "snapshot write failed, undoing change");
        match previous {
            Some(snapshot) => self.inner.set(collection, id, snapshot.data).await?,
            None => self.inner.delete(collection, id).await?,
        }
        Err(e)
    }
}

fn io_error(e: std::io::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    fn allocate_id(&self, collection: &str) -> String {
        self.inner.allocate_id(collection)
    }

    async fn add(&self, collection: &str, doc: Document) -> Result<String, StoreError> {
        let id = self.inner.allocate_id(collection);
        self.set(collection, &id, doc).await?;
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let previous = self.inner.get(collection, id).await?;
        self.inner.set(collection, id, doc).await?;
        self.persist_or_restore(collection, id, previous).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Snapshot>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Snapshot>, StoreError> {
        self.inner.query(collection, query).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Patch) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let previous = self.inner.get(collection, id).await?;
        self.inner.update(collection, id, patch).await?;
        self.persist_or_restore(collection, id, previous).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let Some(previous) = self.inner.get(collection, id).await? else {
            return Ok(());
        };
        self.inner.delete(collection, id).await?;
        self.persist_or_restore(collection, id, Some(previous)).await
    }
}
