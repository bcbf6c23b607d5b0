//! JSON-file fallback store.
//!
//! DESIGN
//! ======
//! The whole store is one document, `{"rsvps": [...], "messages": [...]}`.
//! Each insert reads the document, appends, and writes it back. The write
//! lands in a uniquely named temporary file beside the target which is then
//! renamed over it, so readers only ever see a complete document.
//!
//! Inserts through one `FileRecordStore` hold a lock across the whole
//! read-modify-write cycle, so records written by the same process (such as
//! the two halves of a combined submission) never overwrite each other.
//! Separate processes sharing the file are not coordinated: their overlapping
//! cycles can drop a record, but never tear the file.
//!
//! ERROR HANDLING
//! ==============
//! A missing, empty, unreadable or malformed document reads as empty
//! collections; everything but a missing file is logged at `warn`. Only the
//! write is fatal for an insert.

#[cfg(test)]
#[path = "file_store_test.rs"]
mod file_store_test;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use super::persistence::{RecordStore, StoreError};
use crate::records::{StoredRecords, SubmissionRecord};

pub struct FileRecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileRecordStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> StoredRecords {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return StoredRecords::default(),
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "fallback file is unreadable; starting from empty");
                return StoredRecords::default();
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return StoredRecords::default();
        }
        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(error = %e, path = %self.path.display(), "fallback file is malformed; starting from empty");
            StoredRecords::default()
        })
    }

    async fn write_document(&self, doc: &StoredRecords) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::Io { path: dir.clone(), source })?;

        let file_name = self
            .path
            .file_name()
            .map_or_else(|| "submissions".into(), |n| n.to_string_lossy().into_owned());
        let tmp = dir.join(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

        let body = serde_json::to_vec_pretty(doc)?;
        if let Err(source) = tokio::fs::write(&tmp, &body).await {
            remove_stale(&tmp).await;
            return Err(StoreError::Io { path: tmp, source });
        }
        if let Err(source) = tokio::fs::rename(&tmp, &self.path).await {
            remove_stale(&tmp).await;
            return Err(StoreError::Io { path: self.path.clone(), source });
        }
        Ok(())
    }
}

async fn remove_stale(tmp: &Path) {
    if let Err(e) = tokio::fs::remove_file(tmp).await {
        if e.kind() != ErrorKind::NotFound {
            warn!(error = %e, path = %tmp.display(), "could not remove temporary fallback file");
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for FileRecordStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn insert(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document().await;
        doc.push(record.clone());
        self.write_document(&doc).await
    }

    async fn list(&self) -> Result<StoredRecords, StoreError> {
        let mut doc = self.read_document().await;
        doc.sort();
        Ok(doc)
    }
}
