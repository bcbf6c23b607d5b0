//! Process-wide in-memory store, usable only as the fallback tier.
//!
//! Contents are lost on restart. Selected with `FALLBACK_STORE=memory` for
//! deployments without a writable filesystem.

use tokio::sync::RwLock;

use super::persistence::{RecordStore, StoreError};
use crate::records::{StoredRecords, SubmissionRecord};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<StoredRecords>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<StoredRecords, StoreError> {
        Ok(self.records.read().await.clone())
    }
}
