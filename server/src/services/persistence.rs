//! Submission persistence gateway: primary store, then fallback, then failure.
//!
//! DESIGN
//! ======
//! Every submission is offered to the primary store first, bounded by a
//! per-attempt timeout. Any primary failure (connection, auth, query,
//! timeout) is logged and the record goes to the fallback store instead.
//! Only when both tiers fail is the submission reported as failed; the
//! caller turns that into a retry prompt for the guest.
//!
//! The primary tier is optional. Without a database the fallback carries
//! every write, which keeps the invitation usable in a bare deployment.
//!
//! READ PATH
//! =========
//! Records written during a primary outage live only in the fallback, so
//! listings merge both tiers. A failing tier is skipped with a warning; the
//! read fails only when no configured tier answers.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::records::{StoredRecords, SubmissionRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("timed out after {0}ms")]
    Timeout(u128),
    #[error("io error on {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A backend that can hold submission records.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Store one record.
    async fn insert(&self, record: &SubmissionRecord) -> Result<(), StoreError>;

    /// Every record held by this store.
    async fn list(&self) -> Result<StoredRecords, StoreError>;
}

/// Which tier accepted a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    #[serde(rename = "primary")]
    PrimaryStore,
    #[serde(rename = "fallback")]
    FallbackStore,
    #[serde(rename = "none")]
    None,
}

impl Tier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PrimaryStore => "primary",
            Self::FallbackStore => "fallback",
            Self::None => "none",
        }
    }

    /// The less durable of two tiers, for reporting a multi-record submission.
    #[must_use]
    pub fn weakest(self, other: Tier) -> Tier {
        match (self, other) {
            (Self::None, _) | (_, Self::None) => Self::None,
            (Self::FallbackStore, _) | (_, Self::FallbackStore) => Self::FallbackStore,
            _ => Self::PrimaryStore,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceResult {
    pub succeeded: bool,
    pub tier: Tier,
    /// Fallback error when both tiers failed.
    pub error: Option<String>,
}

impl PersistenceResult {
    fn stored(tier: Tier) -> Self {
        Self { succeeded: true, tier, error: None }
    }

    fn failed(error: String) -> Self {
        Self { succeeded: false, tier: Tier::None, error: Some(error) }
    }
}

pub struct PersistenceGateway {
    primary: Option<Arc<dyn RecordStore>>,
    fallback: Arc<dyn RecordStore>,
    primary_timeout: Duration,
}

impl PersistenceGateway {
    #[must_use]
    pub fn new(primary: Option<Arc<dyn RecordStore>>, fallback: Arc<dyn RecordStore>, primary_timeout: Duration) -> Self {
        Self { primary, fallback, primary_timeout }
    }

    #[must_use]
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Store `record` in the first tier that accepts it.
    pub async fn persist(&self, record: &SubmissionRecord) -> PersistenceResult {
        if let Some(primary) = &self.primary {
            match self.bounded(primary.insert(record)).await {
                Ok(()) => {
                    info!(kind = record.kind(), id = %record.id(), store = primary.name(), "submission stored");
                    return PersistenceResult::stored(Tier::PrimaryStore);
                }
                Err(e) => {
                    warn!(error = %e, kind = record.kind(), id = %record.id(), store = primary.name(), "primary store failed; using fallback");
                }
            }
        }

        match self.fallback.insert(record).await {
            Ok(()) => {
                info!(kind = record.kind(), id = %record.id(), store = self.fallback.name(), "submission stored in fallback");
                PersistenceResult::stored(Tier::FallbackStore)
            }
            Err(e) => {
                error!(error = %e, kind = record.kind(), id = %record.id(), store = self.fallback.name(), "fallback store failed; submission lost");
                PersistenceResult::failed(e.to_string())
            }
        }
    }

    /// Run a primary-store call under the per-attempt timeout.
    async fn bounded<T>(&self, call: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
        tokio::time::timeout(self.primary_timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.primary_timeout.as_millis()))?
    }

    /// Every stored record across both tiers, ordered by `created_at`.
    ///
    /// # Errors
    ///
    /// Returns the fallback's error when no tier could be read.
    pub async fn list_all(&self) -> Result<StoredRecords, StoreError> {
        let mut merged = None;

        if let Some(primary) = &self.primary {
            match self.bounded(primary.list()).await {
                Ok(records) => merged = Some(records),
                Err(e) => warn!(error = %e, store = primary.name(), "primary listing failed; showing fallback only"),
            }
        }

        match self.fallback.list().await {
            Ok(records) => {
                let mut all = merged.unwrap_or_default();
                all.merge(records);
                Ok(all)
            }
            Err(e) => match merged {
                Some(mut all) => {
                    warn!(error = %e, store = self.fallback.name(), "fallback listing failed; showing primary only");
                    all.sort();
                    Ok(all)
                }
                None => Err(e),
            },
        }
    }
}
