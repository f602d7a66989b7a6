//! Progression Store Contract
//!
//! The engine depends only on this trait; any backend satisfying the
//! contract is acceptable. The SQLite implementation lives in
//! `crate::database`.

use async_trait::async_trait;
use thiserror::Error;

use super::records::{
    AdvancementEntry, NewAdvancement, NewStabilityCheck, ProgressionRecord, StabilityCheckEntry,
};

/// Errors surfaced by a progression store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract for progression records and their audit trails.
///
/// `delete` removes the record and all dependent history rows atomically;
/// partial deletion must never be observable.
#[async_trait]
pub trait ProgressionStore: Send + Sync {
    /// Fetch a record by user id.
    async fn get(&self, user_id: &str) -> StoreResult<Option<ProgressionRecord>>;

    /// Insert or fully replace a record, returning the stored form.
    async fn upsert(&self, record: &ProgressionRecord) -> StoreResult<ProgressionRecord>;

    /// Remove a record and its history. Returns false when no record existed.
    async fn delete(&self, user_id: &str) -> StoreResult<bool>;

    /// All records, ordered for stable iteration.
    async fn list_all(&self) -> StoreResult<Vec<ProgressionRecord>>;

    /// Append a completed sequence change.
    async fn insert_advancement(&self, entry: &NewAdvancement) -> StoreResult<()>;

    /// Append a stability check result.
    async fn insert_stability_check(&self, entry: &NewStabilityCheck) -> StoreResult<()>;

    /// Most recent sequence changes for a user, newest first.
    async fn advancements_for(
        &self,
        user_id: &str,
        limit: i64,
    ) -> StoreResult<Vec<AdvancementEntry>>;

    /// Most recent stability checks for a user, newest first.
    async fn stability_checks_for(
        &self,
        user_id: &str,
        limit: i64,
    ) -> StoreResult<Vec<StabilityCheckEntry>>;
}
