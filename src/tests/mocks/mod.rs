//! Mock implementations for testing
//!
//! This module provides a mockall-backed progression store so engine
//! behavior can be exercised against injected backend failures without
//! touching a real database.

#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;

use crate::core::progression::{
    AdvancementEntry, NewAdvancement, NewStabilityCheck, ProgressionRecord, ProgressionStore,
    StabilityCheckEntry, StoreError, StoreResult,
};

// ============================================================================
// Progression Store Mock
// ============================================================================

mock! {
    pub Store {}

    #[async_trait]
    impl ProgressionStore for Store {
        async fn get(&self, user_id: &str) -> StoreResult<Option<ProgressionRecord>>;
        async fn upsert(&self, record: &ProgressionRecord) -> StoreResult<ProgressionRecord>;
        async fn delete(&self, user_id: &str) -> StoreResult<bool>;
        async fn list_all(&self) -> StoreResult<Vec<ProgressionRecord>>;
        async fn insert_advancement(&self, entry: &NewAdvancement) -> StoreResult<()>;
        async fn insert_stability_check(&self, entry: &NewStabilityCheck) -> StoreResult<()>;
        async fn advancements_for(
            &self,
            user_id: &str,
            limit: i64,
        ) -> StoreResult<Vec<AdvancementEntry>>;
        async fn stability_checks_for(
            &self,
            user_id: &str,
            limit: i64,
        ) -> StoreResult<Vec<StabilityCheckEntry>>;
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a mock store where every operation reports a backend failure.
pub fn create_failing_store() -> MockStore {
    let mut mock = MockStore::new();

    mock.expect_get()
        .returning(|_| Err(StoreError::Backend("connection lost".to_string())));
    mock.expect_upsert()
        .returning(|_| Err(StoreError::Backend("connection lost".to_string())));
    mock.expect_delete()
        .returning(|_| Err(StoreError::Backend("connection lost".to_string())));
    mock.expect_list_all()
        .returning(|| Err(StoreError::Backend("connection lost".to_string())));

    mock
}

/// Create a mock store that serves a single fixed record.
pub fn create_store_with_record(record: ProgressionRecord) -> MockStore {
    let mut mock = MockStore::new();
    let stored = record.clone();

    mock.expect_get()
        .returning(move |user_id| {
            if user_id == stored.user_id {
                Ok(Some(stored.clone()))
            } else {
                Ok(None)
            }
        });
    mock.expect_upsert().returning(|record| Ok(record.clone()));
    mock.expect_insert_advancement().returning(|_| Ok(()));
    mock.expect_insert_stability_check().returning(|_| Ok(()));

    mock
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failing_store_reports_backend_error() {
        let mock = create_failing_store();

        let error = mock.get("alice").await.unwrap_err();
        assert!(matches!(error, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn test_store_with_record_serves_only_its_user() {
        let record = ProgressionRecord::new("alice", "Alice");
        let mock = create_store_with_record(record);

        assert!(mock.get("alice").await.unwrap().is_some());
        assert!(mock.get("bob").await.unwrap().is_none());
    }
}
