//! Beyonder progression database operations
//!
//! Implements the progression store contract on top of the SQLite pool.

use async_trait::async_trait;

use super::models::{AdvancementRow, BeyonderRow, StabilityCheckRow};
use super::Database;
use crate::core::progression::{
    AdvancementEntry, NewAdvancement, NewStabilityCheck, ProgressionRecord, ProgressionStore,
    StabilityCheckEntry, StoreResult,
};

#[async_trait]
impl ProgressionStore for Database {
    // =========================================================================
    // Record Operations
    // =========================================================================

    async fn get(&self, user_id: &str) -> StoreResult<Option<ProgressionRecord>> {
        let row = sqlx::query_as::<_, BeyonderRow>("SELECT * FROM beyonders WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(ProgressionRecord::from))
    }

    async fn upsert(&self, record: &ProgressionRecord) -> StoreResult<ProgressionRecord> {
        // created_at survives replacement; everything else takes the new value
        sqlx::query(
            r#"
            INSERT INTO beyonders (user_id, username, pathway, sequence, spiritual_points,
                total_advancements, lose_control_count, assigned_at, assigned_by,
                last_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                username = excluded.username,
                pathway = excluded.pathway,
                sequence = excluded.sequence,
                spiritual_points = excluded.spiritual_points,
                total_advancements = excluded.total_advancements,
                lose_control_count = excluded.lose_control_count,
                assigned_at = excluded.assigned_at,
                assigned_by = excluded.assigned_by,
                last_active = excluded.last_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.user_id)
        .bind(&record.username)
        .bind(record.pathway.map(|p| p.as_str()))
        .bind(record.sequence)
        .bind(record.spiritual_points)
        .bind(record.total_advancements)
        .bind(record.lose_control_count)
        .bind(record.assigned_at)
        .bind(record.assigned_by.as_deref())
        .bind(record.last_active)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(self.pool())
        .await?;

        Ok(record.clone())
    }

    async fn delete(&self, user_id: &str) -> StoreResult<bool> {
        // Transaction so the record and every history row vanish together
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM advancement_history WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM stability_checks WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM beyonders WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> StoreResult<Vec<ProgressionRecord>> {
        let rows = sqlx::query_as::<_, BeyonderRow>("SELECT * FROM beyonders ORDER BY user_id")
            .fetch_all(self.pool())
            .await?;
        Ok(rows.into_iter().map(ProgressionRecord::from).collect())
    }

    // =========================================================================
    // History Operations
    // =========================================================================

    async fn insert_advancement(&self, entry: &NewAdvancement) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO advancement_history (user_id, pathway, from_sequence, to_sequence,
                advanced_by, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.user_id)
        .bind(entry.pathway.as_str())
        .bind(entry.from_sequence)
        .bind(entry.to_sequence)
        .bind(entry.advanced_by.as_deref())
        .bind(entry.recorded_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn insert_stability_check(&self, entry: &NewStabilityCheck) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO stability_checks (user_id, pathway, sequence, risk_percent,
                roll, lost_control, rolled_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.user_id)
        .bind(entry.pathway.as_str())
        .bind(entry.sequence)
        .bind(entry.risk_percent)
        .bind(entry.roll)
        .bind(entry.lost_control)
        .bind(entry.rolled_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn advancements_for(
        &self,
        user_id: &str,
        limit: i64,
    ) -> StoreResult<Vec<AdvancementEntry>> {
        // id breaks ties between same-instant rows
        let rows = sqlx::query_as::<_, AdvancementRow>(
            r#"
            SELECT * FROM advancement_history
            WHERE user_id = ?
            ORDER BY recorded_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(AdvancementEntry::from).collect())
    }

    async fn stability_checks_for(
        &self,
        user_id: &str,
        limit: i64,
    ) -> StoreResult<Vec<StabilityCheckEntry>> {
        let rows = sqlx::query_as::<_, StabilityCheckRow>(
            r#"
            SELECT * FROM stability_checks
            WHERE user_id = ?
            ORDER BY rolled_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(StabilityCheckEntry::from).collect())
    }
}
