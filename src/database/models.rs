//! Database Models
//!
//! Row shapes for the progression tables plus conversions into the domain
//! types. Timestamps are stored as RFC3339 TEXT and decoded through the
//! sqlx chrono support.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::warn;

use crate::core::pathway::PathwayId;
use crate::core::progression::{AdvancementEntry, ProgressionRecord, StabilityCheckEntry};

/// Row shape of the `beyonders` table.
#[derive(Debug, Clone, FromRow)]
pub struct BeyonderRow {
    pub user_id: String,
    pub username: String,
    pub pathway: Option<String>,
    pub sequence: i64,
    pub spiritual_points: i64,
    pub total_advancements: i64,
    pub lose_control_count: i64,
    pub assigned_at: Option<DateTime<Utc>>,
    pub assigned_by: Option<String>,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BeyonderRow> for ProgressionRecord {
    fn from(row: BeyonderRow) -> Self {
        let pathway = row.pathway.as_deref().and_then(|key| {
            let parsed = PathwayId::parse(key);
            if parsed.is_none() {
                warn!(user_id = %row.user_id, key, "Unknown pathway key in storage");
            }
            parsed
        });
        Self {
            user_id: row.user_id,
            username: row.username,
            pathway,
            sequence: row.sequence,
            spiritual_points: row.spiritual_points,
            total_advancements: row.total_advancements,
            lose_control_count: row.lose_control_count,
            assigned_at: row.assigned_at,
            assigned_by: row.assigned_by,
            last_active: row.last_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Row shape of the `advancement_history` table.
#[derive(Debug, Clone, FromRow)]
pub struct AdvancementRow {
    pub id: i64,
    pub user_id: String,
    pub pathway: String,
    pub from_sequence: i64,
    pub to_sequence: i64,
    pub advanced_by: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl From<AdvancementRow> for AdvancementEntry {
    fn from(row: AdvancementRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            pathway: row.pathway,
            from_sequence: row.from_sequence,
            to_sequence: row.to_sequence,
            advanced_by: row.advanced_by,
            recorded_at: row.recorded_at,
        }
    }
}

/// Row shape of the `stability_checks` table.
#[derive(Debug, Clone, FromRow)]
pub struct StabilityCheckRow {
    pub id: i64,
    pub user_id: String,
    pub pathway: String,
    pub sequence: i64,
    pub risk_percent: i64,
    pub roll: f64,
    pub lost_control: bool,
    pub rolled_at: DateTime<Utc>,
}

impl From<StabilityCheckRow> for StabilityCheckEntry {
    fn from(row: StabilityCheckRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            pathway: row.pathway,
            sequence: row.sequence,
            risk_percent: row.risk_percent,
            roll: row.roll,
            lost_control: row.lost_control,
            rolled_at: row.rolled_at,
        }
    }
}
