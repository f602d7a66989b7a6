//! Metadata Projection
//!
//! Pure derivation of the externally published profile fields from a
//! progression record. Deterministic: the same record and the same `now`
//! always produce the same snapshot, so it can be recomputed freely and
//! never needs to be stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::records::{ProgressionRecord, Rank};
use crate::core::pathway::MAX_SEQUENCE;

/// Risk contribution per sequence step taken below 9.
const RISK_PER_STEP: i64 = 10;
/// Risk contribution per recorded lose-control event.
const RISK_PER_LOSS: i64 = 5;
/// Affinity contribution per advancement.
const AFFINITY_PER_ADVANCEMENT: i64 = 8;
/// Spiritual points per affinity point.
const POINTS_PER_AFFINITY: i64 = 10;

/// Snapshot published to Discord role connections and profile views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    /// Pathway key, or `"none"` when unassigned.
    pub pathway: String,
    pub sequence: i64,
    pub rank: Rank,
    pub total_advancements: i64,
    /// Whole days since assignment, 0 when unassigned.
    pub days_active: i64,
    pub lose_control_count: i64,
    /// Estimated instability in [0, 100].
    pub lose_control_risk: i64,
    /// Accumulated attunement in [0, 100].
    pub pathway_affinity: i64,
    pub is_angel: bool,
    pub has_pathway: bool,
}

impl MetadataSnapshot {
    /// Baseline snapshot for users with no pathway (or no record at all).
    pub fn unassigned() -> Self {
        Self {
            pathway: "none".to_string(),
            sequence: MAX_SEQUENCE,
            rank: Rank::Initiate,
            total_advancements: 0,
            days_active: 0,
            lose_control_count: 0,
            lose_control_risk: 0,
            pathway_affinity: 0,
            is_angel: false,
            has_pathway: false,
        }
    }

    /// Role-connection values keyed by the registered metadata schema.
    /// Discord expects booleans as 0/1 integers here.
    pub fn role_connection_values(&self) -> Value {
        json!({
            "sequence": self.sequence,
            "beyonder_days": self.days_active,
            "advancements": self.total_advancements,
            "lost_control": self.lose_control_count,
            "is_angel": if self.is_angel { 1 } else { 0 },
            "has_pathway": if self.has_pathway { 1 } else { 0 },
        })
    }
}

/// Derive the publishable snapshot from a record at a given instant.
pub fn derive_metadata(record: &ProgressionRecord, now: DateTime<Utc>) -> MetadataSnapshot {
    let Some(pathway) = record.pathway else {
        return MetadataSnapshot::unassigned();
    };

    let sequence = record.sequence;
    let days_active = record
        .assigned_at
        .map(|assigned| (now - assigned).num_days().max(0))
        .unwrap_or(0);
    let lose_control_risk = ((MAX_SEQUENCE - sequence) * RISK_PER_STEP
        + record.lose_control_count * RISK_PER_LOSS)
        .clamp(0, 100);
    let pathway_affinity = (record.spiritual_points / POINTS_PER_AFFINITY
        + record.total_advancements * AFFINITY_PER_ADVANCEMENT)
        .clamp(0, 100);

    MetadataSnapshot {
        pathway: pathway.as_str().to_string(),
        sequence,
        rank: Rank::from_sequence(Some(sequence)),
        total_advancements: record.total_advancements,
        days_active,
        lose_control_count: record.lose_control_count,
        lose_control_risk,
        pathway_affinity,
        is_angel: sequence <= 3,
        has_pathway: true,
    }
}
