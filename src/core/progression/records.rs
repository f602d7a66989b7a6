//! Progression Records
//!
//! The per-user progression entity plus the append-only audit entries
//! written alongside transitions. The record is the single source of truth;
//! metadata snapshots and history rows are derived or append-only views.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::pathway::{PathwayId, TierDefinition, MAX_SEQUENCE};

// =============================================================================
// Rank
// =============================================================================

/// Coarse power classification derived purely from the sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Initiate,
    Beyonder,
    Saint,
    Angel,
    TrueGod,
}

impl Rank {
    /// Bucket a sequence number: 0 is True God, 1-3 Angel, 4-6 Saint, 7-9
    /// Beyonder. `None` (no pathway) is Initiate.
    pub fn from_sequence(sequence: Option<i64>) -> Self {
        match sequence {
            None => Rank::Initiate,
            Some(0) => Rank::TrueGod,
            Some(1..=3) => Rank::Angel,
            Some(4..=6) => Rank::Saint,
            Some(_) => Rank::Beyonder,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Initiate => "initiate",
            Rank::Beyonder => "beyonder",
            Rank::Saint => "saint",
            Rank::Angel => "angel",
            Rank::TrueGod => "true_god",
        }
    }

    /// Human-readable title for embeds and profile views.
    pub fn title(&self) -> &'static str {
        match self {
            Rank::Initiate => "Initiate",
            Rank::Beyonder => "Beyonder",
            Rank::Saint => "Saint",
            Rank::Angel => "Angel",
            Rank::TrueGod => "True God",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Progression record
// =============================================================================

/// One Discord user's progression state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionRecord {
    pub user_id: String,
    pub username: String,
    /// `None` until a pathway is assigned, and again after a reset.
    pub pathway: Option<PathwayId>,
    /// Always within [0, 9]; meaningful only while a pathway is assigned.
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

impl ProgressionRecord {
    /// Fresh record at the unassigned baseline.
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            username: username.into(),
            pathway: None,
            sequence: MAX_SEQUENCE,
            spiritual_points: 0,
            total_advancements: 0,
            lose_control_count: 0,
            assigned_at: None,
            assigned_by: None,
            last_active: now,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.pathway.is_some()
    }

    pub fn rank(&self) -> Rank {
        Rank::from_sequence(self.pathway.map(|_| self.sequence))
    }

    /// Current tier definition, when a pathway is assigned.
    pub fn tier(&self) -> Option<&'static TierDefinition> {
        self.pathway.and_then(|p| p.definition().tier(self.sequence))
    }

    /// Return to the unassigned baseline, keeping identity and `created_at`.
    pub fn clear_progression(&mut self, now: DateTime<Utc>) {
        self.pathway = None;
        self.sequence = MAX_SEQUENCE;
        self.spiritual_points = 0;
        self.total_advancements = 0;
        self.lose_control_count = 0;
        self.assigned_at = None;
        self.assigned_by = None;
        self.last_active = now;
        self.updated_at = now;
    }

    /// Stamp the activity timestamps; called by every mutating operation.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active = now;
        self.updated_at = now;
    }
}

// =============================================================================
// Audit entries
// =============================================================================

/// Completed sequence change, as read back from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancementEntry {
    pub id: i64,
    pub user_id: String,
    /// Stored pathway key; kept as text so legacy rows still render.
    pub pathway: String,
    pub from_sequence: i64,
    pub to_sequence: i64,
    /// `None` for self-service advancement, otherwise the admin's user id.
    pub advanced_by: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Sequence change about to be appended.
#[derive(Debug, Clone)]
pub struct NewAdvancement {
    pub user_id: String,
    pub pathway: PathwayId,
    pub from_sequence: i64,
    pub to_sequence: i64,
    pub advanced_by: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Stability check result, as read back from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityCheckEntry {
    pub id: i64,
    pub user_id: String,
    pub pathway: String,
    pub sequence: i64,
    pub risk_percent: i64,
    pub roll: f64,
    pub lost_control: bool,
    pub rolled_at: DateTime<Utc>,
}

/// Stability check about to be appended.
#[derive(Debug, Clone)]
pub struct NewStabilityCheck {
    pub user_id: String,
    pub pathway: PathwayId,
    pub sequence: i64,
    pub risk_percent: i64,
    pub roll: f64,
    pub lost_control: bool,
    pub rolled_at: DateTime<Utc>,
}
