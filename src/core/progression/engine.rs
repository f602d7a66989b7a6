//! Progression Engine
//!
//! State transitions over per-user progression records:
//! - Pathway assignment (self-service and administrative override)
//! - Sequence advancement and direct sequence placement
//! - Stability (lose-control) checks with audited rolls
//! - Point grants, resets, and full user removal
//!
//! Mutations for the same user id are serialized through a per-user lock;
//! reads run lock-free against the store. Direct-message notifications are
//! best effort and never fail an operation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::{ProgressionError, ProgressionResult};
use super::metadata::{derive_metadata, MetadataSnapshot};
use super::records::{
    AdvancementEntry, NewAdvancement, NewStabilityCheck, ProgressionRecord, StabilityCheckEntry,
};
use super::stats::GuildStats;
use super::store::ProgressionStore;
use crate::core::pathway::{PathwayId, TierDefinition, MAX_SEQUENCE, MIN_SEQUENCE};

// ============================================================================
// Request/Outcome Types
// ============================================================================

/// Request for a stability check.
#[derive(Debug, Clone, Default)]
pub struct StabilityCheckRequest {
    pub user_id: String,
    /// Override the natural roll (for testing/GM fiat).
    pub forced_roll: Option<f64>,
}

/// Outcome of a completed sequence change.
#[derive(Debug, Clone)]
pub struct AdvanceOutcome {
    pub record: ProgressionRecord,
    pub pathway: PathwayId,
    pub from: TierDefinition,
    pub to: TierDefinition,
}

/// Outcome of a stability check.
#[derive(Debug, Clone)]
pub struct StabilityOutcome {
    pub record: ProgressionRecord,
    pub pathway: PathwayId,
    pub sequence: i64,
    pub tier_name: &'static str,
    pub risk_percent: u8,
    pub roll: f64,
    pub lost_control: bool,
}

// ============================================================================
// Notifier
// ============================================================================

/// Best-effort user notification hook, typically backed by Discord DMs.
///
/// Delivery failure is logged and swallowed; it never fails the operation
/// that triggered the notification.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        user_id: &str,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

// ============================================================================
// Progression Engine
// ============================================================================

/// Core engine for progression state transitions.
pub struct ProgressionEngine {
    store: Arc<dyn ProgressionStore>,
    notifier: Option<Arc<dyn Notifier>>,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ProgressionEngine {
    /// Default number of history entries returned to display surfaces.
    pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

    pub fn new(store: Arc<dyn ProgressionStore>) -> Self {
        Self {
            store,
            notifier: None,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Attach a notification channel for assignment and advancement events.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Fetch (or create) the serialization lock for a user id.
    async fn lock_for(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock().await;
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn notify_best_effort(&self, user_id: &str, message: String) {
        if let Some(notifier) = &self.notifier {
            if let Err(error) = notifier.notify(user_id, &message).await {
                warn!(user_id = %user_id, error = %error, "Notification delivery failed");
            }
        }
    }

    async fn require(&self, user_id: &str) -> ProgressionResult<ProgressionRecord> {
        self.store
            .get(user_id)
            .await?
            .ok_or_else(|| ProgressionError::NotFound(user_id.to_string()))
    }

    fn tier_of(pathway: PathwayId, sequence: i64) -> ProgressionResult<TierDefinition> {
        pathway
            .definition()
            .tier(sequence)
            .copied()
            .ok_or(ProgressionError::InvalidRange {
                value: sequence,
                min: MIN_SEQUENCE,
                max: MAX_SEQUENCE,
            })
    }

    // ========================================================================
    // Assignment
    // ========================================================================

    /// Self-service pathway assignment. Creates the record on first contact;
    /// rejects when a pathway is already set.
    pub async fn assign_pathway(
        &self,
        user_id: &str,
        username: &str,
        pathway: PathwayId,
    ) -> ProgressionResult<ProgressionRecord> {
        self.assign_inner(user_id, username, pathway, user_id, false)
            .await
    }

    /// Administrative assignment: replaces any existing pathway and resets
    /// the sequence to 9.
    pub async fn force_assign_pathway(
        &self,
        user_id: &str,
        username: &str,
        pathway: PathwayId,
        assigned_by: &str,
    ) -> ProgressionResult<ProgressionRecord> {
        self.assign_inner(user_id, username, pathway, assigned_by, true)
            .await
    }

    async fn assign_inner(
        &self,
        user_id: &str,
        username: &str,
        pathway: PathwayId,
        assigned_by: &str,
        override_existing: bool,
    ) -> ProgressionResult<ProgressionRecord> {
        let lock = self.lock_for(user_id).await;
        let _guard = lock.lock().await;

        let now = Utc::now();
        let mut record = match self.store.get(user_id).await? {
            Some(existing) => {
                if !override_existing {
                    if let Some(current) = existing.pathway {
                        return Err(ProgressionError::AlreadyAssigned {
                            user_id: user_id.to_string(),
                            pathway: current,
                        });
                    }
                }
                existing
            }
            None => ProgressionRecord::new(user_id, username),
        };

        record.username = username.to_string();
        record.pathway = Some(pathway);
        record.sequence = MAX_SEQUENCE;
        record.assigned_at = Some(now);
        record.assigned_by = Some(assigned_by.to_string());
        record.touch(now);
        let record = self.store.upsert(&record).await?;

        info!(
            user_id = %user_id,
            pathway = %pathway,
            assigned_by = %assigned_by,
            "Assigned pathway"
        );

        let starting_tier = pathway
            .definition()
            .tier(MAX_SEQUENCE)
            .map(|t| t.name)
            .unwrap_or("");
        self.notify_best_effort(
            user_id,
            format!(
                "🌫️ The gray fog parts. You now walk the {} pathway, beginning at Sequence 9: {}.",
                pathway.display(),
                starting_tier
            ),
        )
        .await;

        Ok(record)
    }

    // ========================================================================
    // Sequence Changes
    // ========================================================================

    /// Advance one sequence step (9 toward 0), recording the change.
    ///
    /// `advanced_by` is `None` for self-service advancement, otherwise the
    /// acting admin's user id.
    pub async fn advance_sequence(
        &self,
        user_id: &str,
        advanced_by: Option<&str>,
    ) -> ProgressionResult<AdvanceOutcome> {
        let lock = self.lock_for(user_id).await;
        let _guard = lock.lock().await;

        let now = Utc::now();
        let mut record = self.require(user_id).await?;
        let pathway = record.pathway.ok_or_else(|| {
            ProgressionError::PreconditionFailed("no pathway assigned".to_string())
        })?;
        if record.sequence <= MIN_SEQUENCE {
            return Err(ProgressionError::AlreadyAtMinimum);
        }

        let from_sequence = record.sequence;
        let to_sequence = from_sequence - 1;
        let from = Self::tier_of(pathway, from_sequence)?;
        let to = Self::tier_of(pathway, to_sequence)?;

        record.sequence = to_sequence;
        record.total_advancements += 1;
        record.touch(now);
        let record = self.store.upsert(&record).await?;
        self.store
            .insert_advancement(&NewAdvancement {
                user_id: user_id.to_string(),
                pathway,
                from_sequence,
                to_sequence,
                advanced_by: advanced_by.map(str::to_string),
                recorded_at: now,
            })
            .await?;

        info!(
            user_id = %user_id,
            from_sequence,
            to_sequence,
            admin = advanced_by.is_some(),
            "Advanced sequence"
        );

        self.notify_best_effort(
            user_id,
            format!(
                "⬆️ You have advanced to Sequence {}: {} of the {} pathway.",
                to_sequence,
                to.name,
                pathway.display_name()
            ),
        )
        .await;

        Ok(AdvanceOutcome {
            record,
            pathway,
            from,
            to,
        })
    }

    /// Place a user at an exact sequence within [0, 9], in either direction.
    ///
    /// Appends a history entry but does not touch the advancement counter;
    /// only step-by-step advancement counts as an advancement.
    pub async fn set_sequence(
        &self,
        user_id: &str,
        sequence: i64,
        set_by: &str,
    ) -> ProgressionResult<AdvanceOutcome> {
        if !(MIN_SEQUENCE..=MAX_SEQUENCE).contains(&sequence) {
            return Err(ProgressionError::InvalidRange {
                value: sequence,
                min: MIN_SEQUENCE,
                max: MAX_SEQUENCE,
            });
        }

        let lock = self.lock_for(user_id).await;
        let _guard = lock.lock().await;

        let now = Utc::now();
        let mut record = self.require(user_id).await?;
        let pathway = record.pathway.ok_or_else(|| {
            ProgressionError::PreconditionFailed("no pathway assigned".to_string())
        })?;

        let from_sequence = record.sequence;
        let from = Self::tier_of(pathway, from_sequence)?;
        let to = Self::tier_of(pathway, sequence)?;

        record.sequence = sequence;
        record.touch(now);
        let record = self.store.upsert(&record).await?;
        self.store
            .insert_advancement(&NewAdvancement {
                user_id: user_id.to_string(),
                pathway,
                from_sequence,
                to_sequence: sequence,
                advanced_by: Some(set_by.to_string()),
                recorded_at: now,
            })
            .await?;

        info!(
            user_id = %user_id,
            from_sequence,
            to_sequence = sequence,
            set_by = %set_by,
            "Set sequence"
        );

        Ok(AdvanceOutcome {
            record,
            pathway,
            from,
            to,
        })
    }

    // ========================================================================
    // Stability Checks
    // ========================================================================

    /// Roll against the current tier's corruption risk.
    ///
    /// The roll is uniform in [0, 100); losing control requires the roll to
    /// be strictly below the risk percent, so a tier with risk 0 can never
    /// lose control. Every check is recorded, win or lose.
    pub async fn roll_stability(
        &self,
        request: StabilityCheckRequest,
    ) -> ProgressionResult<StabilityOutcome> {
        let lock = self.lock_for(&request.user_id).await;
        let _guard = lock.lock().await;

        let now = Utc::now();
        let mut record = self.require(&request.user_id).await?;
        let pathway = record.pathway.ok_or_else(|| {
            ProgressionError::PreconditionFailed("no pathway assigned".to_string())
        })?;
        if record.sequence == MIN_SEQUENCE {
            return Err(ProgressionError::PreconditionFailed(
                "sequence 0 is beyond instability".to_string(),
            ));
        }

        let tier = Self::tier_of(pathway, record.sequence)?;
        let roll = match request.forced_roll {
            Some(value) => value,
            None => rand::thread_rng().gen_range(0.0..100.0),
        };
        // Equal-to-threshold rolls survive.
        let lost_control = roll < f64::from(tier.risk_percent);

        if lost_control {
            record.lose_control_count += 1;
        }
        record.touch(now);
        let record = self.store.upsert(&record).await?;
        self.store
            .insert_stability_check(&NewStabilityCheck {
                user_id: request.user_id.clone(),
                pathway,
                sequence: record.sequence,
                risk_percent: i64::from(tier.risk_percent),
                roll,
                lost_control,
                rolled_at: now,
            })
            .await?;

        debug!(
            user_id = %request.user_id,
            roll,
            risk_percent = tier.risk_percent,
            lost_control,
            forced = request.forced_roll.is_some(),
            "Stability check"
        );

        Ok(StabilityOutcome {
            sequence: record.sequence,
            record,
            pathway,
            tier_name: tier.name,
            risk_percent: tier.risk_percent,
            roll,
            lost_control,
        })
    }

    // ========================================================================
    // Administrative Mutations
    // ========================================================================

    /// Grant spiritual points. The amount must be positive.
    pub async fn give_points(
        &self,
        user_id: &str,
        amount: i64,
    ) -> ProgressionResult<ProgressionRecord> {
        if amount < 1 {
            return Err(ProgressionError::InvalidRange {
                value: amount,
                min: 1,
                max: i64::MAX,
            });
        }

        let lock = self.lock_for(user_id).await;
        let _guard = lock.lock().await;

        let now = Utc::now();
        let mut record = self.require(user_id).await?;
        record.spiritual_points += amount;
        record.touch(now);
        let record = self.store.upsert(&record).await?;

        info!(user_id = %user_id, amount, total = record.spiritual_points, "Granted spiritual points");
        Ok(record)
    }

    /// Return a user to the unassigned baseline. The record itself and all
    /// history rows survive; only the live progression state is cleared.
    pub async fn reset_progression(&self, user_id: &str) -> ProgressionResult<ProgressionRecord> {
        let lock = self.lock_for(user_id).await;
        let _guard = lock.lock().await;

        let now = Utc::now();
        let mut record = self.require(user_id).await?;
        record.clear_progression(now);
        let record = self.store.upsert(&record).await?;

        info!(user_id = %user_id, "Reset progression to unassigned baseline");
        Ok(record)
    }

    /// Remove a user entirely: the record and every history row, atomically.
    pub async fn delete_user(&self, user_id: &str) -> ProgressionResult<()> {
        let lock = self.lock_for(user_id).await;
        let _guard = lock.lock().await;

        let deleted = self.store.delete(user_id).await?;
        if !deleted {
            return Err(ProgressionError::NotFound(user_id.to_string()));
        }

        // The lock entry is no longer needed; the Arc keeps our guard alive.
        self.user_locks.lock().await.remove(user_id);

        info!(user_id = %user_id, "Deleted user and history");
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Fetch a record, `None` when the user has never interacted.
    pub async fn find(&self, user_id: &str) -> ProgressionResult<Option<ProgressionRecord>> {
        Ok(self.store.get(user_id).await?)
    }

    /// Fetch a record, failing with `NotFound` when absent.
    pub async fn get(&self, user_id: &str) -> ProgressionResult<ProgressionRecord> {
        self.require(user_id).await
    }

    /// Derive the publishable metadata snapshot for a user. Users without a
    /// record project the unassigned baseline.
    pub async fn metadata_for(&self, user_id: &str) -> ProgressionResult<MetadataSnapshot> {
        let snapshot = match self.store.get(user_id).await? {
            Some(record) => derive_metadata(&record, Utc::now()),
            None => MetadataSnapshot::unassigned(),
        };
        Ok(snapshot)
    }

    pub async fn advancement_history(
        &self,
        user_id: &str,
        limit: i64,
    ) -> ProgressionResult<Vec<AdvancementEntry>> {
        Ok(self.store.advancements_for(user_id, limit).await?)
    }

    pub async fn stability_history(
        &self,
        user_id: &str,
        limit: i64,
    ) -> ProgressionResult<Vec<StabilityCheckEntry>> {
        Ok(self.store.stability_checks_for(user_id, limit).await?)
    }

    /// Assigned users ranked strongest first: sequence ascending, then
    /// spiritual points descending, then user id for stability.
    pub async fn leaderboard(&self, limit: usize) -> ProgressionResult<Vec<ProgressionRecord>> {
        let mut records: Vec<ProgressionRecord> = self
            .store
            .list_all()
            .await?
            .into_iter()
            .filter(|r| r.pathway.is_some())
            .collect();
        records.sort_by(|a, b| {
            a.sequence
                .cmp(&b.sequence)
                .then(b.spiritual_points.cmp(&a.spiritual_points))
                .then(a.user_id.cmp(&b.user_id))
        });
        records.truncate(limit);
        Ok(records)
    }

    /// Members walking a given pathway, strongest first.
    pub async fn members_of(&self, pathway: PathwayId) -> ProgressionResult<Vec<ProgressionRecord>> {
        let mut records: Vec<ProgressionRecord> = self
            .store
            .list_all()
            .await?
            .into_iter()
            .filter(|r| r.pathway == Some(pathway))
            .collect();
        records.sort_by(|a, b| {
            a.sequence
                .cmp(&b.sequence)
                .then(b.spiritual_points.cmp(&a.spiritual_points))
        });
        Ok(records)
    }

    /// Aggregate statistics over every record.
    pub async fn stats(&self) -> ProgressionResult<GuildStats> {
        let records = self.store.list_all().await?;
        Ok(GuildStats::aggregate(&records))
    }
}
