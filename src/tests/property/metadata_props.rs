//! Property-based tests for the metadata projection
//!
//! Tests invariants:
//! - Risk and affinity stay within [0, 100] for any record
//! - Angel status flips exactly at sequence 3
//! - Published values always carry the six registered keys
//! - Derivation is pure: same record and instant, same snapshot

use chrono::{Duration, Utc};
use proptest::prelude::*;

use crate::core::pathway::PathwayId;
use crate::core::progression::{derive_metadata, ProgressionRecord};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// Generate one of the 22 pathways.
fn arb_pathway() -> impl Strategy<Value = PathwayId> {
    (0usize..PathwayId::ALL.len()).prop_map(|i| PathwayId::ALL[i])
}

/// Generate a progression record with an assigned pathway and arbitrary
/// in-range counters.
fn arb_assigned_record() -> impl Strategy<Value = ProgressionRecord> {
    (
        arb_pathway(),
        0i64..=9,              // sequence
        0i64..100_000,         // spiritual_points
        0i64..1_000,           // total_advancements
        0i64..1_000,           // lose_control_count
        0i64..3_650,           // days since assignment
    )
        .prop_map(|(pathway, sequence, points, advancements, losses, days)| {
            let mut record = ProgressionRecord::new("100", "prop-user");
            record.pathway = Some(pathway);
            record.sequence = sequence;
            record.spiritual_points = points;
            record.total_advancements = advancements;
            record.lose_control_count = losses;
            record.assigned_at = Some(Utc::now() - Duration::days(days));
            record
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: risk and affinity are always within [0, 100]
    #[test]
    fn prop_derived_percentages_stay_bounded(record in arb_assigned_record()) {
        let snapshot = derive_metadata(&record, Utc::now());
        prop_assert!(
            (0..=100).contains(&snapshot.lose_control_risk),
            "risk {} out of bounds for sequence {} with {} losses",
            snapshot.lose_control_risk,
            record.sequence,
            record.lose_control_count
        );
        prop_assert!(
            (0..=100).contains(&snapshot.pathway_affinity),
            "affinity {} out of bounds for {} points and {} advancements",
            snapshot.pathway_affinity,
            record.spiritual_points,
            record.total_advancements
        );
    }

    /// Property: angel status flips exactly at sequence 3
    #[test]
    fn prop_angel_tracks_sequence_threshold(record in arb_assigned_record()) {
        let snapshot = derive_metadata(&record, Utc::now());
        prop_assert_eq!(
            snapshot.is_angel,
            record.sequence <= 3,
            "sequence {} produced is_angel {}",
            record.sequence,
            snapshot.is_angel
        );
    }

    /// Property: published role-connection values carry the six registered
    /// keys, with booleans encoded as 0/1 integers
    #[test]
    fn prop_published_values_match_registered_keys(record in arb_assigned_record()) {
        let values = derive_metadata(&record, Utc::now()).role_connection_values();
        let object = values.as_object().expect("values must be an object");

        for key in [
            "sequence",
            "beyonder_days",
            "advancements",
            "lost_control",
            "is_angel",
            "has_pathway",
        ] {
            prop_assert!(object.contains_key(key), "missing key {}", key);
        }
        let angel = values["is_angel"].as_i64().expect("is_angel must be an integer");
        prop_assert!(angel == 0 || angel == 1, "is_angel was {}", angel);
        prop_assert_eq!(values["has_pathway"].as_i64(), Some(1));
    }

    /// Property: derivation is pure for a fixed instant
    #[test]
    fn prop_derivation_is_deterministic(record in arb_assigned_record()) {
        let now = Utc::now();
        let first = derive_metadata(&record, now);
        let second = derive_metadata(&record, now);
        prop_assert_eq!(first, second);
    }

    /// Property: an unassigned record always projects the fixed baseline,
    /// whatever its counters claim
    #[test]
    fn prop_unassigned_projects_baseline(
        sequence in 0i64..=9,
        points in 0i64..100_000,
        losses in 0i64..1_000,
    ) {
        let mut record = ProgressionRecord::new("100", "prop-user");
        record.sequence = sequence;
        record.spiritual_points = points;
        record.lose_control_count = losses;

        let snapshot = derive_metadata(&record, Utc::now());
        prop_assert!(!snapshot.has_pathway);
        prop_assert_eq!(snapshot.pathway.as_str(), "none");
        prop_assert_eq!(snapshot.lose_control_risk, 0);
        prop_assert_eq!(snapshot.pathway_affinity, 0);
        prop_assert_eq!(snapshot.days_active, 0);
    }
}
