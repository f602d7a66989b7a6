//! Property-based tests for guild statistics aggregation
//!
//! Tests invariants:
//! - Rank buckets partition the full user set
//! - Pathway and sequence distributions cover assigned users exactly
//! - Distribution orderings hold for any roster
//! - Averages stay within the observed bounds

use proptest::prelude::*;

use crate::core::pathway::PathwayId;
use crate::core::progression::{GuildStats, ProgressionRecord, Rank};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// Generate one of the 22 pathways.
fn arb_pathway() -> impl Strategy<Value = PathwayId> {
    (0usize..PathwayId::ALL.len()).prop_map(|i| PathwayId::ALL[i])
}

/// Generate a single roster member, assigned or not.
fn arb_record() -> impl Strategy<Value = ProgressionRecord> {
    (
        prop::option::of(arb_pathway()),
        0i64..=9,      // sequence
        0i64..10_000,  // spiritual_points
        0i64..50,      // lose_control_count
    )
        .prop_map(|(pathway, sequence, points, losses)| {
            let mut record = ProgressionRecord::new("0", "prop-user");
            record.pathway = pathway;
            record.sequence = sequence;
            record.spiritual_points = points;
            record.lose_control_count = losses;
            record
        })
}

/// Generate a guild roster of up to 40 members.
fn arb_roster() -> impl Strategy<Value = Vec<ProgressionRecord>> {
    proptest::collection::vec(arb_record(), 0..40)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: rank buckets partition all users, unassigned included
    #[test]
    fn prop_rank_buckets_partition_users(records in arb_roster()) {
        let stats = GuildStats::aggregate(&records);
        prop_assert_eq!(
            stats.by_rank.values().sum::<usize>(),
            stats.total_users,
            "rank buckets do not partition {} users",
            stats.total_users
        );
        let unassigned = records.iter().filter(|r| r.pathway.is_none()).count();
        prop_assert!(
            stats.by_rank.get(&Rank::Initiate).copied().unwrap_or(0) >= unassigned,
            "initiate bucket misses unassigned users"
        );
    }

    /// Property: pathway and sequence distributions cover assigned users
    /// exactly, never the whole roster
    #[test]
    fn prop_distributions_cover_assigned_exactly(records in arb_roster()) {
        let stats = GuildStats::aggregate(&records);
        prop_assert!(stats.total_assigned <= stats.total_users);
        prop_assert_eq!(
            stats.by_pathway.values().sum::<usize>(),
            stats.total_assigned
        );
        prop_assert_eq!(
            stats.by_sequence.values().sum::<usize>(),
            stats.total_assigned
        );
    }

    /// Property: empty buckets never appear in any distribution
    #[test]
    fn prop_empty_buckets_are_omitted(records in arb_roster()) {
        let stats = GuildStats::aggregate(&records);
        prop_assert!(stats.by_pathway.values().all(|&count| count > 0));
        prop_assert!(stats.by_sequence.values().all(|&count| count > 0));
        prop_assert!(stats.by_rank.values().all(|&count| count > 0));
    }

    /// Property: sequence keys ascend and pathway counts never increase
    #[test]
    fn prop_distribution_orderings_hold(records in arb_roster()) {
        let stats = GuildStats::aggregate(&records);
        let sequences: Vec<i64> = stats.by_sequence.keys().copied().collect();
        prop_assert!(
            sequences.windows(2).all(|pair| pair[0] < pair[1]),
            "sequence keys {:?} not strictly ascending",
            sequences
        );
        let counts: Vec<usize> = stats.by_pathway.values().copied().collect();
        prop_assert!(
            counts.windows(2).all(|pair| pair[0] >= pair[1]),
            "pathway counts {:?} increase somewhere",
            counts
        );
    }

    /// Property: averages stay within the observed bounds of assigned users,
    /// and zero out for a roster with none
    #[test]
    fn prop_averages_stay_within_observed_bounds(records in arb_roster()) {
        let stats = GuildStats::aggregate(&records);
        let assigned: Vec<&ProgressionRecord> =
            records.iter().filter(|r| r.pathway.is_some()).collect();

        if assigned.is_empty() {
            prop_assert_eq!(stats.average_sequence, 0.0);
            prop_assert_eq!(stats.average_points, 0.0);
        } else {
            let min_seq = assigned.iter().map(|r| r.sequence).min().unwrap() as f64;
            let max_seq = assigned.iter().map(|r| r.sequence).max().unwrap() as f64;
            prop_assert!(
                stats.average_sequence >= min_seq && stats.average_sequence <= max_seq,
                "average sequence {} outside [{}, {}]",
                stats.average_sequence,
                min_seq,
                max_seq
            );
            let min_points = assigned.iter().map(|r| r.spiritual_points).min().unwrap() as f64;
            let max_points = assigned.iter().map(|r| r.spiritual_points).max().unwrap() as f64;
            prop_assert!(
                stats.average_points >= min_points && stats.average_points <= max_points,
                "average points {} outside [{}, {}]",
                stats.average_points,
                min_points,
                max_points
            );
        }
    }

    /// Property: lose-control totals sum every record, assigned or not
    #[test]
    fn prop_lose_control_total_sums_all_records(records in arb_roster()) {
        let stats = GuildStats::aggregate(&records);
        let expected: i64 = records.iter().map(|r| r.lose_control_count).sum();
        prop_assert_eq!(stats.total_lose_control_events, expected);
    }
}
