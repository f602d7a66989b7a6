//! Progression Engine Tests
//!
//! Transition-by-transition coverage: assignment rules, advancement
//! bounds, forced-roll stability boundaries, administrative mutations,
//! and backend failure mapping.

use std::sync::Arc;

use rstest::rstest;

use crate::core::pathway::PathwayId;
use crate::core::progression::{
    MetadataSnapshot, ProgressionEngine, ProgressionError, StabilityCheckRequest,
};
use crate::tests::common::{assign_test_beyonder, create_test_engine};
use crate::tests::mocks::create_failing_store;

// =============================================================================
// Assignment Tests
// =============================================================================

#[tokio::test]
async fn test_assign_starts_at_sequence_nine() {
    let (engine, _temp) = create_test_engine().await;

    let record = assign_test_beyonder(&engine, "100", PathwayId::Fool).await;

    assert_eq!(record.pathway, Some(PathwayId::Fool));
    assert_eq!(record.sequence, 9);
    assert_eq!(record.assigned_by.as_deref(), Some("100"));
    assert!(record.assigned_at.is_some());
}

#[tokio::test]
async fn test_self_assign_rejected_when_already_assigned() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;

    let error = engine
        .assign_pathway("100", "user-100", PathwayId::Door)
        .await
        .unwrap_err();

    match error {
        ProgressionError::AlreadyAssigned { user_id, pathway } => {
            assert_eq!(user_id, "100");
            assert_eq!(pathway, PathwayId::Fool);
        }
        other => panic!("expected AlreadyAssigned, got {other:?}"),
    }
}

#[tokio::test]
async fn test_assign_allowed_again_after_reset() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;

    engine
        .reset_progression("100")
        .await
        .expect("Failed to reset progression");
    let record = engine
        .assign_pathway("100", "user-100", PathwayId::Door)
        .await
        .expect("Failed to reassign pathway");

    assert_eq!(record.pathway, Some(PathwayId::Door));
    assert_eq!(record.sequence, 9);
}

#[tokio::test]
async fn test_force_assign_overrides_and_resets_sequence() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;
    engine
        .advance_sequence("100", None)
        .await
        .expect("Failed to advance");

    let record = engine
        .force_assign_pathway("100", "user-100", PathwayId::Door, "999")
        .await
        .expect("Failed to force assign");

    assert_eq!(record.pathway, Some(PathwayId::Door));
    assert_eq!(record.sequence, 9);
    assert_eq!(record.assigned_by.as_deref(), Some("999"));
}

// =============================================================================
// Advancement Tests
// =============================================================================

#[tokio::test]
async fn test_advance_decrements_and_counts() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;

    let outcome = engine
        .advance_sequence("100", None)
        .await
        .expect("Failed to advance");

    assert_eq!(outcome.record.sequence, 8);
    assert_eq!(outcome.record.total_advancements, 1);
    assert_eq!(outcome.from.sequence, 9);
    assert_eq!(outcome.to.sequence, 8);
    assert_eq!(outcome.from.name, "Seer");
}

#[tokio::test]
async fn test_advance_rejected_at_minimum() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;
    engine
        .set_sequence("100", 0, "999")
        .await
        .expect("Failed to set sequence");

    let error = engine.advance_sequence("100", None).await.unwrap_err();
    assert!(matches!(error, ProgressionError::AlreadyAtMinimum));
    assert!(error.is_rejection());
}

#[tokio::test]
async fn test_advance_requires_pathway() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;
    engine
        .reset_progression("100")
        .await
        .expect("Failed to reset progression");

    let error = engine.advance_sequence("100", None).await.unwrap_err();
    assert!(matches!(error, ProgressionError::PreconditionFailed(_)));
}

#[tokio::test]
async fn test_advance_unknown_user_not_found() {
    let (engine, _temp) = create_test_engine().await;

    let error = engine.advance_sequence("999", None).await.unwrap_err();
    assert!(matches!(error, ProgressionError::NotFound(_)));
}

// =============================================================================
// Set Sequence Tests
// =============================================================================

#[rstest]
#[case(10)]
#[case(-1)]
#[tokio::test]
async fn test_set_sequence_rejects_out_of_range(#[case] sequence: i64) {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;

    let error = engine.set_sequence("100", sequence, "999").await.unwrap_err();
    match error {
        ProgressionError::InvalidRange { value, min, max } => {
            assert_eq!(value, sequence);
            assert_eq!(min, 0);
            assert_eq!(max, 9);
        }
        other => panic!("expected InvalidRange, got {other:?}"),
    }
}

#[tokio::test]
async fn test_set_sequence_records_history_without_counting() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;

    let outcome = engine
        .set_sequence("100", 4, "999")
        .await
        .expect("Failed to set sequence");

    assert_eq!(outcome.record.sequence, 4);
    assert_eq!(outcome.record.total_advancements, 0);
    assert_eq!(outcome.from.sequence, 9);
    assert_eq!(outcome.to.sequence, 4);

    let history = engine
        .advancement_history("100", 10)
        .await
        .expect("Failed to fetch history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from_sequence, 9);
    assert_eq!(history[0].to_sequence, 4);
    assert_eq!(history[0].advanced_by.as_deref(), Some("999"));
}

#[tokio::test]
async fn test_set_sequence_allows_demotion() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;
    engine
        .set_sequence("100", 3, "999")
        .await
        .expect("Failed to set sequence");

    let outcome = engine
        .set_sequence("100", 7, "999")
        .await
        .expect("Failed to demote");
    assert_eq!(outcome.record.sequence, 7);
}

// =============================================================================
// Stability Check Tests
// =============================================================================

// Fool sequence 9 (Seer) carries a 5% risk; a roll equal to the
// threshold survives, strictly below it loses control.
#[rstest]
#[case(5.0, false)]
#[case(4.999, true)]
#[case(0.0, true)]
#[case(99.9, false)]
#[tokio::test]
async fn test_forced_roll_boundary(#[case] roll: f64, #[case] expect_lost: bool) {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;

    let outcome = engine
        .roll_stability(StabilityCheckRequest {
            user_id: "100".to_string(),
            forced_roll: Some(roll),
        })
        .await
        .expect("Failed to roll stability");

    assert_eq!(outcome.risk_percent, 5);
    assert!((outcome.roll - roll).abs() < f64::EPSILON);
    assert_eq!(outcome.lost_control, expect_lost);
    assert_eq!(
        outcome.record.lose_control_count,
        if expect_lost { 1 } else { 0 }
    );

    let history = engine
        .stability_history("100", 10)
        .await
        .expect("Failed to fetch stability history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].lost_control, expect_lost);
}

#[tokio::test]
async fn test_roll_rejected_at_sequence_zero() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;
    engine
        .set_sequence("100", 0, "999")
        .await
        .expect("Failed to set sequence");

    let error = engine
        .roll_stability(StabilityCheckRequest {
            user_id: "100".to_string(),
            forced_roll: Some(50.0),
        })
        .await
        .unwrap_err();

    match error {
        ProgressionError::PreconditionFailed(reason) => {
            assert!(reason.contains("beyond instability"), "reason: {reason}");
        }
        other => panic!("expected PreconditionFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_roll_requires_pathway() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;
    engine
        .reset_progression("100")
        .await
        .expect("Failed to reset progression");

    let error = engine
        .roll_stability(StabilityCheckRequest {
            user_id: "100".to_string(),
            forced_roll: None,
        })
        .await
        .unwrap_err();

    match error {
        ProgressionError::PreconditionFailed(reason) => {
            assert!(reason.contains("no pathway"), "reason: {reason}");
        }
        other => panic!("expected PreconditionFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_natural_roll_stays_within_bounds() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;

    let outcome = engine
        .roll_stability(StabilityCheckRequest {
            user_id: "100".to_string(),
            forced_roll: None,
        })
        .await
        .expect("Failed to roll stability");

    assert!(outcome.roll >= 0.0 && outcome.roll < 100.0);
}

// =============================================================================
// Administrative Mutation Tests
// =============================================================================

#[tokio::test]
async fn test_give_points_accumulates() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;

    engine
        .give_points("100", 100)
        .await
        .expect("Failed to give points");
    let record = engine
        .give_points("100", 50)
        .await
        .expect("Failed to give points");

    assert_eq!(record.spiritual_points, 150);
}

#[rstest]
#[case(0)]
#[case(-5)]
#[tokio::test]
async fn test_give_points_rejects_non_positive(#[case] amount: i64) {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;

    let error = engine.give_points("100", amount).await.unwrap_err();
    match error {
        ProgressionError::InvalidRange { value, min, .. } => {
            assert_eq!(value, amount);
            assert_eq!(min, 1);
        }
        other => panic!("expected InvalidRange, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reset_returns_baseline_and_keeps_history() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;
    engine
        .advance_sequence("100", None)
        .await
        .expect("Failed to advance");
    engine
        .roll_stability(StabilityCheckRequest {
            user_id: "100".to_string(),
            forced_roll: Some(0.0),
        })
        .await
        .expect("Failed to roll stability");

    let record = engine
        .reset_progression("100")
        .await
        .expect("Failed to reset progression");

    assert_eq!(record.pathway, None);
    assert_eq!(record.sequence, 9);
    assert_eq!(record.spiritual_points, 0);
    assert_eq!(record.total_advancements, 0);
    assert_eq!(record.lose_control_count, 0);
    assert!(record.assigned_at.is_none());

    // History is audit data and survives the reset
    let advancements = engine
        .advancement_history("100", 10)
        .await
        .expect("Failed to fetch history");
    let checks = engine
        .stability_history("100", 10)
        .await
        .expect("Failed to fetch stability history");
    assert_eq!(advancements.len(), 1);
    assert_eq!(checks.len(), 1);
}

#[tokio::test]
async fn test_delete_removes_record_and_history() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "100", PathwayId::Fool).await;
    engine
        .advance_sequence("100", None)
        .await
        .expect("Failed to advance");

    engine
        .delete_user("100")
        .await
        .expect("Failed to delete user");

    assert!(engine
        .find("100")
        .await
        .expect("Failed to query record")
        .is_none());
    let error = engine.delete_user("100").await.unwrap_err();
    assert!(matches!(error, ProgressionError::NotFound(_)));
}

// =============================================================================
// Read Path Tests
// =============================================================================

#[tokio::test]
async fn test_metadata_for_unknown_user_projects_baseline() {
    let (engine, _temp) = create_test_engine().await;

    let snapshot = engine
        .metadata_for("999")
        .await
        .expect("Failed to derive metadata");
    assert_eq!(snapshot, MetadataSnapshot::unassigned());
}

#[tokio::test]
async fn test_leaderboard_orders_strongest_first() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "1", PathwayId::Fool).await;
    assign_test_beyonder(&engine, "2", PathwayId::Door).await;
    assign_test_beyonder(&engine, "3", PathwayId::Sun).await;

    engine
        .set_sequence("2", 3, "999")
        .await
        .expect("Failed to set sequence");
    engine
        .give_points("3", 50)
        .await
        .expect("Failed to give points");

    let board = engine
        .leaderboard(10)
        .await
        .expect("Failed to build leaderboard");
    let ids: Vec<&str> = board.iter().map(|r| r.user_id.as_str()).collect();

    // Lowest sequence first, then points break the tie at sequence 9
    assert_eq!(ids, vec!["2", "3", "1"]);
}

#[tokio::test]
async fn test_members_of_filters_by_pathway() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "1", PathwayId::Fool).await;
    assign_test_beyonder(&engine, "2", PathwayId::Door).await;
    assign_test_beyonder(&engine, "3", PathwayId::Fool).await;

    engine
        .set_sequence("3", 4, "999")
        .await
        .expect("Failed to set sequence");

    let walkers = engine
        .members_of(PathwayId::Fool)
        .await
        .expect("Failed to list members");
    let ids: Vec<&str> = walkers.iter().map(|r| r.user_id.as_str()).collect();

    assert_eq!(ids, vec!["3", "1"]);
    assert!(engine
        .members_of(PathwayId::Moon)
        .await
        .expect("Failed to list members")
        .is_empty());
}

#[tokio::test]
async fn test_stats_split_assigned_from_reset_users() {
    let (engine, _temp) = create_test_engine().await;
    assign_test_beyonder(&engine, "1", PathwayId::Fool).await;
    assign_test_beyonder(&engine, "2", PathwayId::Door).await;
    assign_test_beyonder(&engine, "3", PathwayId::Fool).await;
    engine
        .reset_progression("3")
        .await
        .expect("Failed to reset progression");

    let stats = engine.stats().await.expect("Failed to aggregate stats");

    assert_eq!(stats.total_users, 3);
    assert_eq!(stats.total_assigned, 2);
    assert_eq!(stats.by_pathway.get(&PathwayId::Fool), Some(&1));
    assert_eq!(stats.by_pathway.get(&PathwayId::Door), Some(&1));
}

// =============================================================================
// Backend Failure Tests
// =============================================================================

#[tokio::test]
async fn test_backend_failure_maps_to_store_error() {
    let engine = ProgressionEngine::new(Arc::new(create_failing_store()));

    let error = engine.get("100").await.unwrap_err();
    assert!(matches!(error, ProgressionError::Store(_)));
    assert!(!error.is_rejection());
}
