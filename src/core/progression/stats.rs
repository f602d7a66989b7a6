//! Guild Stats Aggregation
//!
//! Read-only rollups over the full record set. Pathway and sequence
//! distributions cover assigned users only; rank buckets cover everyone,
//! with recordless and unassigned users counted as Initiates.

use indexmap::IndexMap;
use serde::Serialize;

use super::records::{ProgressionRecord, Rank};
use crate::core::pathway::PathwayId;

const RANK_ORDER: [Rank; 5] = [
    Rank::TrueGod,
    Rank::Angel,
    Rank::Saint,
    Rank::Beyonder,
    Rank::Initiate,
];

/// Aggregated progression statistics for a guild.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuildStats {
    pub total_users: usize,
    pub total_assigned: usize,
    /// Member counts per pathway, highest first; catalog order breaks ties.
    pub by_pathway: IndexMap<PathwayId, usize>,
    /// Member counts per sequence, ascending (strongest first).
    pub by_sequence: IndexMap<i64, usize>,
    /// Member counts per rank, strongest first; empty buckets omitted.
    pub by_rank: IndexMap<Rank, usize>,
    pub average_sequence: f64,
    pub average_points: f64,
    /// Sum of per-user lose-control counters.
    pub total_lose_control_events: i64,
}

impl GuildStats {
    pub fn aggregate(records: &[ProgressionRecord]) -> Self {
        let total_users = records.len();
        let assigned: Vec<&ProgressionRecord> =
            records.iter().filter(|r| r.pathway.is_some()).collect();
        let total_assigned = assigned.len();

        let mut by_pathway: IndexMap<PathwayId, usize> = IndexMap::new();
        for record in &assigned {
            if let Some(pathway) = record.pathway {
                *by_pathway.entry(pathway).or_insert(0) += 1;
            }
        }
        by_pathway.sort_by(|pathway_a, count_a, pathway_b, count_b| {
            count_b
                .cmp(count_a)
                .then((*pathway_a as usize).cmp(&(*pathway_b as usize)))
        });

        let mut by_sequence: IndexMap<i64, usize> = IndexMap::new();
        for record in &assigned {
            *by_sequence.entry(record.sequence).or_insert(0) += 1;
        }
        by_sequence.sort_keys();

        let mut by_rank: IndexMap<Rank, usize> = IndexMap::new();
        for rank in RANK_ORDER {
            let count = records.iter().filter(|r| r.rank() == rank).count();
            if count > 0 {
                by_rank.insert(rank, count);
            }
        }

        let average_sequence = if total_assigned == 0 {
            0.0
        } else {
            assigned.iter().map(|r| r.sequence as f64).sum::<f64>() / total_assigned as f64
        };
        let average_points = if total_assigned == 0 {
            0.0
        } else {
            assigned.iter().map(|r| r.spiritual_points as f64).sum::<f64>() / total_assigned as f64
        };
        let total_lose_control_events = records.iter().map(|r| r.lose_control_count).sum();

        Self {
            total_users,
            total_assigned,
            by_pathway,
            by_sequence,
            by_rank,
            average_sequence,
            average_points,
            total_lose_control_events,
        }
    }
}
