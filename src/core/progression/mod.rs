//! Progression Domain Model
//!
//! Per-user Beyonder progression: records, the transition engine, the
//! derived metadata projection, guild statistics, and the storage contract
//! the engine runs against.

pub mod engine;
pub mod error;
pub mod metadata;
pub mod records;
pub mod stats;
pub mod store;

// Re-exports for convenience
pub use engine::{
    AdvanceOutcome, Notifier, ProgressionEngine, StabilityCheckRequest, StabilityOutcome,
};
pub use error::{ProgressionError, ProgressionResult};
pub use metadata::{derive_metadata, MetadataSnapshot};
pub use records::{
    AdvancementEntry, NewAdvancement, NewStabilityCheck, ProgressionRecord, Rank,
    StabilityCheckEntry,
};
pub use stats::GuildStats;
pub use store::{ProgressionStore, StoreError, StoreResult};
