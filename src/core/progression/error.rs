//! Progression Error Taxonomy
//!
//! Every transition returns a discriminated result; rejections are values
//! rendered as user-facing messages, never process failures.

use thiserror::Error;

use super::store::StoreError;
use crate::core::pathway::PathwayId;

/// Errors produced by progression operations.
#[derive(Debug, Error)]
pub enum ProgressionError {
    /// No progression record exists for the user.
    #[error("No progression record found for user {0}")]
    NotFound(String),

    /// Self-service assignment attempted over an existing pathway.
    #[error("User {user_id} already walks the {pathway} pathway")]
    AlreadyAssigned { user_id: String, pathway: PathwayId },

    /// Advancement attempted at sequence 0, the terminal tier.
    #[error("Sequence 0 is the end of the pathway; no further advancement")]
    AlreadyAtMinimum,

    /// A numeric argument fell outside its allowed range.
    #[error("Value {value} is outside the allowed range [{min}, {max}]")]
    InvalidRange { value: i64, min: i64, max: i64 },

    /// The operation's preconditions were not met.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

pub type ProgressionResult<T> = Result<T, ProgressionError>;

impl ProgressionError {
    /// True for rejections a caller renders as ordinary feedback, false for
    /// backend failures worth operator attention.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, ProgressionError::Store(_))
    }
}
