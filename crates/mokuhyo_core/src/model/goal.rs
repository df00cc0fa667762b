//! Goal domain model.
//!
//! # Responsibility
//! - Define the weighted objective tracked within one review period.
//!
//! # Invariants
//! - `id` is stable and never reused for another goal.
//! - `weight` is expected to be within the input-layer bounds; storage does
//!   not re-validate it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a goal.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type GoalId = Uuid;

/// A weighted objective with a deadline, tracked within one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Stable global ID used for achievement lookup and exports.
    pub id: GoalId,
    /// Short objective statement shown in lists and exports.
    pub title: String,
    /// Relative importance, 1 (low) to 10 (high).
    pub weight: u8,
    /// Target completion date, serialized as `YYYY-MM-DD`.
    pub deadline: NaiveDate,
    /// Optional longer description; empty string when not provided.
    #[serde(default)]
    pub description: String,
    /// Creation timestamp, RFC 3339 on the wire.
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Creates a new goal with a generated stable ID and a fresh timestamp.
    pub fn new(
        title: impl Into<String>,
        weight: u8,
        deadline: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            weight,
            deadline,
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}
