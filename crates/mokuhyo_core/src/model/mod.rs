//! Domain model for period-scoped goal management.
//!
//! # Responsibility
//! - Define the canonical document shape persisted as one JSON file.
//! - Keep derived aggregates (goal total percentage) next to their source
//!   items so every mutation path can recompute them in place.
//!
//! # Invariants
//! - Every goal and achievement item carries a stable `Uuid` identity.
//! - `Achievement::total_percentage` is always `min(100, sum(items))` after
//!   `recalculate` has run; stored values are never trusted without it.

pub mod achievement;
pub mod document;
pub mod goal;
pub mod limits;

pub use achievement::{Achievement, AchievementItem, ItemId};
pub use document::{Document, Period, Settings, DATA_VERSION, LEGACY_DATA_VERSION};
pub use goal::{Goal, GoalId};
