//! Input-layer bounds for user-entered values.
//!
//! # Responsibility
//! - Centralize the product limits enforced by the service layer.
//!
//! # Invariants
//! - The repository does not re-check these bounds; enforcement happens
//!   before data reaches storage.

/// Maximum goal title length in characters.
pub const MAX_GOAL_TITLE_CHARS: usize = 100;

/// Maximum goal description length in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Maximum achievement item content length in characters.
pub const MAX_ITEM_CONTENT_CHARS: usize = 1000;

/// Inclusive goal weight range.
pub const MIN_WEIGHT: u8 = 1;
pub const MAX_WEIGHT: u8 = 10;

/// Default weight offered for new goals.
pub const DEFAULT_WEIGHT: u8 = 5;

/// Inclusive percentage range for a single achievement item.
pub const MIN_PERCENTAGE: f64 = 0.0;
pub const MAX_PERCENTAGE: f64 = 100.0;

/// Maximum number of achievement items per goal.
pub const MAX_ITEMS_PER_GOAL: usize = 20;
