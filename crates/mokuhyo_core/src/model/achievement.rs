//! Achievement record per goal: logged progress items and their cached sum.
//!
//! # Responsibility
//! - Hold the ordered list of progress items logged against one goal.
//! - Keep the derived goal total next to the items it is derived from.
//!
//! # Invariants
//! - `total_percentage == min(100.0, sum(item.percentage))` after every call
//!   to `recalculate`.
//! - Item percentages are bounded 0–100 at the input layer only; a raw value
//!   above 100 is capped at the goal-total level, not per item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::limits::MAX_PERCENTAGE;

/// Stable identifier for an achievement item.
pub type ItemId = Uuid;

/// One logged increment of progress against a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementItem {
    /// Stable global ID used for update/delete addressing.
    pub id: ItemId,
    /// What was accomplished.
    pub content: String,
    /// Contribution toward the goal, in percent.
    pub percentage: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Stamped on every update; absent until the first one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AchievementItem {
    /// Creates a new item with a generated stable ID and a fresh timestamp.
    pub fn new(content: impl Into<String>, percentage: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            percentage,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Aggregate progress record for one goal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Logged items in insertion order.
    pub items: Vec<AchievementItem>,
    /// Derived cache of the capped item sum. Recomputed on every item
    /// mutation; never authoritative on its own.
    pub total_percentage: f64,
}

impl Achievement {
    /// Recomputes `total_percentage` from the current items.
    ///
    /// The sum is capped at 100.0; individual items are not.
    pub fn recalculate(&mut self) {
        let sum: f64 = self.items.iter().map(|item| item.percentage).sum();
        self.total_percentage = sum.min(MAX_PERCENTAGE);
    }

    /// Returns the item with the given ID, if present.
    pub fn item(&self, item_id: ItemId) -> Option<&AchievementItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Returns a mutable reference to the item with the given ID, if present.
    pub fn item_mut(&mut self, item_id: ItemId) -> Option<&mut AchievementItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Achievement, AchievementItem};

    #[test]
    fn recalculate_sums_items() {
        let mut achievement = Achievement::default();
        achievement.items.push(AchievementItem::new("first", 30.0));
        achievement.items.push(AchievementItem::new("second", 45.5));
        achievement.recalculate();
        assert_eq!(achievement.total_percentage, 75.5);
    }

    #[test]
    fn recalculate_caps_total_at_hundred() {
        let mut achievement = Achievement::default();
        achievement.items.push(AchievementItem::new("a", 40.0));
        achievement.items.push(AchievementItem::new("b", 70.0));
        achievement.recalculate();
        assert_eq!(achievement.total_percentage, 100.0);
    }

    #[test]
    fn recalculate_does_not_cap_single_items() {
        let mut achievement = Achievement::default();
        achievement.items.push(AchievementItem::new("oversized", 150.0));
        achievement.recalculate();
        // The raw item value survives; only the total is capped.
        assert_eq!(achievement.items[0].percentage, 150.0);
        assert_eq!(achievement.total_percentage, 100.0);
    }

    #[test]
    fn recalculate_on_empty_items_is_zero() {
        let mut achievement = Achievement {
            items: Vec::new(),
            total_percentage: 55.0,
        };
        achievement.recalculate();
        assert_eq!(achievement.total_percentage, 0.0);
    }
}
