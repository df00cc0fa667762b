//! Root document persisted as one JSON file.
//!
//! # Responsibility
//! - Define the top-level shape: periods, current-period pointer, settings,
//!   schema version tag.
//!
//! # Invariants
//! - `current_period`, when `Some`, names an existing key of `periods`.
//! - `version` is `DATA_VERSION` for every document produced by this crate;
//!   older tags are upgraded at load time before any other access.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::achievement::Achievement;
use crate::model::goal::{Goal, GoalId};

/// Schema tag written by this crate.
pub const DATA_VERSION: &str = "2.0";

/// Schema tag of the legacy single-string achievement format.
pub const LEGACY_DATA_VERSION: &str = "1.0";

/// User settings stored alongside the period data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// API key for report generation; empty string means unconfigured.
    #[serde(default)]
    pub claude_api_key: String,
}

/// One review cycle scoping a set of goals and their achievements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Goals in insertion order; this is also display and export order.
    pub goals: Vec<Goal>,
    /// Achievement record per goal. Key order is irrelevant to the format.
    pub achievements: BTreeMap<GoalId, Achievement>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Period {
    /// Creates an empty period with a fresh timestamp.
    pub fn new() -> Self {
        Self {
            goals: Vec::new(),
            achievements: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Returns the goal with the given ID, if present.
    pub fn goal(&self, goal_id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == goal_id)
    }

    /// Returns whether a goal with the given ID exists in this period.
    pub fn has_goal(&self, goal_id: GoalId) -> bool {
        self.goal(goal_id).is_some()
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::new()
    }
}

/// Root object of the persisted store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// All periods by display name.
    #[serde(default)]
    pub periods: BTreeMap<String, Period>,
    /// Name of the period mutations act on; `None` until one is created.
    #[serde(default)]
    pub current_period: Option<String>,
    /// User settings.
    #[serde(default)]
    pub settings: Settings,
    /// Schema version tag.
    pub version: String,
}

impl Document {
    /// Returns the period currently selected for mutation, if any.
    pub fn current(&self) -> Option<&Period> {
        self.current_period
            .as_deref()
            .and_then(|name| self.periods.get(name))
    }

    /// Mutable variant of [`Document::current`].
    pub fn current_mut(&mut self) -> Option<&mut Period> {
        let name = self.current_period.clone()?;
        self.periods.get_mut(&name)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self {
            periods: BTreeMap::new(),
            current_period: None,
            settings: Settings::default(),
            version: DATA_VERSION.to_string(),
        }
    }
}
