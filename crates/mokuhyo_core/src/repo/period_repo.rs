//! Period/goal/achievement repository with save-on-write persistence.
//!
//! # Responsibility
//! - Provide CRUD entry points over periods, goals, and achievement items.
//! - Recompute derived aggregates inside every item mutation.
//! - Persist the whole document after each successful mutation.
//!
//! # Invariants
//! - `current_period`, when set, always names an existing period.
//! - Deleting a goal also deletes its achievement entry.
//! - Deletes of already-absent IDs are silent no-ops, not errors.
//! - A failed save is reported to the caller; the in-memory document is NOT
//!   rolled back, so the caller must treat disk as possibly stale.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::{NaiveDate, Utc};
use log::error;

use crate::model::{Achievement, AchievementItem, Document, Goal, GoalId, ItemId, Period};
use crate::repo::export;
use crate::store::{self, migrations, DocumentStore, StoreError};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for period, goal, and achievement operations.
#[derive(Debug)]
pub enum RepoError {
    /// Period name was empty after trimming.
    EmptyPeriodName,
    /// A period with this name already exists.
    DuplicatePeriod(String),
    /// No period with this name exists.
    PeriodNotFound(String),
    /// No goal with this ID exists in the current period.
    GoalNotFound(GoalId),
    /// No item with this ID exists under the goal.
    ItemNotFound { goal_id: GoalId, item_id: ItemId },
    /// A mutation was attempted before any period was selected.
    NoCurrentPeriod,
    /// Persistence-layer failure.
    Store(StoreError),
    /// Import payload was not valid JSON or not a decodable document.
    InvalidImport(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPeriodName => write!(f, "period name must not be empty"),
            Self::DuplicatePeriod(name) => write!(f, "period already exists: `{name}`"),
            Self::PeriodNotFound(name) => write!(f, "period not found: `{name}`"),
            Self::GoalNotFound(goal_id) => write!(f, "goal not found: {goal_id}"),
            Self::ItemNotFound { goal_id, item_id } => {
                write!(f, "achievement item not found: {item_id} (goal {goal_id})")
            }
            Self::NoCurrentPeriod => write!(f, "no period is currently selected"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidImport(err) => write!(f, "invalid import payload: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidImport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Rollup counters over the current period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub total_goals: usize,
    /// Goals whose total percentage reached 100.
    pub completed_goals: usize,
    /// Goals with progress strictly between 0 and 100.
    pub partial_goals: usize,
    pub total_weight: u32,
    /// Weighted achievement rate across all goals.
    pub achievement_rate: f64,
    pub total_achievement_items: usize,
}

/// Repository over the single persisted document.
///
/// All operations act on the current period unless a period name is given.
/// Every mutating method finishes by writing the whole document back to the
/// store.
pub struct PeriodRepository<S: DocumentStore> {
    store: S,
    document: Document,
}

impl<S: DocumentStore> PeriodRepository<S> {
    /// Loads the document from the store (migrating legacy content and
    /// recovering silently from corruption) and wraps it in a repository.
    pub fn open(store: S) -> Self {
        let document = store::load_document(&store);
        Self { store, document }
    }

    /// Read access to the owned document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    fn persist(&self) -> RepoResult<()> {
        store::save_document(&self.store, &self.document).map_err(|err| {
            error!("event=store_save module=repo status=error error={err}");
            RepoError::Store(err)
        })
    }

    fn current(&self) -> Option<&Period> {
        self.document.current()
    }

    fn current_mut(&mut self) -> RepoResult<&mut Period> {
        self.document.current_mut().ok_or(RepoError::NoCurrentPeriod)
    }

    // ---- periods ----

    /// Creates an empty period and makes it current.
    pub fn create_period(&mut self, name: &str) -> RepoResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepoError::EmptyPeriodName);
        }
        if self.document.periods.contains_key(name) {
            return Err(RepoError::DuplicatePeriod(name.to_string()));
        }
        self.document.periods.insert(name.to_string(), Period::new());
        self.document.current_period = Some(name.to_string());
        self.persist()
    }

    /// Switches the current-period pointer.
    pub fn set_current_period(&mut self, name: &str) -> RepoResult<()> {
        if !self.document.periods.contains_key(name) {
            return Err(RepoError::PeriodNotFound(name.to_string()));
        }
        self.document.current_period = Some(name.to_string());
        self.persist()
    }

    /// Name of the period mutations currently act on.
    pub fn current_period_name(&self) -> Option<&str> {
        self.document.current_period.as_deref()
    }

    /// All period names.
    pub fn period_names(&self) -> Vec<String> {
        self.document.periods.keys().cloned().collect()
    }

    /// Periods that have at least one goal and are therefore worth exporting.
    pub fn exportable_period_names(&self) -> Vec<String> {
        self.document
            .periods
            .iter()
            .filter(|(_, period)| !period.goals.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    // ---- goals ----

    /// Appends a goal to the current period and initializes its achievement
    /// entry.
    ///
    /// Weight and length bounds are enforced by the service input layer, not
    /// re-checked here.
    pub fn add_goal(
        &mut self,
        title: impl Into<String>,
        weight: u8,
        deadline: NaiveDate,
        description: impl Into<String>,
    ) -> RepoResult<GoalId> {
        let goal = Goal::new(title, weight, deadline, description);
        let goal_id = goal.id;
        let period = self.current_mut()?;
        period.goals.push(goal);
        period.achievements.insert(goal_id, Achievement::default());
        self.persist()?;
        Ok(goal_id)
    }

    /// Removes a goal and its achievement entry. Missing IDs are a no-op.
    pub fn delete_goal(&mut self, goal_id: GoalId) -> RepoResult<()> {
        let period = self.current_mut()?;
        let goals_before = period.goals.len();
        period.goals.retain(|goal| goal.id != goal_id);
        let removed_goal = period.goals.len() != goals_before;
        let removed_achievement = period.achievements.remove(&goal_id).is_some();
        if removed_goal || removed_achievement {
            self.persist()?;
        }
        Ok(())
    }

    /// Goals of the current period in display order.
    pub fn goals(&self) -> &[Goal] {
        self.current().map(|period| period.goals.as_slice()).unwrap_or(&[])
    }

    // ---- achievement items ----

    /// Appends an achievement item and recomputes the goal total.
    pub fn add_achievement_item(
        &mut self,
        goal_id: GoalId,
        content: impl Into<String>,
        percentage: f64,
    ) -> RepoResult<ItemId> {
        let period = self.current_mut()?;
        if !period.has_goal(goal_id) {
            return Err(RepoError::GoalNotFound(goal_id));
        }
        let item = AchievementItem::new(content, percentage);
        let item_id = item.id;
        // Entry is created lazily; a goal may predate its achievement record
        // after an import of partially-written data.
        let achievement = period.achievements.entry(goal_id).or_default();
        achievement.items.push(item);
        achievement.recalculate();
        self.persist()?;
        Ok(item_id)
    }

    /// Replaces an item's content and percentage together, stamps the update
    /// time, and recomputes the goal total. There is no partial update.
    pub fn update_achievement_item(
        &mut self,
        goal_id: GoalId,
        item_id: ItemId,
        content: impl Into<String>,
        percentage: f64,
    ) -> RepoResult<()> {
        let period = self.current_mut()?;
        let achievement = period
            .achievements
            .get_mut(&goal_id)
            .ok_or(RepoError::GoalNotFound(goal_id))?;
        let item = achievement
            .item_mut(item_id)
            .ok_or(RepoError::ItemNotFound { goal_id, item_id })?;
        item.content = content.into();
        item.percentage = percentage;
        item.updated_at = Some(Utc::now());
        achievement.recalculate();
        self.persist()
    }

    /// Removes an item and recomputes the goal total. Missing goal or item
    /// IDs are a no-op.
    pub fn delete_achievement_item(&mut self, goal_id: GoalId, item_id: ItemId) -> RepoResult<()> {
        let period = self.current_mut()?;
        let Some(achievement) = period.achievements.get_mut(&goal_id) else {
            return Ok(());
        };
        let items_before = achievement.items.len();
        achievement.items.retain(|item| item.id != item_id);
        if achievement.items.len() == items_before {
            return Ok(());
        }
        achievement.recalculate();
        self.persist()
    }

    /// Items logged against one goal, in insertion order.
    pub fn goal_achievement_items(&self, goal_id: GoalId) -> &[AchievementItem] {
        self.current()
            .and_then(|period| period.achievements.get(&goal_id))
            .map(|achievement| achievement.items.as_slice())
            .unwrap_or(&[])
    }

    /// Capped total percentage for one goal; 0.0 when nothing is logged.
    pub fn goal_total_percentage(&self, goal_id: GoalId) -> f64 {
        self.current()
            .and_then(|period| period.achievements.get(&goal_id))
            .map(|achievement| achievement.total_percentage)
            .unwrap_or(0.0)
    }

    /// Achievement records of the current period, with empty entries supplied
    /// for goals that have none yet.
    pub fn achievements(&self) -> BTreeMap<GoalId, Achievement> {
        let Some(period) = self.current() else {
            return BTreeMap::new();
        };
        let mut map = period.achievements.clone();
        for goal in &period.goals {
            map.entry(goal.id).or_default();
        }
        map
    }

    // ---- aggregates ----

    /// Weighted average of goal totals: `sum(w_i * p_i) / sum(w_i)`.
    ///
    /// Returns 0.0 when there is no current period, no goals, or the total
    /// weight is zero.
    pub fn calculate_achievement_rate(&self) -> f64 {
        let Some(period) = self.current() else {
            return 0.0;
        };
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for goal in &period.goals {
            let percentage = period
                .achievements
                .get(&goal.id)
                .map(|achievement| achievement.total_percentage)
                .unwrap_or(0.0);
            weighted += f64::from(goal.weight) * percentage;
            total_weight += f64::from(goal.weight);
        }
        if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        }
    }

    /// Rollup counters over the current period.
    pub fn statistics(&self) -> Statistics {
        let Some(period) = self.current() else {
            return Statistics::default();
        };
        let mut stats = Statistics {
            total_goals: period.goals.len(),
            achievement_rate: self.calculate_achievement_rate(),
            ..Statistics::default()
        };
        for goal in &period.goals {
            let achievement = period.achievements.get(&goal.id);
            let percentage = achievement.map(|a| a.total_percentage).unwrap_or(0.0);
            stats.total_achievement_items += achievement.map(|a| a.items.len()).unwrap_or(0);
            if percentage >= 100.0 {
                stats.completed_goals += 1;
            } else if percentage > 0.0 {
                stats.partial_goals += 1;
            }
            stats.total_weight += u32::from(goal.weight);
        }
        stats
    }

    // ---- settings ----

    /// API key used by the report generator; empty when unconfigured.
    pub fn claude_api_key(&self) -> &str {
        &self.document.settings.claude_api_key
    }

    /// Stores the report-generator API key.
    pub fn set_claude_api_key(&mut self, api_key: impl Into<String>) -> RepoResult<()> {
        self.document.settings.claude_api_key = api_key.into();
        self.persist()
    }

    // ---- backup ----

    /// Serializes the whole document as pretty-printed JSON.
    pub fn export_data(&self) -> RepoResult<String> {
        serde_json::to_string_pretty(&self.document)
            .map_err(|err| RepoError::Store(StoreError::Serialize(err)))
    }

    /// Replaces the document from a JSON backup and persists it.
    ///
    /// Legacy payloads run through the same migration as on-disk load. A
    /// payload that fails to parse leaves the existing state untouched.
    pub fn import_data(&mut self, json: &str) -> RepoResult<()> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(RepoError::InvalidImport)?;
        let document = if migrations::needs_migration(&value) {
            migrations::migrate_legacy(&value)
        } else {
            serde_json::from_value(value).map_err(RepoError::InvalidImport)?
        };
        self.document = document;
        self.persist()
    }

    // ---- projections ----

    /// Summary CSV (one row per goal) for the named period, defaulting to
    /// the current one. Empty string when the period is unknown or absent.
    pub fn export_csv_summary(&self, period_name: Option<&str>) -> String {
        match self.resolve_period(period_name) {
            Some((name, period)) => export::summary_csv(name, period),
            None => String::new(),
        }
    }

    /// Detailed CSV (one row per achievement item; goals without items still
    /// emit one placeholder row). Empty string when the period is unknown.
    pub fn export_csv_detailed(&self, period_name: Option<&str>) -> String {
        match self.resolve_period(period_name) {
            Some((name, period)) => export::detailed_csv(name, period),
            None => String::new(),
        }
    }

    fn resolve_period<'a>(&'a self, period_name: Option<&'a str>) -> Option<(&'a str, &'a Period)> {
        let name = period_name.or(self.document.current_period.as_deref())?;
        let period = self.document.periods.get(name)?;
        Some((name, period))
    }
}
