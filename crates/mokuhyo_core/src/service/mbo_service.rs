//! Goal-management use-case service.
//!
//! # Responsibility
//! - Enforce input-layer bounds (lengths, weight, percentage, item count).
//! - Delegate persistence and aggregation to the repository.
//!
//! # Invariants
//! - Values that reach the repository have passed validation; storage does
//!   not re-check them.
//! - Validation failures never mutate state.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

use crate::model::limits::{
    MAX_DESCRIPTION_CHARS, MAX_GOAL_TITLE_CHARS, MAX_ITEMS_PER_GOAL, MAX_ITEM_CONTENT_CHARS,
    MAX_PERCENTAGE, MAX_WEIGHT, MIN_PERCENTAGE, MIN_WEIGHT,
};
use crate::model::{Achievement, AchievementItem, Goal, GoalId, ItemId};
use crate::repo::{PeriodRepository, RepoError, Statistics};
use crate::store::DocumentStore;

/// Input-layer validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyTitle,
    TitleTooLong { chars: usize },
    DescriptionTooLong { chars: usize },
    WeightOutOfRange { weight: u8 },
    EmptyContent,
    ContentTooLong { chars: usize },
    PercentageOutOfRange { percentage: f64 },
    TooManyItems { goal_id: GoalId },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "goal title must not be empty"),
            Self::TitleTooLong { chars } => write!(
                f,
                "goal title is {chars} characters; limit is {MAX_GOAL_TITLE_CHARS}"
            ),
            Self::DescriptionTooLong { chars } => write!(
                f,
                "goal description is {chars} characters; limit is {MAX_DESCRIPTION_CHARS}"
            ),
            Self::WeightOutOfRange { weight } => write!(
                f,
                "goal weight {weight} is outside {MIN_WEIGHT}..={MAX_WEIGHT}"
            ),
            Self::EmptyContent => write!(f, "achievement content must not be empty"),
            Self::ContentTooLong { chars } => write!(
                f,
                "achievement content is {chars} characters; limit is {MAX_ITEM_CONTENT_CHARS}"
            ),
            Self::PercentageOutOfRange { percentage } => write!(
                f,
                "percentage {percentage} is outside {MIN_PERCENTAGE}..={MAX_PERCENTAGE}"
            ),
            Self::TooManyItems { goal_id } => write!(
                f,
                "goal {goal_id} already has the maximum of {MAX_ITEMS_PER_GOAL} items"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Service error: invalid input or a repository failure.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Request model for creating a goal.
#[derive(Debug, Clone, PartialEq)]
pub struct AddGoalRequest {
    pub title: String,
    pub weight: u8,
    pub deadline: NaiveDate,
    pub description: String,
}

impl AddGoalRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let title_chars = self.title.trim().chars().count();
        if title_chars == 0 {
            return Err(ValidationError::EmptyTitle);
        }
        if title_chars > MAX_GOAL_TITLE_CHARS {
            return Err(ValidationError::TitleTooLong { chars: title_chars });
        }
        let description_chars = self.description.chars().count();
        if description_chars > MAX_DESCRIPTION_CHARS {
            return Err(ValidationError::DescriptionTooLong {
                chars: description_chars,
            });
        }
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&self.weight) {
            return Err(ValidationError::WeightOutOfRange {
                weight: self.weight,
            });
        }
        Ok(())
    }
}

/// Request model for logging or replacing an achievement item.
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementItemInput {
    pub content: String,
    pub percentage: f64,
}

impl AchievementItemInput {
    fn validate(&self) -> Result<(), ValidationError> {
        let content_chars = self.content.trim().chars().count();
        if content_chars == 0 {
            return Err(ValidationError::EmptyContent);
        }
        if content_chars > MAX_ITEM_CONTENT_CHARS {
            return Err(ValidationError::ContentTooLong {
                chars: content_chars,
            });
        }
        if !(MIN_PERCENTAGE..=MAX_PERCENTAGE).contains(&self.percentage) {
            return Err(ValidationError::PercentageOutOfRange {
                percentage: self.percentage,
            });
        }
        Ok(())
    }
}

/// Input-layer facade over [`PeriodRepository`].
pub struct MboService<S: DocumentStore> {
    repo: PeriodRepository<S>,
}

impl<S: DocumentStore> MboService<S> {
    /// Loads the document from the store and wraps it in a service.
    pub fn open(store: S) -> Self {
        Self {
            repo: PeriodRepository::open(store),
        }
    }

    /// Wraps an already-open repository.
    pub fn new(repo: PeriodRepository<S>) -> Self {
        Self { repo }
    }

    /// Read access to the underlying repository.
    pub fn repository(&self) -> &PeriodRepository<S> {
        &self.repo
    }

    // ---- periods ----

    pub fn create_period(&mut self, name: &str) -> Result<(), ServiceError> {
        Ok(self.repo.create_period(name)?)
    }

    pub fn set_current_period(&mut self, name: &str) -> Result<(), ServiceError> {
        Ok(self.repo.set_current_period(name)?)
    }

    pub fn current_period_name(&self) -> Option<&str> {
        self.repo.current_period_name()
    }

    pub fn period_names(&self) -> Vec<String> {
        self.repo.period_names()
    }

    pub fn exportable_period_names(&self) -> Vec<String> {
        self.repo.exportable_period_names()
    }

    // ---- goals ----

    /// Validates the request and appends the goal to the current period.
    pub fn add_goal(&mut self, request: AddGoalRequest) -> Result<GoalId, ServiceError> {
        request.validate()?;
        Ok(self.repo.add_goal(
            request.title,
            request.weight,
            request.deadline,
            request.description,
        )?)
    }

    pub fn delete_goal(&mut self, goal_id: GoalId) -> Result<(), ServiceError> {
        Ok(self.repo.delete_goal(goal_id)?)
    }

    pub fn goals(&self) -> &[Goal] {
        self.repo.goals()
    }

    // ---- achievement items ----

    /// Validates the input, enforces the per-goal item cap, and logs the
    /// item.
    pub fn add_achievement_item(
        &mut self,
        goal_id: GoalId,
        input: AchievementItemInput,
    ) -> Result<ItemId, ServiceError> {
        input.validate()?;
        if self.repo.goal_achievement_items(goal_id).len() >= MAX_ITEMS_PER_GOAL {
            return Err(ValidationError::TooManyItems { goal_id }.into());
        }
        Ok(self
            .repo
            .add_achievement_item(goal_id, input.content, input.percentage)?)
    }

    /// Validates the input and replaces the item's content and percentage.
    pub fn update_achievement_item(
        &mut self,
        goal_id: GoalId,
        item_id: ItemId,
        input: AchievementItemInput,
    ) -> Result<(), ServiceError> {
        input.validate()?;
        Ok(self
            .repo
            .update_achievement_item(goal_id, item_id, input.content, input.percentage)?)
    }

    pub fn delete_achievement_item(
        &mut self,
        goal_id: GoalId,
        item_id: ItemId,
    ) -> Result<(), ServiceError> {
        Ok(self.repo.delete_achievement_item(goal_id, item_id)?)
    }

    pub fn goal_achievement_items(&self, goal_id: GoalId) -> &[AchievementItem] {
        self.repo.goal_achievement_items(goal_id)
    }

    pub fn goal_total_percentage(&self, goal_id: GoalId) -> f64 {
        self.repo.goal_total_percentage(goal_id)
    }

    pub fn achievements(&self) -> BTreeMap<GoalId, Achievement> {
        self.repo.achievements()
    }

    // ---- aggregates ----

    pub fn achievement_rate(&self) -> f64 {
        self.repo.calculate_achievement_rate()
    }

    pub fn statistics(&self) -> Statistics {
        self.repo.statistics()
    }

    // ---- settings & backup ----

    pub fn claude_api_key(&self) -> &str {
        self.repo.claude_api_key()
    }

    pub fn set_claude_api_key(&mut self, api_key: impl Into<String>) -> Result<(), ServiceError> {
        Ok(self.repo.set_claude_api_key(api_key)?)
    }

    pub fn export_data(&self) -> Result<String, ServiceError> {
        Ok(self.repo.export_data()?)
    }

    pub fn import_data(&mut self, json: &str) -> Result<(), ServiceError> {
        Ok(self.repo.import_data(json)?)
    }

    // ---- projections ----

    pub fn export_csv_summary(&self, period_name: Option<&str>) -> String {
        self.repo.export_csv_summary(period_name)
    }

    pub fn export_csv_detailed(&self, period_name: Option<&str>) -> String {
        self.repo.export_csv_detailed(period_name)
    }
}

#[cfg(test)]
mod tests {
    use super::{AchievementItemInput, AddGoalRequest, ValidationError};
    use chrono::NaiveDate;

    fn goal_request(title: &str, weight: u8) -> AddGoalRequest {
        AddGoalRequest {
            title: title.to_string(),
            weight,
            deadline: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            description: String::new(),
        }
    }

    #[test]
    fn goal_request_accepts_boundary_weights() {
        assert!(goal_request("increase sales", 1).validate().is_ok());
        assert!(goal_request("increase sales", 10).validate().is_ok());
    }

    #[test]
    fn goal_request_rejects_out_of_range_weights() {
        assert_eq!(
            goal_request("x", 0).validate(),
            Err(ValidationError::WeightOutOfRange { weight: 0 })
        );
        assert_eq!(
            goal_request("x", 11).validate(),
            Err(ValidationError::WeightOutOfRange { weight: 11 })
        );
    }

    #[test]
    fn goal_request_rejects_blank_title() {
        assert_eq!(
            goal_request("   ", 5).validate(),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn goal_request_rejects_overlong_title() {
        let title = "あ".repeat(101);
        assert_eq!(
            goal_request(&title, 5).validate(),
            Err(ValidationError::TitleTooLong { chars: 101 })
        );
    }

    #[test]
    fn goal_request_rejects_overlong_description() {
        let mut request = goal_request("ok", 5);
        request.description = "x".repeat(501);
        assert_eq!(
            request.validate(),
            Err(ValidationError::DescriptionTooLong { chars: 501 })
        );
    }

    #[test]
    fn item_input_rejects_out_of_range_percentage() {
        let low = AchievementItemInput {
            content: "done".to_string(),
            percentage: -1.0,
        };
        let high = AchievementItemInput {
            content: "done".to_string(),
            percentage: 100.5,
        };
        assert!(matches!(
            low.validate(),
            Err(ValidationError::PercentageOutOfRange { .. })
        ));
        assert!(matches!(
            high.validate(),
            Err(ValidationError::PercentageOutOfRange { .. })
        ));
    }

    #[test]
    fn item_input_accepts_boundary_percentages() {
        for percentage in [0.0, 100.0] {
            let input = AchievementItemInput {
                content: "done".to_string(),
                percentage,
            };
            assert!(input.validate().is_ok());
        }
    }

    #[test]
    fn item_input_rejects_blank_and_overlong_content() {
        let blank = AchievementItemInput {
            content: " ".to_string(),
            percentage: 10.0,
        };
        assert_eq!(blank.validate(), Err(ValidationError::EmptyContent));

        let long = AchievementItemInput {
            content: "y".repeat(1001),
            percentage: 10.0,
        };
        assert_eq!(
            long.validate(),
            Err(ValidationError::ContentTooLong { chars: 1001 })
        );
    }
}
