use chrono::NaiveDate;
use mokuhyo_core::{
    AchievementItemInput, MboService, MemoryStore, PeriodRepository, RepoError, ServiceError,
    ValidationError,
};
use uuid::Uuid;

fn deadline() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
}

fn repo_with_goal(store: &MemoryStore) -> (PeriodRepository<&MemoryStore>, Uuid) {
    let mut repo = PeriodRepository::open(store);
    repo.create_period("2024-Q1").unwrap();
    let goal_id = repo
        .add_goal("increase sales 20%", 8, deadline(), "")
        .unwrap();
    (repo, goal_id)
}

#[test]
fn add_item_to_unknown_goal_fails() {
    let store = MemoryStore::new();
    let (mut repo, _) = repo_with_goal(&store);

    let missing = Uuid::new_v4();
    let result = repo.add_achievement_item(missing, "phantom", 10.0);
    assert!(matches!(result, Err(RepoError::GoalNotFound(id)) if id == missing));
}

#[test]
fn item_sum_is_capped_at_the_goal_level() {
    let store = MemoryStore::new();
    let (mut repo, goal_id) = repo_with_goal(&store);

    repo.add_achievement_item(goal_id, "signed client A", 40.0)
        .unwrap();
    repo.add_achievement_item(goal_id, "signed client B", 70.0)
        .unwrap();

    // 40 + 70 caps at 100, and the single fully-weighted goal drives the
    // overall rate to 100 as well.
    assert_eq!(repo.goal_total_percentage(goal_id), 100.0);
    assert_eq!(repo.calculate_achievement_rate(), 100.0);
}

#[test]
fn partial_sums_are_not_capped() {
    let store = MemoryStore::new();
    let (mut repo, goal_id) = repo_with_goal(&store);

    repo.add_achievement_item(goal_id, "kickoff", 30.0).unwrap();
    repo.add_achievement_item(goal_id, "mid review", 45.5).unwrap();

    assert_eq!(repo.goal_total_percentage(goal_id), 75.5);
}

#[test]
fn one_oversized_item_caps_only_the_total() {
    let store = MemoryStore::new();
    let (mut repo, goal_id) = repo_with_goal(&store);

    // The repository trusts its callers; bounds live in the service layer.
    repo.add_achievement_item(goal_id, "overshot", 150.0).unwrap();

    assert_eq!(repo.goal_achievement_items(goal_id)[0].percentage, 150.0);
    assert_eq!(repo.goal_total_percentage(goal_id), 100.0);
}

#[test]
fn update_replaces_both_fields_and_stamps_updated_at() {
    let store = MemoryStore::new();
    let (mut repo, goal_id) = repo_with_goal(&store);

    let item_id = repo
        .add_achievement_item(goal_id, "signed client A", 40.0)
        .unwrap();
    assert!(repo.goal_achievement_items(goal_id)[0].updated_at.is_none());

    repo.update_achievement_item(goal_id, item_id, "signed clients A and B", 65.0)
        .unwrap();

    let item = &repo.goal_achievement_items(goal_id)[0];
    assert_eq!(item.content, "signed clients A and B");
    assert_eq!(item.percentage, 65.0);
    assert!(item.updated_at.is_some());
    assert_eq!(repo.goal_total_percentage(goal_id), 65.0);
}

#[test]
fn update_with_unknown_ids_fails() {
    let store = MemoryStore::new();
    let (mut repo, goal_id) = repo_with_goal(&store);
    let item_id = repo
        .add_achievement_item(goal_id, "signed client A", 40.0)
        .unwrap();

    let missing_goal = Uuid::new_v4();
    assert!(matches!(
        repo.update_achievement_item(missing_goal, item_id, "x", 1.0),
        Err(RepoError::GoalNotFound(id)) if id == missing_goal
    ));

    let missing_item = Uuid::new_v4();
    assert!(matches!(
        repo.update_achievement_item(goal_id, missing_item, "x", 1.0),
        Err(RepoError::ItemNotFound { item_id, .. }) if item_id == missing_item
    ));
}

#[test]
fn delete_item_recomputes_the_total() {
    let store = MemoryStore::new();
    let (mut repo, goal_id) = repo_with_goal(&store);

    let keep = repo
        .add_achievement_item(goal_id, "signed client A", 40.0)
        .unwrap();
    let remove = repo
        .add_achievement_item(goal_id, "signed client B", 70.0)
        .unwrap();
    assert_eq!(repo.goal_total_percentage(goal_id), 100.0);

    repo.delete_achievement_item(goal_id, remove).unwrap();

    let items = repo.goal_achievement_items(goal_id);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, keep);
    assert_eq!(repo.goal_total_percentage(goal_id), 40.0);
}

#[test]
fn delete_of_an_absent_item_is_a_silent_noop() {
    let store = MemoryStore::new();
    let (mut repo, goal_id) = repo_with_goal(&store);

    repo.add_achievement_item(goal_id, "signed client A", 40.0)
        .unwrap();

    repo.delete_achievement_item(goal_id, Uuid::new_v4()).unwrap();
    repo.delete_achievement_item(Uuid::new_v4(), Uuid::new_v4())
        .unwrap();

    assert_eq!(repo.goal_achievement_items(goal_id).len(), 1);
    assert_eq!(repo.goal_total_percentage(goal_id), 40.0);
}

#[test]
fn service_enforces_the_per_goal_item_cap() {
    let store = MemoryStore::new();
    let mut service = MboService::open(&store);
    service.create_period("2024-Q1").unwrap();
    let goal_id = service
        .add_goal(mokuhyo_core::AddGoalRequest {
            title: "many small wins".to_string(),
            weight: 5,
            deadline: deadline(),
            description: String::new(),
        })
        .unwrap();

    for index in 0..20 {
        service
            .add_achievement_item(
                goal_id,
                AchievementItemInput {
                    content: format!("step {index}"),
                    percentage: 1.0,
                },
            )
            .unwrap();
    }

    let overflow = service.add_achievement_item(
        goal_id,
        AchievementItemInput {
            content: "one too many".to_string(),
            percentage: 1.0,
        },
    );
    assert!(matches!(
        overflow,
        Err(ServiceError::Validation(ValidationError::TooManyItems { .. }))
    ));
    assert_eq!(service.goal_achievement_items(goal_id).len(), 20);
}
