use chrono::NaiveDate;
use mokuhyo_core::{MemoryStore, PeriodRepository, Statistics};

fn deadline() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
}

#[test]
fn no_current_period_yields_default_statistics() {
    let store = MemoryStore::new();
    let repo = PeriodRepository::open(&store);

    assert_eq!(repo.statistics(), Statistics::default());
    assert_eq!(repo.calculate_achievement_rate(), 0.0);
}

#[test]
fn empty_period_yields_zero_counters() {
    let store = MemoryStore::new();
    let mut repo = PeriodRepository::open(&store);
    repo.create_period("2024-Q1").unwrap();

    let stats = repo.statistics();
    assert_eq!(stats.total_goals, 0);
    assert_eq!(stats.achievement_rate, 0.0);
    assert_eq!(stats.total_weight, 0);
}

#[test]
fn rate_is_the_weight_proportional_average() {
    let store = MemoryStore::new();
    let mut repo = PeriodRepository::open(&store);
    repo.create_period("2024-Q1").unwrap();

    let heavy = repo.add_goal("heavy", 8, deadline(), "").unwrap();
    let light = repo.add_goal("light", 2, deadline(), "").unwrap();
    repo.add_achievement_item(heavy, "done", 100.0).unwrap();
    repo.add_achievement_item(light, "half", 50.0).unwrap();

    // (8 * 100 + 2 * 50) / 10 = 90
    assert_eq!(repo.calculate_achievement_rate(), 90.0);
}

#[test]
fn zero_total_weight_guards_the_division() {
    let store = MemoryStore::new();
    let mut repo = PeriodRepository::open(&store);
    repo.create_period("2024-Q1").unwrap();

    // The repository does not re-validate weight bounds, so a zero weight
    // can reach it from a direct caller; the rate must still be defined.
    repo.add_goal("weightless", 0, deadline(), "").unwrap();
    assert_eq!(repo.calculate_achievement_rate(), 0.0);
}

#[test]
fn counters_split_completed_partial_and_untouched_goals() {
    let store = MemoryStore::new();
    let mut repo = PeriodRepository::open(&store);
    repo.create_period("2024-Q1").unwrap();

    let done = repo.add_goal("done goal", 5, deadline(), "").unwrap();
    let partial = repo.add_goal("partial goal", 3, deadline(), "").unwrap();
    repo.add_goal("untouched goal", 2, deadline(), "").unwrap();

    repo.add_achievement_item(done, "a", 60.0).unwrap();
    repo.add_achievement_item(done, "b", 60.0).unwrap();
    repo.add_achievement_item(partial, "c", 50.0).unwrap();

    let stats = repo.statistics();
    assert_eq!(stats.total_goals, 3);
    assert_eq!(stats.completed_goals, 1);
    assert_eq!(stats.partial_goals, 1);
    assert_eq!(stats.total_weight, 10);
    assert_eq!(stats.total_achievement_items, 3);
    // (5 * 100 + 3 * 50 + 2 * 0) / 10 = 65
    assert_eq!(stats.achievement_rate, 65.0);
}
