//! Legacy document upgrade: v1 single-string achievements to v2 item lists.
//!
//! # Responsibility
//! - Detect documents written in the legacy format (no version tag, or the
//!   legacy tag).
//! - Transform them into the current shape as a pure value-to-value function.
//!
//! # Invariants
//! - Non-blank legacy achievement text becomes exactly one item at 100%.
//! - Blank or missing legacy text becomes an empty item list at 0%.
//! - The result is always tagged with the current schema version.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::warn;
use serde_json::Value;
use uuid::Uuid;

use crate::model::limits::DEFAULT_WEIGHT;
use crate::model::{
    Achievement, AchievementItem, Document, Goal, Period, LEGACY_DATA_VERSION,
};

/// Returns whether the raw JSON value is in the legacy format.
pub fn needs_migration(value: &Value) -> bool {
    match value.get("version").and_then(Value::as_str) {
        None => true,
        Some(tag) => tag == LEGACY_DATA_VERSION,
    }
}

/// Upgrades a legacy JSON value to a current-format document.
///
/// Unrecognizable parts degrade field-by-field (defaults) rather than
/// aborting the whole upgrade; a goal without a usable ID is dropped since
/// nothing could ever address it.
pub fn migrate_legacy(value: &Value) -> Document {
    let mut document = Document::default();

    if let Some(settings) = value.get("settings") {
        document.settings = serde_json::from_value(settings.clone()).unwrap_or_default();
    }
    document.current_period = value
        .get("current_period")
        .and_then(Value::as_str)
        .map(str::to_string);

    if let Some(periods) = value.get("periods").and_then(Value::as_object) {
        for (name, period_value) in periods {
            document
                .periods
                .insert(name.clone(), migrate_period(period_value));
        }
    }

    document
}

fn migrate_period(value: &Value) -> Period {
    let mut period = Period::new();

    if let Some(raw) = value.get("created_at").and_then(Value::as_str) {
        if let Some(created_at) = parse_timestamp(raw) {
            period.created_at = created_at;
        }
    }

    if let Some(goals) = value.get("goals").and_then(Value::as_array) {
        for goal_value in goals {
            match migrate_goal(goal_value) {
                Some(goal) => period.goals.push(goal),
                None => {
                    warn!("event=store_migrate module=store status=goal_dropped reason=unusable_id");
                }
            }
        }
    }

    let legacy_achievements = value.get("achievements").and_then(Value::as_object);
    for goal in &period.goals {
        let text = legacy_achievements
            .and_then(|map| map.get(&goal.id.to_string()))
            .and_then(Value::as_str)
            .unwrap_or("");
        period.achievements.insert(goal.id, migrate_achievement(text));
    }

    period
}

fn migrate_goal(value: &Value) -> Option<Goal> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())?;

    let deadline = value
        .get("deadline")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse::<NaiveDate>().ok())
        .unwrap_or_else(|| Utc::now().date_naive());

    let created_at = value
        .get("created_at")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .unwrap_or_else(Utc::now);

    Some(Goal {
        id,
        title: value
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        weight: value
            .get("weight")
            .and_then(Value::as_u64)
            .and_then(|weight| u8::try_from(weight).ok())
            .unwrap_or(DEFAULT_WEIGHT),
        deadline,
        description: value
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        created_at,
    })
}

fn migrate_achievement(text: &str) -> Achievement {
    if text.trim().is_empty() {
        return Achievement::default();
    }
    let mut achievement = Achievement {
        items: vec![AchievementItem::new(text, 100.0)],
        total_percentage: 0.0,
    };
    achievement.recalculate();
    achievement
}

/// Parses timestamps written either as RFC 3339 or as a naive ISO string
/// (the legacy writer recorded local time without an offset; those are
/// taken as UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
