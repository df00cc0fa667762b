//! CSV projections over one period: per-goal summary and per-item detail.
//!
//! # Responsibility
//! - Render deterministic, stateless tabular views for external consumption.
//!
//! # Invariants
//! - Row order follows goal display order, then item insertion order.
//! - In the detailed view a goal with zero items still emits exactly one
//!   placeholder row, so row count per period >= goal count.
//! - Fields containing comma, quote, or newline are quoted with inner quotes
//!   doubled.

use crate::model::{Achievement, Period};

/// Placeholder used where nothing has been logged yet.
pub const EMPTY_PLACEHOLDER: &str = "未記入";

const SUMMARY_HEADER: [&str; 10] = [
    "期間",
    "目標ID",
    "目標タイトル",
    "重要度",
    "期日",
    "目標詳細",
    "達成率(%)",
    "達成項目数",
    "達成項目詳細",
    "作成日",
];

const DETAILED_HEADER: [&str; 11] = [
    "期間",
    "目標ID",
    "目標タイトル",
    "目標重要度",
    "目標期日",
    "目標詳細",
    "達成項目ID",
    "達成項目内容",
    "達成項目率(%)",
    "達成項目作成日",
    "目標全体達成率(%)",
];

/// One row per goal: totals, item count, and a pipe-joined item digest.
pub fn summary_csv(period_name: &str, period: &Period) -> String {
    let mut out = String::new();
    push_row(&mut out, &SUMMARY_HEADER);

    for goal in &period.goals {
        let achievement = period.achievements.get(&goal.id);
        let total = achievement.map(|a| a.total_percentage).unwrap_or(0.0);
        let item_count = achievement.map(|a| a.items.len()).unwrap_or(0);
        push_row(
            &mut out,
            &[
                period_name,
                &goal.id.to_string(),
                &goal.title,
                &goal.weight.to_string(),
                &goal.deadline.to_string(),
                &goal.description,
                &format!("{total:.1}"),
                &item_count.to_string(),
                &item_digest(achievement),
                &goal.created_at.date_naive().to_string(),
            ],
        );
    }

    out
}

/// One row per achievement item; goals without items emit one placeholder row.
pub fn detailed_csv(period_name: &str, period: &Period) -> String {
    let mut out = String::new();
    push_row(&mut out, &DETAILED_HEADER);

    for goal in &period.goals {
        let achievement = period.achievements.get(&goal.id);
        let total = achievement.map(|a| a.total_percentage).unwrap_or(0.0);
        let items = achievement.map(|a| a.items.as_slice()).unwrap_or(&[]);

        if items.is_empty() {
            push_row(
                &mut out,
                &[
                    period_name,
                    &goal.id.to_string(),
                    &goal.title,
                    &goal.weight.to_string(),
                    &goal.deadline.to_string(),
                    &goal.description,
                    "",
                    EMPTY_PLACEHOLDER,
                    "0.0",
                    "",
                    "0.0",
                ],
            );
            continue;
        }

        for item in items {
            push_row(
                &mut out,
                &[
                    period_name,
                    &goal.id.to_string(),
                    &goal.title,
                    &goal.weight.to_string(),
                    &goal.deadline.to_string(),
                    &goal.description,
                    &item.id.to_string(),
                    &item.content,
                    &format!("{:.1}", item.percentage),
                    &item.created_at.date_naive().to_string(),
                    &format!("{total:.1}"),
                ],
            );
        }
    }

    out
}

/// Renders `"<n>. <content> (<percentage>%)"` for every item, pipe-joined,
/// or the placeholder when nothing is logged.
fn item_digest(achievement: Option<&Achievement>) -> String {
    let items = achievement.map(|a| a.items.as_slice()).unwrap_or(&[]);
    if items.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            format!("{}. {} ({:.1}%)", index + 1, item.content, item.percentage)
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn push_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        push_field(out, field.as_ref());
    }
    out.push('\n');
}

fn push_field(out: &mut String, field: &str) {
    if !field.contains([',', '"', '\n', '\r']) {
        out.push_str(field);
        return;
    }
    out.push('"');
    for ch in field.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}
