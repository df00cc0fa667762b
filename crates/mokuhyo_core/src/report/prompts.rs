//! Prompt rendering for report generation.
//!
//! # Responsibility
//! - Turn goals and achievements into the text block the model receives.
//! - Hold the fixed Japanese prompt templates.
//!
//! # Invariants
//! - Every goal and every item appears exactly once in the rendered block.
//! - Prompt wording is a product concern; nothing here reaches storage.

use std::collections::BTreeMap;

use crate::model::{Achievement, Goal, GoalId};

/// Renders all goals with weight, deadline, total percentage, and numbered
/// items (or an "unspecified" line when nothing is logged).
pub fn format_goals_and_achievements(
    goals: &[Goal],
    achievements: &BTreeMap<GoalId, Achievement>,
) -> String {
    let mut out = String::new();

    for (index, goal) in goals.iter().enumerate() {
        let achievement = achievements.get(&goal.id);
        let total = achievement.map(|a| a.total_percentage).unwrap_or(0.0);
        let items = achievement.map(|a| a.items.as_slice()).unwrap_or(&[]);

        out.push_str(&format!(
            "目標{}: {} (重要度: {}/10, 期日: {})\n",
            index + 1,
            goal.title,
            goal.weight,
            goal.deadline
        ));
        out.push_str(&format!("達成率: {total:.1}%\n"));

        if items.is_empty() {
            out.push_str("達成内容: 未記入\n");
        } else {
            out.push_str("達成内容:\n");
            for (item_index, item) in items.iter().enumerate() {
                out.push_str(&format!(
                    "  {}. {} ({:.1}%)\n",
                    item_index + 1,
                    item.content,
                    item.percentage
                ));
            }
        }

        out.push('\n');
    }

    out
}

/// Narrative-report prompt around a pre-rendered goals block.
pub fn report_prompt(goals_text: &str, tone_instruction: &str) -> String {
    format!(
        "以下のMBO（目標管理）の情報を基に、{tone_instruction}\n\
         \n\
         【目標と達成内容】\n\
         {goals_text}\n\
         【報告書の要件】\n\
         - 日本語で作成\n\
         - 各目標の評価と全体的な総評を含める\n\
         - 具体的な改善提案や次期への提言を含める\n\
         - 約300-500文字程度\n\
         - 読みやすい構成にする\n\
         \n\
         報告書を作成してください。"
    )
}

/// Goal-suggestion prompt for a role/department context.
pub fn goal_suggestions_prompt(role: &str, department: &str) -> String {
    let mut context = String::new();
    if !role.is_empty() {
        context.push_str(&format!("職種: {role}\n"));
    }
    if !department.is_empty() {
        context.push_str(&format!("部署: {department}\n"));
    }

    format!(
        "以下の情報を基に、MBO（目標管理）の目標案を5つ提案してください。\n\
         \n\
         {context}\n\
         【要件】\n\
         - 具体的で測定可能な目標\n\
         - SMART原則（具体的、測定可能、達成可能、関連性、期限）に従う\n\
         - 各目標に重要度（1-10）の推奨値を含める\n\
         - 日本語で作成\n\
         \n\
         目標案を提案してください。"
    )
}

/// Quality-analysis prompt for one goal and its logged text.
pub fn achievement_quality_prompt(goal_title: &str, achievement_text: &str) -> String {
    format!(
        "以下の目標と達成内容について、達成度と内容の質を分析してください。\n\
         \n\
         【目標】\n\
         {goal_title}\n\
         \n\
         【達成内容】\n\
         {achievement_text}\n\
         \n\
         【分析要件】\n\
         - 達成度の評価（0-100%）\n\
         - 達成内容の具体性\n\
         - 改善提案\n\
         - 100文字程度で簡潔に\n\
         \n\
         分析結果を提供してください。"
    )
}
