//! Blocking client for narrative-report generation via the Claude API.
//!
//! # Responsibility
//! - Send goals and achievements to the Messages API and return prose.
//! - Convert every transport or API failure into an in-band user-facing
//!   string; callers never branch on a report error code.
//!
//! # Invariants
//! - The client is a collaborator, not core logic: nothing here touches the
//!   repository or the persisted document.
//! - Calls are synchronous and bounded only by the configured timeout; there
//!   are no retries.

pub mod prompts;

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use log::warn;
use serde_json::Value;

use crate::model::{Achievement, Goal, GoalId};

const ANTHROPIC_VERSION: &str = "2023-06-01";

const MISSING_KEY_REPORT: &str =
    "⚠️ Claude APIキーが設定されていません。設定タブでAPIキーを入力してください。";
const MISSING_KEY_SHORT: &str = "⚠️ Claude APIキーが設定されていません。";

/// Configuration for the Messages API client.
#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    /// Model identifier.
    pub model: String,
    /// Response token budget.
    pub max_tokens: u32,
    /// Sampling temperature for report generation.
    pub temperature: f64,
    /// API origin, overridable for tests.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-sonnet-20240229".into(),
            max_tokens: 1000,
            temperature: 0.7,
            base_url: "https://api.anthropic.com".into(),
            timeout_secs: 60,
        }
    }
}

/// Report tone selecting one of three fixed instruction strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTone {
    Positive,
    Balanced,
    Strict,
}

impl ReportTone {
    /// Display label as shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "ポジティブ",
            Self::Balanced => "バランス",
            Self::Strict => "厳しめ",
        }
    }

    /// Resolves a UI label; unknown labels fall back to `Balanced`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "ポジティブ" => Self::Positive,
            "厳しめ" => Self::Strict,
            _ => Self::Balanced,
        }
    }

    /// Fixed instruction embedded into the report prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Positive => {
                "非常にポジティブで、達成したことを称賛し、成長を強調する報告書を作成してください。"
            }
            Self::Balanced => {
                "客観的でバランスの取れた、建設的なフィードバックを含む報告書を作成してください。"
            }
            Self::Strict => {
                "厳しく客観的な視点で、改善点を明確に指摘する報告書を作成してください。"
            }
        }
    }
}

/// Error raised inside the client; always flattened into an in-band string
/// before it reaches a caller.
#[derive(Debug)]
enum ReportError {
    /// Transport-level failure (connect, timeout, TLS).
    RequestFailed { message: String },
    /// Non-success HTTP status from the API.
    ApiStatus { status: u16, message: String },
    /// Response body did not contain the expected text block.
    MalformedResponse { message: String },
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed { message } => write!(f, "request failed: {message}"),
            Self::ApiStatus { status, message } => {
                write!(f, "API returned status {status}: {message}")
            }
            Self::MalformedResponse { message } => {
                write!(f, "malformed API response: {message}")
            }
        }
    }
}

impl Error for ReportError {}

/// Client for the Claude Messages API.
pub struct ClaudeReportClient {
    config: ClaudeConfig,
    api_key: String,
}

impl ClaudeReportClient {
    /// Creates a client with default configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, ClaudeConfig::default())
    }

    /// Creates a client with explicit configuration.
    pub fn with_config(api_key: impl Into<String>, config: ClaudeConfig) -> Self {
        Self {
            config,
            api_key: api_key.into(),
        }
    }

    /// Replaces the API key.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = api_key.into();
    }

    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Generates a narrative report over the given goals and achievements.
    ///
    /// Returns prose on success, or an in-band warning/error string when the
    /// client is unconfigured or the call fails.
    pub fn generate_report(
        &self,
        goals: &[Goal],
        achievements: &BTreeMap<GoalId, Achievement>,
        tone: ReportTone,
    ) -> String {
        if !self.is_configured() {
            return MISSING_KEY_REPORT.to_string();
        }

        let goals_text = prompts::format_goals_and_achievements(goals, achievements);
        let prompt = prompts::report_prompt(&goals_text, tone.instruction());

        match self.complete(&prompt, self.config.max_tokens, self.config.temperature) {
            Ok(text) => text,
            Err(err) => {
                warn!("event=report_generate module=report status=error error={err}");
                format!("❌ 報告書の生成中にエラーが発生しました: {err}")
            }
        }
    }

    /// Suggests goals for a role/department context.
    pub fn generate_goal_suggestions(&self, role: &str, department: &str) -> String {
        if !self.is_configured() {
            return MISSING_KEY_SHORT.to_string();
        }

        let prompt = prompts::goal_suggestions_prompt(role, department);
        match self.complete(&prompt, self.config.max_tokens, 0.8) {
            Ok(text) => text,
            Err(err) => {
                warn!("event=report_suggest module=report status=error error={err}");
                format!("❌ 目標提案の生成中にエラーが発生しました: {err}")
            }
        }
    }

    /// Analyzes the quality of logged achievement text for one goal.
    pub fn analyze_achievement_quality(&self, goal_title: &str, achievement_text: &str) -> String {
        if !self.is_configured() {
            return MISSING_KEY_SHORT.to_string();
        }
        if achievement_text.trim().is_empty() {
            return "達成内容が入力されていません。".to_string();
        }

        let prompt = prompts::achievement_quality_prompt(goal_title, achievement_text);
        match self.complete(&prompt, 500, 0.5) {
            Ok(text) => text,
            Err(err) => {
                warn!("event=report_analyze module=report status=error error={err}");
                format!("❌ 達成内容の分析中にエラーが発生しました: {err}")
            }
        }
    }

    fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String, ReportError> {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build();
        let url = format!("{}/v1/messages", self.config.base_url);
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": max_tokens,
            "temperature": temperature,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = agent
            .post(&url)
            .set("x-api-key", &self.api_key)
            .set("anthropic-version", ANTHROPIC_VERSION)
            .send_json(body)
            .map_err(|err| match err {
                ureq::Error::Status(status, response) => ReportError::ApiStatus {
                    status,
                    message: response.into_string().unwrap_or_default(),
                },
                other => ReportError::RequestFailed {
                    message: other.to_string(),
                },
            })?;

        let value: Value = response.into_json().map_err(|err| {
            ReportError::MalformedResponse {
                message: err.to_string(),
            }
        })?;

        value
            .get("content")
            .and_then(|content| content.get(0))
            .and_then(|block| block.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ReportError::MalformedResponse {
                message: "missing content[0].text".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{ClaudeReportClient, ReportTone, MISSING_KEY_REPORT, MISSING_KEY_SHORT};
    use std::collections::BTreeMap;

    #[test]
    fn tone_labels_round_trip_and_unknown_falls_back() {
        for tone in [ReportTone::Positive, ReportTone::Balanced, ReportTone::Strict] {
            assert_eq!(ReportTone::from_label(tone.label()), tone);
        }
        assert_eq!(ReportTone::from_label("???"), ReportTone::Balanced);
    }

    #[test]
    fn tones_select_distinct_instructions() {
        let instructions = [
            ReportTone::Positive.instruction(),
            ReportTone::Balanced.instruction(),
            ReportTone::Strict.instruction(),
        ];
        assert_ne!(instructions[0], instructions[1]);
        assert_ne!(instructions[1], instructions[2]);
    }

    #[test]
    fn unconfigured_client_returns_warning_without_network() {
        let client = ClaudeReportClient::new("");
        assert!(!client.is_configured());
        assert_eq!(
            client.generate_report(&[], &BTreeMap::new(), ReportTone::Balanced),
            MISSING_KEY_REPORT
        );
        assert_eq!(client.generate_goal_suggestions("", ""), MISSING_KEY_SHORT);
        assert_eq!(
            client.analyze_achievement_quality("title", "text"),
            MISSING_KEY_SHORT
        );
    }

    #[test]
    fn quality_analysis_short_circuits_on_blank_text() {
        let client = ClaudeReportClient::new("test-key");
        assert_eq!(
            client.analyze_achievement_quality("title", "   "),
            "達成内容が入力されていません。"
        );
    }
}
