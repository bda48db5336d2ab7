//! Goal decomposition through the Gemini generateContent API.
//!
//! The planner never surfaces an error: missing credentials, network
//! failures, and unparseable responses all degrade to a templated fallback
//! plan so the board stays usable offline.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde_json::{Value, json};
use tracing::{debug, warn};

pub const MAX_PLAN_TASKS: usize = 5;

const API_KEY_ENV: &str = "GEMINI_API_KEY";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// Leading bullets or numbering the model sometimes emits despite the prompt.
static LIST_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s*").expect("valid list marker regex"));

#[derive(Debug, Clone)]
pub struct Planner {
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl Planner {
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Self {
            api_key,
            model: model.into(),
            timeout,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    /// Turns a free-text goal into 0-5 short task strings. Blank goals yield
    /// an empty plan; every failure path yields the fallback plan.
    pub fn generate_plan(&self, goal: &str) -> Vec<String> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Vec::new();
        }

        let Some(key) = self.api_key.as_deref() else {
            warn!("{API_KEY_ENV} not set; using fallback plan");
            return fallback_plan(goal);
        };

        match self.request_plan(key, goal) {
            Ok(plan) if !plan.is_empty() => {
                debug!(count = plan.len(), "plan generated");
                plan
            }
            Ok(_) => {
                warn!("planner returned no usable tasks; using fallback plan");
                fallback_plan(goal)
            }
            Err(error) => {
                warn!("plan request failed: {error:#}");
                fallback_plan(goal)
            }
        }
    }

    fn request_plan(&self, key: &str, goal: &str) -> Result<Vec<String>> {
        let url = format!("{API_BASE}/{}:generateContent?key={key}", self.model);
        let body = json!({
            "contents": [{
                "parts": [{ "text": plan_prompt(goal) }]
            }]
        });

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("failed to build http client")?;

        let response = client
            .post(&url)
            .json(&body)
            .send()
            .context("plan request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Gemini API returned HTTP {status}");
        }

        let payload: Value = response.json().context("failed to decode plan response")?;
        let text = payload
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(parse_plan_text(text))
    }
}

fn plan_prompt(goal: &str) -> String {
    format!(
        "Break down this goal into 3-5 specific, actionable tasks. \
         Return only the task list, one per line, without numbering or formatting. \
         Goal: {goal}"
    )
}

/// One task per non-empty line, stripped of list markers, capped at
/// [`MAX_PLAN_TASKS`].
pub fn parse_plan_text(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| LIST_MARKER_RE.replace(line.trim(), "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_PLAN_TASKS)
        .collect()
}

/// Templated suggestions used when the API is unavailable.
pub fn fallback_plan(goal: &str) -> Vec<String> {
    vec![
        format!("Research: {goal}"),
        format!("Plan approach for: {goal}"),
        format!("Execute: {goal}"),
        format!("Review results of: {goal}"),
        format!("Optimize: {goal}"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_planner() -> Planner {
        Planner {
            api_key: None,
            model: "gemini-pro".to_string(),
            timeout: Duration::from_millis(10),
        }
    }

    #[test]
    fn parse_plan_text_strips_markers_and_blanks() {
        let text = "1. Buy flour\n\n- Knead dough\n  * Bake bread  \n2) Cool down";
        assert_eq!(
            parse_plan_text(text),
            vec!["Buy flour", "Knead dough", "Bake bread", "Cool down"]
        );
    }

    #[test]
    fn parse_plan_text_caps_at_five_tasks() {
        let text = "a\nb\nc\nd\ne\nf\ng";
        assert_eq!(parse_plan_text(text).len(), MAX_PLAN_TASKS);
    }

    #[test]
    fn parse_plan_text_of_empty_response_is_empty() {
        assert!(parse_plan_text("").is_empty());
        assert!(parse_plan_text("\n  \n- \n").is_empty());
    }

    #[test]
    fn fallback_plan_references_the_goal() {
        let plan = fallback_plan("learn rust");
        assert_eq!(plan.len(), 5);
        assert!(plan.iter().all(|task| task.contains("learn rust")));
    }

    #[test]
    fn missing_credentials_degrade_to_fallback() {
        let planner = offline_planner();
        let plan = planner.generate_plan("ship the release");
        assert_eq!(plan, fallback_plan("ship the release"));
    }

    #[test]
    fn blank_goal_yields_empty_plan() {
        let planner = offline_planner();
        assert!(planner.generate_plan("   ").is_empty());
    }

    #[test]
    fn prompt_mentions_goal_and_line_format() {
        let prompt = plan_prompt("clean the garage");
        assert!(prompt.contains("clean the garage"));
        assert!(prompt.contains("one per line"));
    }
}
