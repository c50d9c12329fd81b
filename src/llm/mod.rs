//! AI proxy integration
//!
//! The proxy is optional. Every call degrades to a local fallback when the
//! proxy is unreachable or answers with something unusable.

pub mod client;
pub mod context;
pub mod parser;

pub use client::{AiProxy, HealthStatus};
pub use context::AiContext;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Actions understood by `POST /api/ai`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiAction {
    RoleplayStep,
    DuelQuestion,
    DuelScore,
}

impl AiAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiAction::RoleplayStep => "roleplay_step",
            AiAction::DuelQuestion => "duel_question",
            AiAction::DuelScore => "duel_score",
        }
    }
}

impl fmt::Display for AiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for `POST /api/ai`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiRequest {
    pub action: AiAction,
    pub payload: Value,
}

/// The `result` member of a successful proxy reply
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AiResult {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub json: Option<Value>,
}

impl AiResult {
    /// Structured body: `json` when present, else JSON embedded in `text`
    pub fn body(&self) -> Option<Value> {
        if let Some(json) = self.json.as_ref().filter(|v| !v.is_null()) {
            return Some(json.clone());
        }
        parser::extract_json(&self.text)
            .ok()
            .and_then(|s| serde_json::from_str(s).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_wire_names() {
        assert_eq!(
            serde_json::to_value(AiAction::RoleplayStep).unwrap(),
            json!("roleplay_step")
        );
        assert_eq!(AiAction::DuelScore.to_string(), "duel_score");
    }

    #[test]
    fn test_body_prefers_json() {
        let result = AiResult {
            text: r#"{"a": 1}"#.into(),
            json: Some(json!({"b": 2})),
        };
        assert_eq!(result.body(), Some(json!({"b": 2})));
    }

    #[test]
    fn test_body_from_text() {
        let result = AiResult {
            text: "Sure! {\"reply\": \"ok\"} hope that helps".into(),
            json: None,
        };
        assert_eq!(result.body(), Some(json!({"reply": "ok"})));
        assert_eq!(AiResult::default().body(), None);
    }
}
