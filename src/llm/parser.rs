//! Parse proxy replies into game values
//!
//! Model output is untrusted: every parser here returns `Option` (or a
//! `Result` for the envelope) and the caller falls back locally on `None`.

use crate::core::error::{Result, SimError};
use crate::llm::AiResult;
use crate::state::duel::{DuelFeedback, DuelQuestion, DuelSource};
use serde_json::Value;

/// Extract the JSON object from a model response (handles surrounding text)
pub fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| SimError::Ai("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| SimError::Ai("No closing brace found in response".into()))?;
    if end < start {
        return Err(SimError::Ai("Malformed JSON in response".into()));
    }
    Ok(&response[start..=end])
}

/// Decode the `{ok, result: {text, json}}` envelope of `POST /api/ai`
pub fn parse_envelope(body: &str) -> Result<AiResult> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| SimError::Ai(format!("Malformed proxy reply: {}", e)))?;
    if value.get("ok").and_then(Value::as_bool) == Some(false) {
        let msg = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("proxy reported failure");
        return Err(SimError::Ai(msg.to_string()));
    }
    match value.get("result") {
        Some(Value::Object(map)) if map.contains_key("text") || map.contains_key("json") => {
            serde_json::from_value(Value::Object(map.clone()))
                .map_err(|e| SimError::Ai(format!("Malformed result: {}", e)))
        }
        Some(Value::String(text)) => Ok(AiResult {
            text: text.clone(),
            json: None,
        }),
        Some(other) => Ok(AiResult {
            text: String::new(),
            json: Some(other.clone()),
        }),
        None => Ok(AiResult {
            text: String::new(),
            json: Some(value),
        }),
    }
}

fn str_field<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| body.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn str_list(body: &Value, key: &str) -> Vec<String> {
    body.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// `{"question": "...", "rubric": [...], "keywords": [...]}`
pub fn parse_duel_question(result: &AiResult, round: u32) -> Option<DuelQuestion> {
    let body = result.body()?;
    let prompt = str_field(&body, &["question", "prompt"])?;
    let id = str_field(&body, &["id"])
        .map(str::to_string)
        .unwrap_or_else(|| format!("ai_q{}", round));
    Some(DuelQuestion {
        id,
        prompt: prompt.to_string(),
        keywords: str_list(&body, "keywords"),
        rubric: str_list(&body, "rubric"),
        source: DuelSource::Ai,
    })
}

/// `{"score": 1..5, "comment": "...", "matched": [...], "missed": [...]}`
pub fn parse_duel_score(result: &AiResult) -> Option<DuelFeedback> {
    let body = result.body()?;
    let raw = body.get("score").and_then(|v| {
        v.as_f64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    })?;
    if !raw.is_finite() {
        return None;
    }
    let score = raw.round().clamp(1.0, 5.0) as u8;
    let comment = str_field(&body, &["comment", "feedback"])
        .unwrap_or_default()
        .to_string();
    Some(DuelFeedback {
        score,
        comment,
        matched: str_list(&body, "matched"),
        missed: str_list(&body, "missed"),
        source: DuelSource::Ai,
    })
}

/// Model reply for a roleplay turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleplayReply {
    pub reply: String,
    pub next_actions: Vec<String>,
    pub risks: Vec<String>,
}

impl RoleplayReply {
    /// Reply with next actions and risks folded into one message
    pub fn into_text(self) -> String {
        let mut text = self.reply;
        if !self.next_actions.is_empty() {
            text.push_str(&format!("\n\nNext steps: {}", self.next_actions.join("; ")));
        }
        if !self.risks.is_empty() {
            text.push_str(&format!("\n\nWatch out for: {}", self.risks.join("; ")));
        }
        text
    }
}

/// `{"reply": "...", "next_actions": [...], "risks": [...]}`, or plain text
pub fn parse_roleplay_reply(result: &AiResult) -> Option<RoleplayReply> {
    if let Some(body) = result.body() {
        if let Some(reply) = str_field(&body, &["reply", "text"]) {
            return Some(RoleplayReply {
                reply: reply.to_string(),
                next_actions: str_list(&body, "next_actions"),
                risks: str_list(&body, "risks"),
            });
        }
    }
    let text = result.text.trim();
    (!text.is_empty() && !text.starts_with('{')).then(|| RoleplayReply {
        reply: text.to_string(),
        ..Default::default()
    })
}
