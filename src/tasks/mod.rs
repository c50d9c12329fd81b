//! Task results consumed by the reducer
//!
//! Task widgets are independent producers: each validates its own input
//! and returns a `TaskOutcome`. The reducer never sees widget internals.

pub mod brief;

use crate::content::schema::{Scene, TaskKind};
use crate::metrics::Delta;
use serde::{Deserialize, Serialize};

/// Tag carried by deliverables synthesized through the skip power-up
pub const SKIP_TAG: &str = "skipped";

/// Structured output of a completed task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliverable {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub brief: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Deliverable {
    pub fn is_skipped(&self) -> bool {
        self.tag.as_deref() == Some(SKIP_TAG)
    }
}

/// What a widget hands back on a successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    pub deliverable: Deliverable,
    pub delta: Delta,
    /// Overrides the default task XP when present
    pub xp_award: Option<u32>,
    pub feedback_tag: Option<String>,
}

impl TaskOutcome {
    pub fn new(deliverable: Deliverable, delta: Delta) -> Self {
        Self {
            deliverable,
            delta,
            xp_award: None,
            feedback_tag: None,
        }
    }

    pub fn with_xp(mut self, xp: u32) -> Self {
        self.xp_award = Some(xp);
        self
    }

    /// Conservative placeholder used when a task is skipped
    pub fn skipped(scene: &Scene, kind: &TaskKind, delta: Delta, xp: u32) -> Self {
        let deliverable = Deliverable {
            kind: kind.to_string(),
            title: format!("{} (skipped)", scene.title),
            brief: "Skipped with a power-up; no analysis recorded.".into(),
            data: serde_json::Value::Null,
            tag: Some(SKIP_TAG.into()),
        };
        Self {
            deliverable,
            delta,
            xp_award: Some(xp),
            feedback_tag: Some(SKIP_TAG.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_outcome_is_tagged() {
        let scene: Scene =
            serde_json::from_str(r#"{"id": "s", "title": "Competitor scan"}"#).unwrap();
        let outcome = TaskOutcome::skipped(&scene, &TaskKind::CompetitorMatrix, Delta::new(), 15);
        assert!(outcome.deliverable.is_skipped());
        assert_eq!(outcome.deliverable.kind, "competitor_matrix");
        assert_eq!(outcome.xp_award, Some(15));
    }

    #[test]
    fn test_deliverable_json_shape() {
        let d: Deliverable = serde_json::from_str(
            r#"{"type": "triage_loop", "title": "Triage plan", "brief": "2 fixes", "data": {"n": 2}}"#,
        )
        .unwrap();
        assert_eq!(d.kind, "triage_loop");
        assert!(!d.is_skipped());
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("tag"));
    }
}
