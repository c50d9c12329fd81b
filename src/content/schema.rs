//! Typed content catalog schema
//!
//! Field names follow the authored JSON (camelCase).

use crate::core::types::{ChapterNumber, SceneId};
use crate::metrics::Delta;
use serde::{Deserialize, Serialize};

/// Kinds of hands-on task a scene can carry
///
/// Unknown type strings load as `Other` so content can run ahead of code;
/// such tasks can still be completed through the generic widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskKind {
    CompetitorMatrix,
    FunnelTracking,
    AiTradeoff,
    TriageLoop,
    MilestonePlan,
    BottleneckHypothesis,
    ExperienceFlow,
    AbTestDesign,
    AbTestReadout,
    AbBrief,
    AbInstrumentation,
    AbQuality,
    AbRamp,
    Other(String),
}

impl TaskKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::CompetitorMatrix => "competitor_matrix",
            Self::FunnelTracking => "funnel_tracking",
            Self::AiTradeoff => "ai_tradeoff",
            Self::TriageLoop => "triage_loop",
            Self::MilestonePlan => "milestone_plan",
            Self::BottleneckHypothesis => "bottleneck_hypothesis",
            Self::ExperienceFlow => "experience_flow",
            Self::AbTestDesign => "ab_test_design",
            Self::AbTestReadout => "ab_test_readout",
            Self::AbBrief => "ab_brief",
            Self::AbInstrumentation => "ab_instrumentation",
            Self::AbQuality => "ab_quality",
            Self::AbRamp => "ab_ramp",
            Self::Other(s) => s,
        }
    }

    /// A/B testing family, counted toward the experiment milestone
    pub fn is_experiment(&self) -> bool {
        matches!(
            self,
            Self::AbTestDesign
                | Self::AbTestReadout
                | Self::AbBrief
                | Self::AbInstrumentation
                | Self::AbQuality
                | Self::AbRamp
        )
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for TaskKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "competitor_matrix" => Self::CompetitorMatrix,
            "funnel_tracking" => Self::FunnelTracking,
            "ai_tradeoff" => Self::AiTradeoff,
            "triage_loop" => Self::TriageLoop,
            "milestone_plan" => Self::MilestonePlan,
            "bottleneck_hypothesis" => Self::BottleneckHypothesis,
            "experience_flow" => Self::ExperienceFlow,
            "ab_test_design" => Self::AbTestDesign,
            "ab_test_readout" => Self::AbTestReadout,
            "ab_brief" => Self::AbBrief,
            "ab_instrumentation" => Self::AbInstrumentation,
            "ab_quality" => Self::AbQuality,
            "ab_ramp" => Self::AbRamp,
            _ => Self::Other(s),
        }
    }
}

impl From<TaskKind> for String {
    fn from(kind: TaskKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable option on a scene or chapter event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub delta: Delta,
    /// Scene to move to after choosing (ignored for chapter events)
    #[serde(default)]
    pub next: Option<SceneId>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub prompt: String,
    /// Widget-specific configuration, opaque to the core
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub on_complete_next: Option<SceneId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleplayLine {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleplaySpec {
    pub id: Option<String>,
    pub title: Option<String>,
    /// Opening lines sent to the model while the thread is still empty
    pub starter: Vec<RoleplayLine>,
    /// Local replies used when the AI proxy is unavailable
    pub fallbacks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: SceneId,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub chapter: Option<ChapterNumber>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    /// Hidden commentary shown only with the insight lens
    #[serde(default)]
    pub insight: Option<String>,
    #[serde(default)]
    pub options: Vec<SceneOption>,
    #[serde(default)]
    pub task: Option<TaskSpec>,
    #[serde(default)]
    pub roleplay: Option<RoleplaySpec>,
}

impl Scene {
    pub fn option(&self, id: &str) -> Option<&SceneOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Thread key for this scene's roleplay
    pub fn roleplay_id(&self) -> Option<String> {
        self.roleplay
            .as_ref()
            .map(|rp| rp.id.clone().unwrap_or_else(|| self.id.clone()))
    }
}

/// Knowledge card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Random branching micro-decision attached to a chapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub options: Vec<SceneOption>,
}

impl ChapterEvent {
    pub fn option(&self, id: &str) -> Option<&SceneOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricKey;

    #[test]
    fn test_task_kind_known_and_unknown() {
        let known: TaskKind = serde_json::from_str("\"ab_ramp\"").unwrap();
        assert_eq!(known, TaskKind::AbRamp);
        assert!(known.is_experiment());
        let unknown: TaskKind = serde_json::from_str("\"pricing_model\"").unwrap();
        assert_eq!(unknown, TaskKind::Other("pricing_model".into()));
        assert!(!unknown.is_known());
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"pricing_model\"");
    }

    #[test]
    fn test_scene_deserialization() {
        let json = r#"{
            "id": "c1_kickoff",
            "title": "Kickoff",
            "chapter": 1,
            "options": [
                {"id": "a", "label": "Ship it", "delta": {"risk": 0.05}, "next": "c1_next"}
            ],
            "task": {"type": "competitor_matrix", "prompt": "Compare", "onCompleteNext": "c1_next"}
        }"#;
        let scene: Scene = serde_json::from_str(json).unwrap();
        assert_eq!(scene.chapter, Some(1));
        assert_eq!(scene.option("a").unwrap().delta.get(MetricKey::Risk), 0.05);
        let task = scene.task.unwrap();
        assert_eq!(task.kind, TaskKind::CompetitorMatrix);
        assert_eq!(task.on_complete_next.as_deref(), Some("c1_next"));
        assert!(scene.roleplay.is_none());
    }

    #[test]
    fn test_roleplay_id_defaults_to_scene() {
        let scene: Scene = serde_json::from_str(
            r#"{"id": "s", "title": "t", "roleplay": {"title": "Sync with eng"}}"#,
        )
        .unwrap();
        assert_eq!(scene.roleplay_id().as_deref(), Some("s"));
    }
}
