//! The single root state object

use crate::content::START_SCENE;
use crate::core::types::{ChapterNumber, SceneId, Timestamp};
use crate::ledger::{MistakeLedger, ReplayState};
use crate::metrics::{Delta, Metrics};
use crate::progression::{Achievements, Powerups};
use crate::state::duel::DuelState;
use crate::state::snapshot::NavStack;
use crate::tasks::Deliverable;
use crate::ui::state::UiState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle of a scene's task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Idle,
    Active,
    Completed,
}

/// The event drawn for one chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterEventState {
    pub event_id: String,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub chosen_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Flags {
    pub task_status: BTreeMap<SceneId, TaskStatus>,
    pub chapter_events: BTreeMap<ChapterNumber, ChapterEventState>,
}

impl Flags {
    pub fn task_status(&self, scene_id: &str) -> TaskStatus {
        self.task_status.get(scene_id).copied().unwrap_or_default()
    }

    pub fn is_completed(&self, scene_id: &str) -> bool {
        self.task_status(scene_id) == TaskStatus::Completed
    }
}

/// Which content bundle the run uses; carried into summaries and AI payloads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    #[default]
    Public,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Choice,
    Task,
    Skip,
    Event,
    Duel,
}

/// Audit log entry; read only by the closing summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub at: Timestamp,
    pub kind: HistoryKind,
    pub scene_id: SceneId,
    #[serde(default)]
    pub ref_id: Option<String>,
    #[serde(default)]
    pub delta: Delta,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleplayMessage {
    pub role: String,
    pub text: String,
    #[serde(default)]
    pub at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameState {
    pub metrics: Metrics,
    pub xp: u32,
    pub achievements: Achievements,
    pub powerups: Powerups,
    pub mistakes: MistakeLedger,
    pub nav_stack: NavStack,
    pub scene_id: SceneId,
    /// Zero-based chapter position (`chapter - 1` of the current scene)
    pub chapter_index: u32,
    pub flags: Flags,
    pub deliverables: BTreeMap<SceneId, Deliverable>,
    pub history: Vec<HistoryEntry>,
    pub duel: DuelState,
    pub replay: ReplayState,
    /// Roleplay threads keyed by roleplay id
    pub roleplay: BTreeMap<String, Vec<RoleplayMessage>>,
    pub content_mode: ContentMode,
    #[serde(skip)]
    pub ui: UiState,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            metrics: Metrics::default(),
            xp: 0,
            achievements: Achievements::default(),
            powerups: Powerups::default(),
            mistakes: MistakeLedger::default(),
            nav_stack: NavStack::default(),
            scene_id: START_SCENE.into(),
            chapter_index: 0,
            flags: Flags::default(),
            deliverables: BTreeMap::new(),
            history: Vec::new(),
            duel: DuelState::default(),
            replay: ReplayState::default(),
            roleplay: BTreeMap::new(),
            content_mode: ContentMode::default(),
            ui: UiState::default(),
        }
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed tasks
    pub fn completed_tasks(&self) -> usize {
        self.flags
            .task_status
            .values()
            .filter(|s| **s == TaskStatus::Completed)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_starts_at_start_scene() {
        let state = GameState::new();
        assert_eq!(state.scene_id, START_SCENE);
        assert_eq!(state.xp, 0);
        assert!(state.nav_stack.is_empty());
    }

    #[test]
    fn test_ui_is_not_serialized() {
        let mut state = GameState::new();
        state.ui.cards_open = true;
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("ui").is_none());
        let back: GameState = serde_json::from_value(json).unwrap();
        assert!(!back.ui.cards_open);
    }

    #[test]
    fn test_chapter_event_keys_serialize_as_strings() {
        let mut flags = Flags::default();
        flags.chapter_events.insert(
            2,
            ChapterEventState {
                event_id: "outage".into(),
                resolved: false,
                chosen_id: None,
            },
        );
        let json = serde_json::to_string(&flags).unwrap();
        assert!(json.contains("\"2\""));
        let back: Flags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flags);
    }

    #[test]
    fn test_task_status_defaults_idle() {
        let flags = Flags::default();
        assert_eq!(flags.task_status("anything"), TaskStatus::Idle);
        assert!(!flags.is_completed("anything"));
    }
}
