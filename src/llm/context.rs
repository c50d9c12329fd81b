//! Game context sent along with every AI request

use crate::content::schema::Scene;
use crate::core::types::SceneId;
use crate::metrics::Metrics;
use crate::state::game_state::{ContentMode, GameState, HistoryEntry};
use crate::tasks::Deliverable;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Recent history entries included in a payload
pub const CONTEXT_HISTORY: usize = 6;

/// Snapshot of the run the proxy uses to ground its reply
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiContext {
    pub content_mode: ContentMode,
    pub scene_id: SceneId,
    pub scene_title: String,
    pub chapter_index: u32,
    pub metrics: Metrics,
    pub deliverables: BTreeMap<SceneId, Deliverable>,
    pub history: Vec<HistoryEntry>,
}

impl AiContext {
    pub fn from_state(state: &GameState, scene: Option<&Scene>) -> Self {
        let skip = state.history.len().saturating_sub(CONTEXT_HISTORY);
        Self {
            content_mode: state.content_mode,
            scene_id: state.scene_id.clone(),
            scene_title: scene.map(|s| s.title.clone()).unwrap_or_default(),
            chapter_index: state.chapter_index,
            metrics: state.metrics,
            deliverables: state.deliverables.clone(),
            history: state.history[skip..].to_vec(),
        }
    }

    /// Payload object with `extra` members merged over the context
    pub fn into_payload(self, extra: Value) -> Value {
        let mut payload = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        if let Value::Object(extra) = extra {
            payload.extend(extra);
        }
        Value::Object(payload)
    }
}
