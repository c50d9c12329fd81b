//! Save blob encoding
//!
//! Blob shape: `{"savedAt": <epoch ms>, "appVersion": "...", "state": {...}}`.
//! Decoding never fails hard. Every top-level state field is decoded on its
//! own and falls back to its default, so a save written by an older build
//! (or one with a single damaged field) still loads.

use crate::core::config::GameConfig;
use crate::core::types::{now_ms, Timestamp};
use crate::state::game_state::GameState;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlob {
    #[serde(default)]
    pub saved_at: Timestamp,
    #[serde(default)]
    pub app_version: String,
    pub state: Value,
}

/// Why a stored blob could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailure {
    Missing,
    Corrupt,
}

/// Serialize the state into a save blob
pub fn encode(state: &GameState, app_version: &str) -> serde_json::Result<String> {
    let blob = SaveBlob {
        saved_at: now_ms(),
        app_version: app_version.to_string(),
        state: serde_json::to_value(state)?,
    };
    serde_json::to_string(&blob)
}

/// Parse a stored blob into a normalized state
pub fn decode(raw: Option<&str>, config: &GameConfig) -> Result<GameState, LoadFailure> {
    let raw = raw.ok_or(LoadFailure::Missing)?;
    let blob: SaveBlob = serde_json::from_str(raw).map_err(|e| {
        tracing::warn!("Save blob is not valid JSON: {}", e);
        LoadFailure::Corrupt
    })?;
    let Value::Object(fields) = blob.state else {
        tracing::warn!("Save blob state is not an object");
        return Err(LoadFailure::Corrupt);
    };
    if blob.app_version != config.app_version {
        tracing::info!(
            "Loading save from version {} into {}",
            blob.app_version,
            config.app_version
        );
    }
    Ok(normalize(&fields, config))
}

fn field<T: DeserializeOwned + Default>(fields: &Map<String, Value>, key: &str) -> T {
    match fields.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            tracing::warn!("Save field {} unreadable, using default: {}", key, e);
            T::default()
        }),
    }
}

fn normalize(fields: &Map<String, Value>, config: &GameConfig) -> GameState {
    let defaults = GameState::default();
    let scene_id: String = field(fields, "sceneId");

    let mut state = GameState {
        metrics: field(fields, "metrics"),
        xp: field(fields, "xp"),
        achievements: field(fields, "achievements"),
        powerups: field(fields, "powerups"),
        mistakes: field(fields, "mistakes"),
        nav_stack: field(fields, "navStack"),
        scene_id: if scene_id.is_empty() {
            defaults.scene_id
        } else {
            scene_id
        },
        chapter_index: field(fields, "chapterIndex"),
        flags: field(fields, "flags"),
        deliverables: field(fields, "deliverables"),
        history: field(fields, "history"),
        duel: field(fields, "duel"),
        replay: field(fields, "replay"),
        roleplay: field(fields, "roleplay"),
        content_mode: field(fields, "contentMode"),
        ui: Default::default(),
    };

    state.achievements.dedup();
    state.mistakes.truncate(config.mistake_capacity);
    state.nav_stack.retain_current_version();
    state.nav_stack.truncate_oldest(config.nav_capacity);
    state.replay.normalize();
    state.duel.normalize();
    state
}
