//! Undo snapshots
//!
//! Snapshots list the persisted fields explicitly. Transient UI state and
//! the undo stack itself are never captured, so restoring a snapshot cannot
//! bring back an open modal or a stale error.

use crate::core::types::{ChapterNumber, SceneId};
use crate::ledger::{MistakeLedger, ReplayState};
use crate::metrics::Metrics;
use crate::progression::{Achievements, Powerups};
use crate::state::duel::DuelState;
use crate::state::game_state::{ContentMode, Flags, GameState, HistoryEntry, RoleplayMessage};
use crate::tasks::Deliverable;
use crate::ui::state::UiState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Bumped whenever the captured field set changes
pub const SNAPSHOT_VERSION: u32 = 1;

/// Default maximum undo depth
pub const MAX_NAV_SNAPSHOTS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub version: u32,
    pub metrics: Metrics,
    pub xp: u32,
    pub achievements: Achievements,
    pub powerups: Powerups,
    pub mistakes: MistakeLedger,
    pub scene_id: SceneId,
    pub chapter_index: ChapterNumber,
    pub flags: Flags,
    pub deliverables: BTreeMap<SceneId, Deliverable>,
    pub history: Vec<HistoryEntry>,
    pub duel: DuelState,
    pub replay: ReplayState,
    pub roleplay: BTreeMap<String, Vec<RoleplayMessage>>,
    pub content_mode: ContentMode,
}

impl StateSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            metrics: state.metrics,
            xp: state.xp,
            achievements: state.achievements.clone(),
            powerups: state.powerups,
            mistakes: state.mistakes.clone(),
            scene_id: state.scene_id.clone(),
            chapter_index: state.chapter_index,
            flags: state.flags.clone(),
            deliverables: state.deliverables.clone(),
            history: state.history.clone(),
            duel: state.duel.clone(),
            replay: state.replay.clone(),
            roleplay: state.roleplay.clone(),
            content_mode: state.content_mode,
        }
    }

    /// Rebuild a full state around the given (already popped) stack
    pub fn restore(self, nav_stack: NavStack) -> GameState {
        GameState {
            metrics: self.metrics,
            xp: self.xp,
            achievements: self.achievements,
            powerups: self.powerups,
            mistakes: self.mistakes,
            nav_stack,
            scene_id: self.scene_id,
            chapter_index: self.chapter_index,
            flags: self.flags,
            deliverables: self.deliverables,
            history: self.history,
            duel: self.duel,
            replay: self.replay,
            roleplay: self.roleplay,
            content_mode: self.content_mode,
            ui: UiState::default(),
        }
    }
}

/// Bounded LIFO of snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavStack(VecDeque<StateSnapshot>);

impl NavStack {
    /// Push, dropping the oldest snapshot once `capacity` is exceeded
    pub fn push(&mut self, snapshot: StateSnapshot, capacity: usize) {
        self.0.push_back(snapshot);
        while self.0.len() > capacity.max(1) {
            self.0.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<StateSnapshot> {
        self.0.pop_back()
    }

    pub fn peek(&self) -> Option<&StateSnapshot> {
        self.0.back()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop the oldest entries beyond `capacity`
    pub fn truncate_oldest(&mut self, capacity: usize) {
        while self.0.len() > capacity {
            self.0.pop_front();
        }
    }

    /// Drop snapshots from a different snapshot version
    pub fn retain_current_version(&mut self) {
        let before = self.0.len();
        self.0.retain(|s| s.version == SNAPSHOT_VERSION);
        if self.0.len() != before {
            tracing::warn!(
                "Dropped {} undo snapshots from an older save format",
                before - self.0.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_at(xp: u32) -> StateSnapshot {
        let state = GameState {
            xp,
            ..GameState::default()
        };
        StateSnapshot::capture(&state)
    }

    #[test]
    fn test_capture_restore_keeps_persisted_fields() {
        let mut state = GameState::new();
        state.xp = 42;
        state.scene_id = "c1_kickoff".into();
        state.ui.cards_open = true;
        state.ui.error = Some("boom".into());
        let restored = StateSnapshot::capture(&state).restore(NavStack::default());
        assert_eq!(restored.xp, 42);
        assert_eq!(restored.scene_id, "c1_kickoff");
        assert!(!restored.ui.cards_open);
        assert!(restored.ui.error.is_none());
    }

    #[test]
    fn test_push_drops_oldest_over_capacity() {
        let mut stack = NavStack::default();
        for xp in 0..60 {
            stack.push(snapshot_at(xp), MAX_NAV_SNAPSHOTS);
        }
        assert_eq!(stack.len(), MAX_NAV_SNAPSHOTS);
        assert_eq!(stack.peek().map(|s| s.xp), Some(59));
        let mut last = None;
        while let Some(s) = stack.pop() {
            last = Some(s.xp);
        }
        assert_eq!(last, Some(10));
    }

    #[test]
    fn test_retain_current_version() {
        let mut stack = NavStack::default();
        let mut old = snapshot_at(1);
        old.version = 0;
        stack.push(old, 10);
        stack.push(snapshot_at(2), 10);
        stack.retain_current_version();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.peek().map(|s| s.xp), Some(2));
    }
}
