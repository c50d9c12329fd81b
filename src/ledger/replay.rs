//! Mistake replay cursor

use crate::core::types::SceneId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplayState {
    pub active: bool,
    pub queue: Vec<SceneId>,
    pub cursor: usize,
}

/// Where a replay advance landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    Next(SceneId),
    Finished,
}

impl ReplayState {
    /// Begin a replay; returns the first scene, or `None` for an empty queue
    pub fn start(&mut self, queue: Vec<SceneId>) -> Option<SceneId> {
        let first = queue.first().cloned()?;
        self.active = true;
        self.queue = queue;
        self.cursor = 0;
        Some(first)
    }

    pub fn current(&self) -> Option<&SceneId> {
        if !self.active {
            return None;
        }
        self.queue.get(self.cursor)
    }

    /// Move to the next queued scene, clearing the replay past the end
    pub fn advance(&mut self) -> ReplayStep {
        if !self.active {
            return ReplayStep::Finished;
        }
        self.cursor += 1;
        match self.queue.get(self.cursor) {
            Some(scene) => ReplayStep::Next(scene.clone()),
            None => {
                self.clear();
                ReplayStep::Finished
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Remaining scenes including the current one
    pub fn remaining(&self) -> usize {
        if !self.active {
            return 0;
        }
        self.queue.len().saturating_sub(self.cursor)
    }

    /// Repair a loaded replay whose cursor no longer points into the queue
    pub fn normalize(&mut self) {
        if self.active && self.cursor >= self.queue.len() {
            self.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_empty_is_none() {
        let mut r = ReplayState::default();
        assert_eq!(r.start(vec![]), None);
        assert!(!r.active);
    }

    #[test]
    fn test_walk_to_end_clears() {
        let mut r = ReplayState::default();
        assert_eq!(r.start(vec!["a".into(), "b".into()]), Some("a".into()));
        assert_eq!(r.remaining(), 2);
        assert_eq!(r.advance(), ReplayStep::Next("b".into()));
        assert_eq!(r.advance(), ReplayStep::Finished);
        assert!(!r.active);
        assert!(r.queue.is_empty());
        assert_eq!(r.cursor, 0);
    }

    #[test]
    fn test_normalize_out_of_range_cursor() {
        let mut r = ReplayState {
            active: true,
            queue: vec!["a".into()],
            cursor: 4,
        };
        r.normalize();
        assert_eq!(r, ReplayState::default());
    }
}
