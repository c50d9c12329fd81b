//! Mistake replay: revisit every scene with a logged mistake, in ledger order

use super::{ActionReport, Game};
use crate::core::types::SceneId;
use crate::ledger::ReplayStep;
use crate::progression::AchievementId;
use crate::ui::state::Notice;

impl Game {
    /// Distinct scenes with mistakes, most recent first, limited to known scenes
    pub fn mistake_replay_scenes(&self) -> Vec<SceneId> {
        self.state
            .mistakes
            .replay_scenes(|id| self.catalog.contains_scene(id))
    }

    /// Start a replay at the first queued scene; `None` when nothing to replay
    pub fn start_replay(&mut self) -> Option<SceneId> {
        let queue = self.mistake_replay_scenes();
        let count = queue.len();
        let Some(first) = self.state.replay.start(queue) else {
            self.state.ui.notify(&Notice::ReplayEmpty);
            self.mark_dirty();
            return None;
        };
        tracing::info!("Replay started over {} scenes", count);
        self.go_to_scene(&first);
        self.state.ui.notify(&Notice::ReplayStarted { scenes: count });
        self.commit();
        Some(first)
    }

    /// Move to the next replay scene; finishing unlocks `replay_complete`
    pub fn advance_replay(&mut self) -> (ReplayStep, ActionReport) {
        let mut report = ActionReport::default();
        if !self.state.replay.active {
            return (ReplayStep::Finished, report);
        }
        let step = self.state.replay.advance();
        match &step {
            ReplayStep::Next(scene_id) => {
                self.go_to_scene(scene_id);
                report.moved_to = Some(scene_id.clone());
                self.commit();
            }
            ReplayStep::Finished => {
                tracing::info!("Replay finished");
                self.unlock_due(&[AchievementId::ReplayComplete], &mut report);
                if report.notices().is_empty() {
                    self.state.ui.notify(&Notice::ReplayFinished);
                    self.commit();
                } else {
                    self.finish_action(&report);
                }
            }
        }
        (step, report)
    }

    /// Abandon a running replay without the completion reward
    pub fn stop_replay(&mut self) {
        if self.state.replay.active {
            self.state.replay.clear();
            self.commit();
        }
    }
}
