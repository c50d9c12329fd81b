//! Core reducers: choices, tasks, XP, achievements, navigation and undo

use super::Game;
use crate::content::Scene;
use crate::core::error::{Result, SimError, SkipDenied};
use crate::core::types::{now_ms, SceneId};
use crate::ledger::{MistakeEntry, MistakeKind};
use crate::metrics::Delta;
use crate::progression::{apply_achievement_rewards, AchievementId, AchievementUnlock, XpGrant};
use crate::state::{HistoryEntry, HistoryKind, StateSnapshot, TaskStatus};
use crate::tasks::TaskOutcome;
use crate::ui::state::Notice;

/// Experiment-family tasks needed for `experiment_owner`
const EXPERIMENT_TASKS_FOR_OWNER: usize = 3;

/// What a reducer did, for the caller to display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionReport {
    pub xp: Option<XpGrant>,
    /// Tier title reached when the grant crossed a threshold
    pub level_up: Option<String>,
    pub unlocked: Vec<AchievementUnlock>,
    pub rewards: Vec<String>,
    pub mistake: bool,
    pub moved_to: Option<SceneId>,
}

impl ActionReport {
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        if let Some(title) = &self.level_up {
            notices.push(Notice::LevelUp {
                title: title.clone(),
            });
        }
        for unlock in &self.unlocked {
            notices.push(Notice::Achievement {
                title: unlock.title.clone(),
            });
        }
        notices.extend(self.rewards.iter().cloned().map(Notice::Reward));
        if self.mistake {
            notices.push(Notice::MistakeLogged);
        }
        notices
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    Restored { scene_id: SceneId },
    Empty,
}

impl Game {
    // === PROGRESSION ===

    /// Add XP and report whether a tier threshold was crossed
    pub fn grant_xp(&mut self, amount: u32) -> XpGrant {
        let grant = self.config.levels.grant(&mut self.state.xp, amount);
        if grant.leveled_up {
            tracing::info!(
                "Level up: {} -> {} ({} xp)",
                self.config.levels.title(grant.prev_level),
                self.config.levels.title(grant.next_level),
                self.state.xp
            );
        }
        self.mark_dirty();
        grant
    }

    /// Idempotent unlock by id; unknown ids are ignored
    pub fn unlock_achievement(&mut self, id: &str) -> Option<AchievementUnlock> {
        let unlock = self.state.achievements.unlock(id);
        if unlock.is_some() {
            self.mark_dirty();
        }
        unlock
    }

    pub(crate) fn award_xp(&mut self, amount: u32, report: &mut ActionReport) {
        let grant = self.grant_xp(amount);
        if grant.leveled_up {
            report.level_up = Some(self.config.levels.title(grant.next_level).to_string());
        }
        report.xp = Some(grant);
    }

    /// Unlock every achievement whose condition now holds and grant its rewards
    pub(crate) fn unlock_due(&mut self, extra: &[AchievementId], report: &mut ActionReport) {
        let mut due = self.due_achievements();
        due.extend_from_slice(extra);
        let unlocked: Vec<AchievementUnlock> = due
            .into_iter()
            .filter_map(|id| self.state.achievements.unlock_id(id))
            .collect();
        if unlocked.is_empty() {
            return;
        }
        let rewards = apply_achievement_rewards(&unlocked, &mut self.state.powerups);
        for reward in &rewards {
            tracing::info!("Reward granted: {}", reward);
        }
        report.unlocked.extend(unlocked);
        report.rewards.extend(rewards);
    }

    fn due_achievements(&self) -> Vec<AchievementId> {
        let flags = &self.state.flags;
        let mut due = Vec::new();

        if self.state.completed_tasks() > 0 {
            due.push(AchievementId::FirstTask);
        }

        for chapter in 1..=u32::from(AchievementId::MAX_CHAPTER) {
            let mut tasks = self.catalog.chapter_task_scenes(chapter).peekable();
            if tasks.peek().is_none() {
                continue;
            }
            if tasks.all(|s| flags.is_completed(&s.id)) {
                due.extend(AchievementId::chapter_clear(chapter));
            }
        }

        let experiments = self
            .catalog
            .task_scenes()
            .filter(|s| s.task.as_ref().is_some_and(|t| t.kind.is_experiment()))
            .filter(|s| flags.is_completed(&s.id))
            .count();
        if experiments >= EXPERIMENT_TASKS_FOR_OWNER {
            due.push(AchievementId::ExperimentOwner);
        }

        let mut all = self.catalog.task_scenes().peekable();
        if all.peek().is_some() && all.all(|s| flags.is_completed(&s.id)) {
            due.push(AchievementId::AllTasks);
        }

        if flags.chapter_events.values().any(|e| e.resolved) {
            due.push(AchievementId::FirstEvent);
        }

        due.retain(|id| !self.state.achievements.has(*id));
        due
    }

    // === SHARED REDUCER STEPS ===

    pub(crate) fn push_snapshot(&mut self) {
        let snapshot = StateSnapshot::capture(&self.state);
        self.state.nav_stack.push(snapshot, self.config.nav_capacity);
    }

    pub(crate) fn apply_delta(&mut self, delta: &Delta) {
        let bound = self.config.write_bound();
        self.state.metrics.apply(delta, bound);
    }

    pub(crate) fn record(
        &mut self,
        kind: HistoryKind,
        ref_id: Option<String>,
        delta: Delta,
        note: impl Into<String>,
    ) {
        self.state.history.push(HistoryEntry {
            at: now_ms(),
            kind,
            scene_id: self.state.scene_id.clone(),
            ref_id,
            delta,
            note: note.into(),
        });
    }

    /// Log a mistake when the delta scores as wrong
    pub(crate) fn judge_decision(
        &mut self,
        kind: MistakeKind,
        ref_id: &str,
        reason: &str,
        delta: &Delta,
        report: &mut ActionReport,
    ) {
        if let Some(score) = self.config.scorer.judge(delta) {
            self.log_mistake(
                MistakeEntry::new(kind, self.state.scene_id.clone(), ref_id, reason)
                    .with_score(score),
            );
            report.mistake = true;
        }
    }

    pub(crate) fn log_mistake(&mut self, entry: MistakeEntry) {
        let logged = self.state.mistakes.push(entry, self.config.mistake_capacity);
        tracing::debug!(
            "Mistake logged: {:?} {}/{} (x{})",
            logged.kind,
            logged.scene_id,
            logged.ref_id,
            logged.count
        );
    }

    /// Surface the most important notice and persist
    pub(crate) fn finish_action(&mut self, report: &ActionReport) {
        if let Some(notice) = report.notices().into_iter().next() {
            self.state.ui.notify(&notice);
        }
        self.commit();
    }

    // === NAVIGATION ===

    /// Move to a scene
    ///
    /// Unknown ids are allowed and render as a placeholder. Entering a task
    /// scene marks the task active; entering a chapter draws its event.
    pub fn go_to_scene(&mut self, scene_id: &str) {
        self.state.scene_id = scene_id.to_string();
        self.state.ui.cards_open = false;
        let (chapter, has_task) = match self.catalog.scene(scene_id) {
            Some(scene) => (scene.chapter, scene.task.is_some()),
            None => {
                tracing::warn!("Navigating to unknown scene {}", scene_id);
                (None, false)
            }
        };
        if let Some(chapter) = chapter {
            self.state.chapter_index = chapter.saturating_sub(1);
            self.ensure_chapter_event(chapter);
        }
        if has_task && self.state.flags.task_status(scene_id) == TaskStatus::Idle {
            self.state
                .flags
                .task_status
                .insert(scene_id.to_string(), TaskStatus::Active);
        }
        self.mark_dirty();
    }

    /// Pop one snapshot and restore it in full
    pub fn go_back_one_step(&mut self) -> UndoOutcome {
        let mut stack = std::mem::take(&mut self.state.nav_stack);
        let Some(snapshot) = stack.pop() else {
            self.state.nav_stack = stack;
            self.state.ui.notify(&Notice::NothingToUndo);
            self.mark_dirty();
            return UndoOutcome::Empty;
        };
        self.state = snapshot.restore(stack);
        self.state.ui.notify(&Notice::Undone);
        tracing::debug!("Undo to scene {}", self.state.scene_id);
        self.commit();
        UndoOutcome::Restored {
            scene_id: self.state.scene_id.clone(),
        }
    }

    fn scene_or_err(&self) -> Result<Scene> {
        self.current_scene()
            .cloned()
            .ok_or_else(|| SimError::SceneNotFound(self.state.scene_id.clone()))
    }

    // === CHOICES ===

    /// Choose one of the current scene's options
    pub fn choose_option(&mut self, option_id: &str) -> Result<ActionReport> {
        let scene = self.scene_or_err()?;
        let option = scene
            .option(option_id)
            .cloned()
            .ok_or_else(|| SimError::OptionNotFound {
                scene: scene.id.clone(),
                option: option_id.to_string(),
            })?;

        self.push_snapshot();
        let mut report = ActionReport::default();

        self.apply_delta(&option.delta);
        self.award_xp(self.config.xp.choice, &mut report);
        self.record(
            HistoryKind::Choice,
            Some(option.id.clone()),
            option.delta.clone(),
            option.label.clone(),
        );
        let reason = option.note.as_deref().unwrap_or(&option.label);
        self.judge_decision(
            MistakeKind::Choice,
            &option.id,
            reason,
            &option.delta,
            &mut report,
        );

        if let Some(next) = &option.next {
            self.go_to_scene(next);
            report.moved_to = Some(next.clone());
        }
        self.finish_action(&report);
        Ok(report)
    }

    // === TASKS ===

    /// Accept a widget's outcome for the current scene's task
    ///
    /// Resubmitting a completed task replaces the deliverable and applies
    /// the delta again, but grants no further XP.
    pub fn complete_task(&mut self, outcome: TaskOutcome) -> Result<ActionReport> {
        let scene = self.scene_or_err()?;
        if scene.task.is_none() {
            return Err(SimError::NoTask(scene.id));
        }
        self.push_snapshot();
        let report = self.apply_task_outcome(&scene, outcome, HistoryKind::Task);
        self.finish_action(&report);
        Ok(report)
    }

    /// Why the current scene's task cannot be skipped, if it cannot
    pub fn skip_denied(&self) -> Option<SkipDenied> {
        let Some(task) = self.current_scene().and_then(|s| s.task.as_ref()) else {
            return Some(SkipDenied::NoTask);
        };
        if !self.config.is_skippable(&task.kind) {
            Some(SkipDenied::NotSkippable)
        } else if self.state.flags.is_completed(&self.state.scene_id) {
            Some(SkipDenied::AlreadyCompleted)
        } else if self.state.powerups.skip_task_charges == 0 {
            Some(SkipDenied::NoCharges)
        } else {
            None
        }
    }

    /// Spend a skip charge to complete the task with a placeholder
    pub fn skip_task(&mut self) -> Result<ActionReport> {
        if let Some(reason) = self.skip_denied() {
            return Err(SimError::SkipUnavailable(reason));
        }
        let scene = self.scene_or_err()?;
        let Some(task) = scene.task.as_ref() else {
            return Err(SimError::SkipUnavailable(SkipDenied::NoTask));
        };

        self.push_snapshot();
        if !self.state.powerups.try_spend_skip() {
            return Err(SimError::SkipUnavailable(SkipDenied::NoCharges));
        }
        let outcome = TaskOutcome::skipped(
            &scene,
            &task.kind,
            self.config.skip_delta.clone(),
            self.config.xp.skipped_task,
        );
        tracing::info!(
            "Skipped task {} ({} charges left)",
            scene.id,
            self.state.powerups.skip_task_charges
        );
        let report = self.apply_task_outcome(&scene, outcome, HistoryKind::Skip);
        if report.notices().is_empty() {
            self.state.ui.notify(&Notice::TaskSkipped);
            self.commit();
        } else {
            self.finish_action(&report);
        }
        Ok(report)
    }

    fn apply_task_outcome(
        &mut self,
        scene: &Scene,
        outcome: TaskOutcome,
        kind: HistoryKind,
    ) -> ActionReport {
        let mut report = ActionReport::default();
        let first_completion = !self.state.flags.is_completed(&scene.id);

        self.apply_delta(&outcome.delta);
        if first_completion {
            let amount = outcome.xp_award.unwrap_or(self.config.xp.task);
            self.award_xp(amount, &mut report);
        }

        let kind_name = outcome.deliverable.kind.clone();
        let note = outcome
            .feedback_tag
            .clone()
            .unwrap_or_else(|| outcome.deliverable.title.clone());
        self.state
            .deliverables
            .insert(scene.id.clone(), outcome.deliverable);
        self.state
            .flags
            .task_status
            .insert(scene.id.clone(), TaskStatus::Completed);
        self.record(kind, Some(kind_name.clone()), outcome.delta.clone(), note);
        self.judge_decision(
            MistakeKind::Task,
            &kind_name,
            "Task result moved the metrics the wrong way",
            &outcome.delta,
            &mut report,
        );

        self.unlock_due(&[], &mut report);

        if let Some(next) = scene.task.as_ref().and_then(|t| t.on_complete_next.as_ref()) {
            self.go_to_scene(next);
            report.moved_to = Some(next.clone());
        }
        report
    }
}
