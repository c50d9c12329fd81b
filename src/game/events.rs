//! Chapter events: one random micro-decision per chapter

use super::{ActionReport, Game};
use crate::content::ChapterEvent;
use crate::core::error::{Result, SimError};
use crate::core::types::ChapterNumber;
use crate::ledger::MistakeKind;
use crate::state::{ChapterEventState, HistoryKind};
use rand::seq::SliceRandom;

impl Game {
    /// Draw the chapter's event on first entry; later calls return the same draw
    pub fn ensure_chapter_event(&mut self, chapter: ChapterNumber) -> Option<ChapterEventState> {
        if let Some(existing) = self.state.flags.chapter_events.get(&chapter) {
            return Some(existing.clone());
        }
        let event = self.catalog.events_for(chapter).choose(&mut self.rng)?;
        let drawn = ChapterEventState {
            event_id: event.id.clone(),
            resolved: false,
            chosen_id: None,
        };
        tracing::debug!("Chapter {} event drawn: {}", chapter, drawn.event_id);
        self.state
            .flags
            .chapter_events
            .insert(chapter, drawn.clone());
        self.mark_dirty();
        Some(drawn)
    }

    /// The unresolved event for the current scene's chapter, if any
    pub fn active_chapter_event(&self) -> Option<&ChapterEvent> {
        let chapter = self.current_scene()?.chapter?;
        let drawn = self.state.flags.chapter_events.get(&chapter)?;
        if drawn.resolved {
            return None;
        }
        self.catalog.event(chapter, &drawn.event_id)
    }

    /// Choose an option on the active chapter event
    pub fn resolve_chapter_event(&mut self, option_id: &str) -> Result<ActionReport> {
        let event = self
            .active_chapter_event()
            .cloned()
            .ok_or(SimError::NoActiveEvent)?;
        let chapter = self
            .current_scene()
            .and_then(|s| s.chapter)
            .ok_or(SimError::NoActiveEvent)?;
        let option = event
            .option(option_id)
            .cloned()
            .ok_or_else(|| SimError::OptionNotFound {
                scene: event.id.clone(),
                option: option_id.to_string(),
            })?;

        self.push_snapshot();
        let mut report = ActionReport::default();

        self.apply_delta(&option.delta);
        self.award_xp(self.config.xp.event, &mut report);
        if let Some(drawn) = self.state.flags.chapter_events.get_mut(&chapter) {
            drawn.resolved = true;
            drawn.chosen_id = Some(option.id.clone());
        }
        self.record(
            HistoryKind::Event,
            Some(event.id.clone()),
            option.delta.clone(),
            format!("{}: {}", event.title, option.label),
        );
        let reason = option.note.as_deref().unwrap_or(&option.label);
        self.judge_decision(
            MistakeKind::Event,
            &event.id,
            reason,
            &option.delta,
            &mut report,
        );
        tracing::info!("Chapter {} event {} resolved with {}", chapter, event.id, option.id);

        self.unlock_due(&[], &mut report);
        self.finish_action(&report);
        Ok(report)
    }
}
