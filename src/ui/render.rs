//! Plain-text rendering of the game and a JSON state probe

use crate::game::Game;
use crate::metrics::{display_percent, format_value};
use crate::state::DuelPhase;
use serde_json::{json, Value};
use std::fmt::Write;

/// Width of the text progress bars
const BAR_WIDTH: usize = 20;

fn bar(percent: u8) -> String {
    let filled = usize::from(percent) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Full screen for the terminal client
pub fn render_text(game: &Game) -> String {
    let state = game.state();
    let config = game.config();
    let levels = &config.levels;
    let view = game.scene_view();
    let mut out = String::new();

    let level = levels.level_from_xp(state.xp);
    let _ = writeln!(
        out,
        "== {} | {} xp {} | {} ==",
        levels.title(level),
        state.xp,
        bar(levels.progress(state.xp)),
        game.ai_status().label()
    );
    let metrics: Vec<String> = state
        .metrics
        .iter()
        .map(|(k, v)| {
            format!(
                "{} {} ({}%)",
                k.label(),
                format_value(v),
                display_percent(v, config.metric_bound)
            )
        })
        .collect();
    let _ = writeln!(out, "{}", metrics.join(" | "));
    let _ = writeln!(
        out,
        "Skips: {}  Hints: {}  Lens: {}  Mistakes: {}  Undo: {}",
        state.powerups.skip_task_charges,
        state.powerups.duel_hint_charges,
        if state.powerups.insight_lens { "on" } else { "off" },
        state.mistakes.len(),
        state.nav_stack.len()
    );
    if state.replay.active {
        let _ = writeln!(out, "Replay: {} scenes left", state.replay.remaining());
    }

    let _ = writeln!(out);
    match view.chapter {
        Some(ch) => {
            let _ = writeln!(out, "[Chapter {}] {}", ch, view.title);
        }
        None => {
            let _ = writeln!(out, "{}", view.title);
        }
    }
    if !view.body.is_empty() {
        let _ = writeln!(out, "{}", view.body);
    }
    if let Some(note) = &view.note {
        let _ = writeln!(out, "Note: {}", note);
    }
    if let Some(insight) = &view.insight {
        let _ = writeln!(out, "Insight: {}", insight);
    }

    for option in &view.options {
        let _ = write!(out, "  ({}) {}", option.id, option.label);
        if let Some(sub) = &option.subtitle {
            let _ = write!(out, " - {}", sub);
        }
        let _ = writeln!(out);
    }

    if let Some(task) = &view.task {
        let _ = writeln!(out, "Task [{}] ({:?}): {}", task.kind, task.status, task.prompt);
        if task.can_skip {
            let _ = writeln!(out, "  A skip charge can bypass this task.");
        }
    }

    if let Some(event) = &view.event {
        let _ = writeln!(out, "\n!! Chapter event: {}", event.title);
        if !event.body.is_empty() {
            let _ = writeln!(out, "{}", event.body);
        }
        for option in &event.options {
            let _ = writeln!(out, "  <{}> {}", option.id, option.label);
        }
    }

    if let Some(title) = &view.roleplay {
        let _ = writeln!(out, "\nRoleplay: {}", title);
        for message in game.roleplay_thread() {
            let _ = writeln!(out, "  {}: {}", message.role, message.text);
        }
    }

    let duel = &state.duel;
    if duel.active || duel.phase == DuelPhase::Finished {
        let _ = writeln!(out, "\nInterview duel, round {}/{}", duel.round, config.duel_rounds);
        if let Some(q) = duel.question.as_ref().filter(|_| duel.active) {
            let _ = writeln!(out, "  Q: {}", q.prompt);
        }
        for hint in &duel.hints {
            let _ = writeln!(out, "  hint: {}", hint);
        }
        if let Some(fb) = &duel.feedback {
            let _ = writeln!(out, "  Score {}/5: {}", fb.score, fb.comment);
        }
        if let Some(summary) = &duel.summary {
            let _ = writeln!(out, "  {}", summary.text);
        }
    }

    if state.ui.cards_open {
        let _ = writeln!(out, "\n-- Knowledge cards --");
        for card in game.catalog().cards() {
            let _ = writeln!(out, "* {}: {}", card.title, card.body);
        }
    }
    if let Some(error) = &state.ui.error {
        let _ = writeln!(out, "\nError: {}", error);
    }
    if let Some(toast) = &state.ui.toast {
        let _ = writeln!(out, "\n>> {}", toast);
    }
    out
}

/// Compact machine-readable description of what is on screen
pub fn probe(game: &Game) -> Value {
    let state = game.state();
    let view = game.scene_view();
    json!({
        "sceneId": view.scene_id,
        "sceneTitle": view.title,
        "placeholder": view.placeholder,
        "chapterIndex": state.chapter_index,
        "contentMode": state.content_mode,
        "metrics": state.metrics,
        "xp": state.xp,
        "level": game.config().levels.level_from_xp(state.xp),
        "clickableOptionIds": view.options.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(),
        "task": view.task.as_ref().map(|t| json!({"type": t.kind, "status": t.status})),
        "event": view.event.as_ref().map(|e| json!({
            "id": e.id,
            "optionIds": e.options.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(),
        })),
        "roleplay": view.roleplay,
        "duel": {
            "active": state.duel.active,
            "round": state.duel.round,
            "phase": state.duel.phase,
        },
        "replay": state.replay,
        "powerups": state.powerups,
        "mistakes": state.mistakes.len(),
        "undoDepth": state.nav_stack.len(),
        "ai": game.ai_status().label(),
    })
}
