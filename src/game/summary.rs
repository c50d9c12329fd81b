//! Closing portfolio summary

use super::Game;
use crate::metrics::format_value;
use crate::state::ContentMode;
use std::fmt::Write;

impl Game {
    /// Plain-text summary of the run, suitable for pasting into a portfolio
    pub fn portfolio_summary(&self) -> String {
        let state = &self.state;
        let levels = &self.config.levels;
        let mut out = String::new();

        let edition = match state.content_mode {
            ContentMode::Public => "public fictional edition",
            ContentMode::Private => "private edition",
        };
        let _ = writeln!(out, "Project: AI pet identification ({})", edition);
        let _ = writeln!(out, "Role: AI product manager (simulated)");
        let _ = writeln!(
            out,
            "Level: {} ({} xp)",
            levels.title(levels.level_from_xp(state.xp)),
            state.xp
        );

        let _ = writeln!(out, "\nOutcome of key trade-offs (game metrics):");
        for (key, value) in state.metrics.iter() {
            let _ = writeln!(out, "- {}: {}", key.label(), format_value(value));
        }

        let _ = writeln!(out, "\nDeliverables:");
        if state.deliverables.is_empty() {
            let _ = writeln!(out, "- none yet");
        }
        for deliverable in state.deliverables.values() {
            let title = if deliverable.title.is_empty() {
                deliverable.kind.as_str()
            } else {
                deliverable.title.as_str()
            };
            if deliverable.brief.is_empty() {
                let _ = writeln!(out, "- {}", title);
            } else {
                let _ = writeln!(out, "- {}: {}", title, deliverable.brief);
            }
        }

        let _ = writeln!(out, "\nAchievements:");
        if state.achievements.is_empty() {
            let _ = writeln!(out, "- none yet");
        }
        for unlock in state.achievements.iter() {
            let _ = writeln!(out, "- {}", unlock.title);
        }

        let _ = write!(
            out,
            "\nMistakes logged: {} (see the mistake book for replay)",
            state.mistakes.len()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::game;
    use crate::metrics::Delta;
    use crate::tasks::{Deliverable, TaskOutcome};

    #[test]
    fn test_summary_lists_progress() {
        let mut game = game();
        game.go_to_scene("c1_competitor");
        game.complete_task(TaskOutcome::new(
            Deliverable {
                kind: "competitor_matrix".into(),
                title: "Competitor matrix".into(),
                brief: "Three rivals compared".into(),
                data: serde_json::Value::Null,
                tag: None,
            },
            Delta::new(),
        ))
        .unwrap();
        let text = game.portfolio_summary();
        assert!(text.contains("public fictional edition"));
        assert!(text.contains("Level: Intern (35 xp)"));
        assert!(text.contains("- Competitor matrix: Three rivals compared"));
        assert!(text.contains("Mistakes logged: 0"));
        assert!(text.contains("- Efficiency: 0.00"));
    }
}
