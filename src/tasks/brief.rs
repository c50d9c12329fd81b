//! Generic written-brief widget
//!
//! Works for any task kind: the player writes a one-line summary and a few
//! supporting points. Used by the terminal client, and by content whose
//! task type has no dedicated widget.

use crate::content::schema::{Scene, TaskKind};
use crate::core::error::{Result, SimError};
use crate::metrics::{Delta, MetricKey};
use crate::tasks::{Deliverable, TaskOutcome};
use serde_json::json;

/// Minimum summary length in characters
pub const MIN_SUMMARY_CHARS: usize = 12;

/// Minimum number of supporting points
pub const MIN_POINTS: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct BriefInput {
    pub summary: String,
    pub points: Vec<String>,
}

impl BriefInput {
    /// Parse `summary; point one; point two`
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split(';').map(str::trim).filter(|p| !p.is_empty());
        let summary = parts.next().unwrap_or_default().to_string();
        let points = parts.map(str::to_string).collect();
        Self { summary, points }
    }
}

/// Validate the input and build the outcome
///
/// Returns `SimError::Validation` for incomplete input; the caller may
/// resubmit as often as needed.
pub fn submit(scene: &Scene, input: &BriefInput) -> Result<TaskOutcome> {
    let task = scene
        .task
        .as_ref()
        .ok_or_else(|| SimError::NoTask(scene.id.clone()))?;

    if input.summary.chars().count() < MIN_SUMMARY_CHARS {
        return Err(SimError::Validation(format!(
            "summary needs at least {} characters",
            MIN_SUMMARY_CHARS
        )));
    }
    if input.points.len() < MIN_POINTS {
        return Err(SimError::Validation(format!(
            "add at least {} supporting points",
            MIN_POINTS
        )));
    }

    let depth = (input.points.len() - MIN_POINTS).min(3) as f64;
    let mut delta = Delta::new()
        .with(MetricKey::Accuracy, 0.02 + 0.01 * depth)
        .with(MetricKey::Risk, -0.02);
    if task.kind.is_experiment() {
        delta.add(MetricKey::Risk, -0.01);
    }
    if matches!(task.kind, TaskKind::ExperienceFlow | TaskKind::TriageLoop) {
        delta.add(MetricKey::Ux, 0.02);
    }

    let deliverable = Deliverable {
        kind: task.kind.to_string(),
        title: scene.title.clone(),
        brief: input.summary.clone(),
        data: json!({ "points": input.points }),
        tag: None,
    };
    Ok(TaskOutcome::new(deliverable, delta))
}
