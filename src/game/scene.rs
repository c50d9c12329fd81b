//! Resolved view of the current scene

use super::Game;
use crate::content::{Scene, SceneOption, TaskKind};
use crate::core::types::{ChapterNumber, SceneId};
use crate::metrics::Delta;
use crate::state::TaskStatus;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionView {
    pub id: String,
    pub label: String,
    pub subtitle: Option<String>,
    pub delta: Delta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub kind: TaskKind,
    pub prompt: String,
    pub status: TaskStatus,
    pub can_skip: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub chapter: ChapterNumber,
    pub id: String,
    pub title: String,
    pub body: String,
    pub options: Vec<OptionView>,
}

/// Everything the view needs to draw the current scene
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneView {
    pub scene_id: SceneId,
    pub title: String,
    pub body: String,
    pub chapter: Option<ChapterNumber>,
    pub tag: Option<String>,
    pub note: Option<String>,
    /// Present only once the insight lens is unlocked
    pub insight: Option<String>,
    pub options: Vec<OptionView>,
    pub task: Option<TaskView>,
    pub event: Option<EventView>,
    pub roleplay: Option<String>,
    /// True when the scene id is not in the catalog
    pub placeholder: bool,
}

fn option_views<'a>(options: impl IntoIterator<Item = &'a SceneOption>) -> Vec<OptionView> {
    options
        .into_iter()
        .map(|o| OptionView {
            id: o.id.clone(),
            label: o.label.clone(),
            subtitle: o.subtitle.clone(),
            delta: o.delta.clone(),
        })
        .collect()
}

impl SceneView {
    fn placeholder(scene_id: &str) -> Self {
        Self {
            scene_id: scene_id.to_string(),
            title: "Scene not found".into(),
            body: format!("No scene with id \"{}\" exists in this content.", scene_id),
            chapter: None,
            tag: None,
            note: None,
            insight: None,
            options: Vec::new(),
            task: None,
            event: None,
            roleplay: None,
            placeholder: true,
        }
    }
}

impl Game {
    /// Resolve the current scene; unknown ids yield a placeholder
    pub fn scene_view(&self) -> SceneView {
        let Some(scene) = self.current_scene() else {
            return SceneView::placeholder(&self.state.scene_id);
        };
        let Scene {
            id,
            title,
            body,
            chapter,
            tag,
            note,
            insight,
            options,
            task,
            roleplay,
        } = scene;

        let task = task.as_ref().map(|t| TaskView {
            kind: t.kind.clone(),
            prompt: t.prompt.clone(),
            status: self.state.flags.task_status(id),
            can_skip: self.skip_denied().is_none(),
        });
        let event = self.active_chapter_event().and_then(|e| {
            Some(EventView {
                chapter: (*chapter)?,
                id: e.id.clone(),
                title: e.title.clone(),
                body: e.body.clone(),
                options: option_views(&e.options),
            })
        });

        SceneView {
            scene_id: id.clone(),
            title: title.clone(),
            body: body.clone(),
            chapter: *chapter,
            tag: tag.clone(),
            note: note.clone(),
            insight: insight.clone().filter(|_| self.state.powerups.insight_lens),
            options: option_views(options),
            task,
            event,
            roleplay: roleplay
                .as_ref()
                .map(|rp| rp.title.clone().unwrap_or_else(|| title.clone())),
            placeholder: false,
        }
    }
}
