//! Load and validate the content catalog
//!
//! Content is validated once at load time. Structural problems (duplicate
//! ids, dangling scene pointers, missing start scene) fail the load so they
//! never surface mid-game.

use crate::content::schema::{Card, ChapterEvent, Scene};
use crate::core::error::{Result, SimError};
use crate::core::types::ChapterNumber;
use ahash::{AHashMap, AHashSet};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Scene every new game starts on
pub const START_SCENE: &str = "start";

const EMBEDDED_SCENES: &str = include_str!("../../data/scenes.json");
const EMBEDDED_CARDS: &str = include_str!("../../data/cards.json");

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneFile {
    scenes: Vec<Scene>,
    #[serde(default)]
    chapter_events: BTreeMap<ChapterNumber, Vec<ChapterEvent>>,
}

#[derive(Deserialize)]
struct CardFile {
    #[serde(default)]
    cards: Vec<Card>,
}

/// Immutable content loaded at boot
#[derive(Debug, Clone)]
pub struct Catalog {
    scenes: Vec<Scene>,
    cards: Vec<Card>,
    chapter_events: BTreeMap<ChapterNumber, Vec<ChapterEvent>>,
    index: AHashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from already-parsed parts and validate it
    pub fn new(
        scenes: Vec<Scene>,
        cards: Vec<Card>,
        chapter_events: BTreeMap<ChapterNumber, Vec<ChapterEvent>>,
    ) -> Result<Self> {
        let index = scenes
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        let catalog = Self {
            scenes,
            cards,
            chapter_events,
            index,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse the scene and card documents
    pub fn from_json(scenes_json: &str, cards_json: &str) -> Result<Self> {
        let scene_file: SceneFile = serde_json::from_str(scenes_json)
            .map_err(|e| SimError::Content(format!("scenes: {}", e)))?;
        let card_file: CardFile = serde_json::from_str(cards_json)
            .map_err(|e| SimError::Content(format!("cards: {}", e)))?;
        Self::new(scene_file.scenes, card_file.cards, scene_file.chapter_events)
    }

    /// Load `scenes.json` and `cards.json` from a directory
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let scenes = fs::read_to_string(dir.join("scenes.json"))?;
        let cards = match fs::read_to_string(dir.join("cards.json")) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => r#"{"cards": []}"#.into(),
            Err(e) => return Err(e.into()),
        };
        let catalog = Self::from_json(&scenes, &cards)?;
        tracing::info!(
            "Loaded content from {}: {} scenes, {} cards",
            dir.display(),
            catalog.scenes.len(),
            catalog.cards.len()
        );
        Ok(catalog)
    }

    /// The content bundled with the crate
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_SCENES, EMBEDDED_CARDS)
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.index.get(id).and_then(|&i| self.scenes.get(i))
    }

    pub fn contains_scene(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn events_for(&self, chapter: ChapterNumber) -> &[ChapterEvent] {
        self.chapter_events
            .get(&chapter)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn event(&self, chapter: ChapterNumber, id: &str) -> Option<&ChapterEvent> {
        self.events_for(chapter).iter().find(|e| e.id == id)
    }

    /// Scenes that carry a task
    pub fn task_scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter().filter(|s| s.task.is_some())
    }

    /// Task scenes belonging to one chapter
    pub fn chapter_task_scenes(&self, chapter: ChapterNumber) -> impl Iterator<Item = &Scene> {
        self.task_scenes()
            .filter(move |s| s.chapter == Some(chapter))
    }

    /// Structural validation
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.index.len() != self.scenes.len() {
            let mut seen = AHashSet::new();
            for scene in &self.scenes {
                if !seen.insert(scene.id.as_str()) {
                    errors.push(format!("duplicate scene id: {}", scene.id));
                }
            }
        }
        if !self.contains_scene(START_SCENE) {
            errors.push(format!("missing required scene: {}", START_SCENE));
        }

        for scene in &self.scenes {
            if scene.id.is_empty() {
                errors.push("scene with empty id".into());
            }
            if scene.title.trim().is_empty() {
                errors.push(format!("scene {} missing title", scene.id));
            }
            check_unique(
                scene.options.iter().map(|o| o.id.as_str()),
                &format!("scene {} options", scene.id),
                &mut errors,
            );
            for option in &scene.options {
                if let Some(next) = &option.next {
                    if !self.contains_scene(next) {
                        errors.push(format!(
                            "scene {} option {} points at unknown scene {}",
                            scene.id, option.id, next
                        ));
                    }
                }
            }
            if let Some(task) = &scene.task {
                if task.prompt.trim().is_empty() {
                    errors.push(format!("scene {} task prompt missing", scene.id));
                }
                if let Some(next) = &task.on_complete_next {
                    if !self.contains_scene(next) {
                        errors.push(format!(
                            "scene {} task points at unknown scene {}",
                            scene.id, next
                        ));
                    }
                }
                if !task.kind.is_known() {
                    tracing::warn!(
                        "Scene {} uses unrecognized task type {}",
                        scene.id,
                        task.kind
                    );
                }
            }
        }

        check_unique(self.cards.iter().map(|c| c.id.as_str()), "cards", &mut errors);

        for (chapter, events) in &self.chapter_events {
            check_unique(
                events.iter().map(|e| e.id.as_str()),
                &format!("chapter {} events", chapter),
                &mut errors,
            );
            for event in events {
                if event.options.is_empty() {
                    errors.push(format!("chapter {} event {} has no options", chapter, event.id));
                }
                check_unique(
                    event.options.iter().map(|o| o.id.as_str()),
                    &format!("chapter {} event {} options", chapter, event.id),
                    &mut errors,
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SimError::Content(errors.join("; ")))
        }
    }
}

fn check_unique<'a>(ids: impl Iterator<Item = &'a str>, label: &str, errors: &mut Vec<String>) {
    let mut seen = AHashSet::new();
    for id in ids {
        if id.is_empty() {
            errors.push(format!("{}: missing id", label));
        } else if !seen.insert(id) {
            errors.push(format!("{}: duplicate id: {}", label, id));
        }
    }
}
