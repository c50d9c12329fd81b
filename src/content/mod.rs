//! Scenario content: scenes, options, tasks, cards and chapter events

pub mod loader;
pub mod schema;

pub use loader::{Catalog, START_SCENE};
pub use schema::{
    Card, ChapterEvent, RoleplayLine, RoleplaySpec, Scene, SceneOption, TaskKind, TaskSpec,
};
