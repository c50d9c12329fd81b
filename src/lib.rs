//! AI PM Sim - game core of an AI product manager internship simulator

pub mod content;
pub mod core;
pub mod game;
pub mod ledger;
pub mod llm;
pub mod metrics;
pub mod progression;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod ui;

pub use crate::core::config::GameConfig;
pub use crate::core::error::{Result, SimError};
pub use crate::game::Game;
