//! Text view and transient UI state

pub mod render;
pub mod state;

pub use render::{probe, render_text};
pub use state::{Notice, UiState};
