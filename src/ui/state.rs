//! Transient UI state
//!
//! Nothing here is persisted or captured by undo snapshots.

use std::fmt;

/// Modal, loading and message flags for the current screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub cards_open: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub toast: Option<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notice, replacing any previous one
    pub fn notify(&mut self, notice: &Notice) {
        self.toast = Some(notice.to_string());
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Drop toast and error once they have been displayed
    pub fn clear_messages(&mut self) {
        self.toast = None;
        self.error = None;
    }

    pub fn toggle_cards(&mut self) {
        self.cards_open = !self.cards_open;
    }
}

/// Player-facing message produced by a reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LevelUp { title: String },
    Achievement { title: String },
    Reward(String),
    MistakeLogged,
    TaskSkipped,
    NothingToUndo,
    Undone,
    ReplayStarted { scenes: usize },
    ReplayEmpty,
    ReplayFinished,
    AiFallback,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::LevelUp { title } => write!(f, "Level up: {}", title),
            Notice::Achievement { title } => write!(f, "Achievement unlocked: {}", title),
            Notice::Reward(text) => write!(f, "Reward: {}", text),
            Notice::MistakeLogged => write!(f, "Logged to the mistake book"),
            Notice::TaskSkipped => write!(f, "Task skipped with a power-up"),
            Notice::NothingToUndo => write!(f, "Nothing to undo"),
            Notice::Undone => write!(f, "Went back one step"),
            Notice::ReplayStarted { scenes } => write!(f, "Replaying {} scenes", scenes),
            Notice::ReplayEmpty => write!(f, "No mistakes to replay"),
            Notice::ReplayFinished => write!(f, "Replay finished"),
            Notice::AiFallback => write!(f, "AI unavailable, using the local fallback"),
        }
    }
}
