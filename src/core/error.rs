use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    #[error("Option {option} not found in scene {scene}")]
    OptionNotFound { scene: String, option: String },

    #[error("Scene {0} has no task")]
    NoTask(String),

    #[error("Cannot skip task: {0}")]
    SkipUnavailable(SkipDenied),

    #[error("No hint charges left")]
    NoHintCharges,

    #[error("No open chapter event for the current scene")]
    NoActiveEvent,

    #[error("Duel error: {0}")]
    DuelState(String),

    #[error("Request already in flight: {0}")]
    Busy(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Content error: {0}")]
    Content(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("AI error: {0}")]
    Ai(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Why a skip request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipDenied {
    NoTask,
    NotSkippable,
    AlreadyCompleted,
    NoCharges,
}

impl std::fmt::Display for SkipDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::NoTask => "scene has no task",
            Self::NotSkippable => "task type cannot be skipped",
            Self::AlreadyCompleted => "task already completed",
            Self::NoCharges => "no skip charges left",
        };
        f.write_str(text)
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
