//! Game state, undo snapshots and the save format

pub mod duel;
pub mod game_state;
pub mod save;
pub mod snapshot;

pub use duel::{DuelFeedback, DuelPhase, DuelQuestion, DuelSource, DuelState, DuelSummary, DuelTurn};
pub use game_state::{
    ChapterEventState, ContentMode, Flags, GameState, HistoryEntry, HistoryKind, RoleplayMessage,
    TaskStatus,
};
pub use save::{LoadFailure, SaveBlob};
pub use snapshot::{NavStack, StateSnapshot, SNAPSHOT_VERSION};
