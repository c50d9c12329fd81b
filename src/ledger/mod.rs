//! Mistake tracking and replay
//!
//! Decisions whose weighted metric impact falls below a small negative
//! threshold are logged here so the player can revisit those scenes later.

pub mod mistakes;
pub mod replay;
pub mod scoring;

pub use mistakes::{MistakeEntry, MistakeKind, MistakeLedger};
pub use replay::{ReplayState, ReplayStep};
pub use scoring::DecisionScorer;
