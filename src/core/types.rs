//! Core type definitions used throughout the codebase

use std::time::{SystemTime, UNIX_EPOCH};

/// Scene identifier as authored in the content catalog
pub type SceneId = String;

/// Narrative chapter number (1-based, as authored)
pub type ChapterNumber = u32;

/// Wall-clock time in milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Current wall-clock time in epoch milliseconds
pub fn now_ms() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Timestamp)
        .unwrap_or(0)
}
