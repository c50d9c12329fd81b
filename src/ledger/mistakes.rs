//! Bounded, deduplicated mistake log

use crate::core::types::{now_ms, SceneId, Timestamp};
use serde::{Deserialize, Serialize};

/// Default maximum number of retained entries
pub const MAX_MISTAKES: usize = 60;

/// Which kind of decision produced the mistake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MistakeKind {
    Choice,
    Event,
    Task,
    Duel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeEntry {
    pub kind: MistakeKind,
    pub scene_id: SceneId,
    /// Option, event, task or question id within the scene
    pub ref_id: String,
    pub reason: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default = "one")]
    pub count: u32,
    #[serde(default)]
    pub first_at: Timestamp,
    #[serde(default)]
    pub last_at: Timestamp,
}

fn one() -> u32 {
    1
}

impl MistakeEntry {
    pub fn new(
        kind: MistakeKind,
        scene_id: impl Into<SceneId>,
        ref_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let now = now_ms();
        Self {
            kind,
            scene_id: scene_id.into(),
            ref_id: ref_id.into(),
            reason: reason.into(),
            score: 0.0,
            count: 1,
            first_at: now,
            last_at: now,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    fn same_key(&self, other: &MistakeEntry) -> bool {
        self.kind == other.kind && self.scene_id == other.scene_id && self.ref_id == other.ref_id
    }
}

/// Most-recent-first mistake list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MistakeLedger(Vec<MistakeEntry>);

impl MistakeLedger {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MistakeEntry> {
        self.0.iter()
    }

    pub fn entries(&self) -> &[MistakeEntry] {
        &self.0
    }

    /// Record a mistake
    ///
    /// A repeat of an existing `(kind, scene_id, ref_id)` key moves that
    /// entry to the front with its count bumped and reason refreshed.
    /// New keys are prepended. The tail is trimmed to `capacity`.
    pub fn push(&mut self, entry: MistakeEntry, capacity: usize) -> &MistakeEntry {
        let merged = match self.0.iter().position(|e| e.same_key(&entry)) {
            Some(idx) => {
                let mut existing = self.0.remove(idx);
                existing.count += 1;
                existing.last_at = entry.last_at;
                existing.reason = entry.reason;
                existing.score = entry.score;
                existing
            }
            None => entry,
        };
        self.0.insert(0, merged);
        self.truncate(capacity);
        &self.0[0]
    }

    pub fn truncate(&mut self, capacity: usize) {
        self.0.truncate(capacity.max(1));
    }

    /// Distinct scene ids in list order, keeping only those `exists` accepts
    pub fn replay_scenes(&self, exists: impl Fn(&str) -> bool) -> Vec<SceneId> {
        let mut seen = ahash::AHashSet::new();
        self.0
            .iter()
            .filter(|e| exists(&e.scene_id))
            .filter(|e| seen.insert(e.scene_id.as_str()))
            .map(|e| e.scene_id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(scene: &str, reference: &str) -> MistakeEntry {
        MistakeEntry::new(MistakeKind::Choice, scene, reference, "risky call")
    }

    #[test]
    fn test_duplicate_key_increments_count() {
        let mut ledger = MistakeLedger::default();
        ledger.push(entry("c1_s1", "opt_a"), MAX_MISTAKES);
        ledger.push(entry("c1_s1", "opt_a"), MAX_MISTAKES);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].count, 2);
    }

    #[test]
    fn test_kind_is_part_of_key() {
        let mut ledger = MistakeLedger::default();
        ledger.push(entry("s", "x"), MAX_MISTAKES);
        ledger.push(MistakeEntry::new(MistakeKind::Event, "s", "x", "r"), MAX_MISTAKES);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_repeat_moves_to_front_and_refreshes_reason() {
        let mut ledger = MistakeLedger::default();
        ledger.push(entry("a", "1"), MAX_MISTAKES);
        ledger.push(entry("b", "1"), MAX_MISTAKES);
        let mut again = entry("a", "1");
        again.reason = "still risky".into();
        ledger.push(again, MAX_MISTAKES);
        assert_eq!(ledger.entries()[0].scene_id, "a");
        assert_eq!(ledger.entries()[0].reason, "still risky");
        assert_eq!(ledger.entries()[1].scene_id, "b");
    }

    #[test]
    fn test_capacity_trims_oldest() {
        let mut ledger = MistakeLedger::default();
        for i in 0..75 {
            ledger.push(entry(&format!("s{}", i), "o"), MAX_MISTAKES);
        }
        assert_eq!(ledger.len(), MAX_MISTAKES);
        assert_eq!(ledger.entries()[0].scene_id, "s74");
        assert_eq!(ledger.entries()[MAX_MISTAKES - 1].scene_id, "s15");
    }

    #[test]
    fn test_replay_scenes_dedup_and_filter() {
        let mut ledger = MistakeLedger::default();
        ledger.push(entry("old_scene", "o"), MAX_MISTAKES);
        ledger.push(entry("c1", "o1"), MAX_MISTAKES);
        ledger.push(entry("c2", "o"), MAX_MISTAKES);
        ledger.push(entry("c1", "o2"), MAX_MISTAKES);
        let scenes = ledger.replay_scenes(|id| id != "old_scene");
        assert_eq!(scenes, vec!["c1".to_string(), "c2".to_string()]);
    }

    #[test]
    fn test_missing_count_defaults_to_one() {
        let json = r#"[{"kind":"duel","sceneId":"s","refId":"q1","reason":"weak"}]"#;
        let ledger: MistakeLedger = serde_json::from_str(json).unwrap();
        assert_eq!(ledger.entries()[0].count, 1);
    }
}
