//! Achievement catalog, unlock bookkeeping and the reward policy
//!
//! Achievement ids form a closed set. Ids coming from older saves or
//! drifting content that do not parse are ignored with a debug log.

use crate::core::types::{now_ms, Timestamp};
use crate::progression::powerups::Powerups;
use serde::{Deserialize, Serialize};

/// Known achievements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementId {
    /// Completed (or skipped) any task
    FirstTask,
    /// Every task scene of chapter N completed
    ChapterClear(u8),
    /// Three experiment-family tasks completed
    ExperimentOwner,
    /// Every task scene in the catalog completed
    AllTasks,
    /// First chapter event resolved
    FirstEvent,
    /// Finished an interview duel with a high average
    DuelAce,
    /// Walked a mistake replay to the end
    ReplayComplete,
}

impl AchievementId {
    /// Highest chapter with a clear achievement
    pub const MAX_CHAPTER: u8 = 4;

    pub fn all() -> Vec<AchievementId> {
        let mut ids = vec![Self::FirstTask];
        ids.extend((1..=Self::MAX_CHAPTER).map(Self::ChapterClear));
        ids.extend([
            Self::ExperimentOwner,
            Self::AllTasks,
            Self::FirstEvent,
            Self::DuelAce,
            Self::ReplayComplete,
        ]);
        ids
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first_task" => Some(Self::FirstTask),
            "experiment_owner" => Some(Self::ExperimentOwner),
            "all_tasks" => Some(Self::AllTasks),
            "first_event" => Some(Self::FirstEvent),
            "duel_ace" => Some(Self::DuelAce),
            "replay_complete" => Some(Self::ReplayComplete),
            other => {
                let n: u8 = other.strip_prefix("chapter_clear_")?.parse().ok()?;
                (1..=Self::MAX_CHAPTER)
                    .contains(&n)
                    .then_some(Self::ChapterClear(n))
            }
        }
    }

    /// Chapter-clear achievement for a chapter number, if one exists
    pub fn chapter_clear(chapter: u32) -> Option<Self> {
        u8::try_from(chapter)
            .ok()
            .filter(|n| (1..=Self::MAX_CHAPTER).contains(n))
            .map(Self::ChapterClear)
    }

    pub fn title(&self) -> String {
        match self {
            Self::FirstTask => "First Deliverable".into(),
            Self::ChapterClear(n) => format!("Chapter {} Cleared", n),
            Self::ExperimentOwner => "Experiment Owner".into(),
            Self::AllTasks => "Full Cycle".into(),
            Self::FirstEvent => "Curveball Handled".into(),
            Self::DuelAce => "Interview Ace".into(),
            Self::ReplayComplete => "Lessons Learned".into(),
        }
    }
}

impl std::fmt::Display for AchievementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstTask => f.write_str("first_task"),
            Self::ChapterClear(n) => write!(f, "chapter_clear_{}", n),
            Self::ExperimentOwner => f.write_str("experiment_owner"),
            Self::AllTasks => f.write_str("all_tasks"),
            Self::FirstEvent => f.write_str("first_event"),
            Self::DuelAce => f.write_str("duel_ace"),
            Self::ReplayComplete => f.write_str("replay_complete"),
        }
    }
}

/// Effect granted when an achievement unlocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reward {
    SkipCharges(u32),
    DuelHints(u32),
    InsightLens,
}

impl Reward {
    fn apply(&self, powerups: &mut Powerups) -> String {
        match *self {
            Self::SkipCharges(n) => {
                powerups.skip_task_charges += n;
                format!("+{} task skip charge(s)", n)
            }
            Self::DuelHints(n) => {
                powerups.duel_hint_charges += n;
                format!("+{} interview hint charge(s)", n)
            }
            Self::InsightLens => {
                powerups.insight_lens = true;
                "Insight lens unlocked".into()
            }
        }
    }
}

/// Fixed reward policy. Achievements absent from the table grant nothing.
pub const REWARD_TABLE: &[(AchievementId, Reward)] = &[
    (AchievementId::FirstTask, Reward::SkipCharges(1)),
    (AchievementId::ChapterClear(1), Reward::InsightLens),
    (AchievementId::ChapterClear(2), Reward::DuelHints(1)),
    (AchievementId::ChapterClear(3), Reward::SkipCharges(1)),
    (AchievementId::ChapterClear(4), Reward::DuelHints(1)),
    (AchievementId::ExperimentOwner, Reward::DuelHints(2)),
    (AchievementId::AllTasks, Reward::SkipCharges(1)),
    (AchievementId::ReplayComplete, Reward::DuelHints(1)),
];

pub fn rewards_for(id: AchievementId) -> impl Iterator<Item = &'static Reward> {
    REWARD_TABLE
        .iter()
        .filter(move |(aid, _)| *aid == id)
        .map(|(_, reward)| reward)
}

/// Record of one unlocked achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementUnlock {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub unlocked_at: Timestamp,
}

/// Unlocked achievements in unlock order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Achievements(Vec<AchievementUnlock>);

impl Achievements {
    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|a| a.id == id)
    }

    pub fn has(&self, id: AchievementId) -> bool {
        self.contains(&id.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AchievementUnlock> {
        self.0.iter()
    }

    /// Unlock by id string
    ///
    /// Returns the new record, or `None` when the id is unknown or
    /// already unlocked.
    pub fn unlock(&mut self, id: &str) -> Option<AchievementUnlock> {
        let Some(known) = AchievementId::parse(id) else {
            tracing::debug!("Ignoring unknown achievement id {:?}", id);
            return None;
        };
        self.unlock_id(known)
    }

    pub fn unlock_id(&mut self, id: AchievementId) -> Option<AchievementUnlock> {
        let key = id.to_string();
        if self.contains(&key) {
            return None;
        }
        let record = AchievementUnlock {
            id: key,
            title: id.title(),
            unlocked_at: now_ms(),
        };
        tracing::info!("Achievement unlocked: {}", record.title);
        self.0.push(record.clone());
        Some(record)
    }

    /// Drop duplicate ids (first occurrence wins); used after loading saves
    pub fn dedup(&mut self) {
        let mut seen = ahash::AHashSet::new();
        self.0.retain(|a| seen.insert(a.id.clone()));
    }
}

/// Grant the configured rewards for exactly these unlocks
///
/// Pass only the unlocks produced by the current action; passing the
/// full history would grant rewards again.
pub fn apply_achievement_rewards(
    unlocks: &[AchievementUnlock],
    powerups: &mut Powerups,
) -> Vec<String> {
    unlocks
        .iter()
        .filter_map(|u| AchievementId::parse(&u.id))
        .flat_map(rewards_for)
        .map(|reward| reward.apply(powerups))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_every_known_id() {
        for id in AchievementId::all() {
            assert_eq!(AchievementId::parse(&id.to_string()), Some(id));
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(AchievementId::parse("chapter_clear_9"), None);
        assert_eq!(AchievementId::parse("chapter_clear_x"), None);
        assert_eq!(AchievementId::parse("speedrun"), None);
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let mut a = Achievements::default();
        assert!(a.unlock("first_task").is_some());
        assert!(a.unlock("first_task").is_none());
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_unknown_unlock_is_noop() {
        let mut a = Achievements::default();
        assert!(a.unlock("not_a_thing").is_none());
        assert!(a.is_empty());
    }

    #[test]
    fn test_rewards_granted_once_per_unlock() {
        let mut a = Achievements::default();
        let mut powerups = Powerups::default();
        let first: Vec<_> = a.unlock("first_task").into_iter().collect();
        let second: Vec<_> = a.unlock("first_task").into_iter().collect();
        let r1 = apply_achievement_rewards(&first, &mut powerups);
        let r2 = apply_achievement_rewards(&second, &mut powerups);
        assert_eq!(r1.len(), 1);
        assert!(r2.is_empty());
        assert_eq!(powerups.skip_task_charges, 1);
    }

    #[test]
    fn test_reward_table_ids_are_known() {
        for (id, _) in REWARD_TABLE {
            assert!(AchievementId::all().contains(id));
        }
    }

    #[test]
    fn test_insight_lens_reward() {
        let mut a = Achievements::default();
        let mut powerups = Powerups::default();
        let unlocks: Vec<_> = a.unlock("chapter_clear_1").into_iter().collect();
        let text = apply_achievement_rewards(&unlocks, &mut powerups);
        assert!(powerups.insight_lens);
        assert_eq!(text, vec!["Insight lens unlocked".to_string()]);
    }
}
