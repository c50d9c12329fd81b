//! Experience, levels, achievements and power-ups

pub mod achievements;
pub mod levels;
pub mod powerups;

pub use achievements::{
    apply_achievement_rewards, AchievementId, AchievementUnlock, Achievements, Reward,
    REWARD_TABLE,
};
pub use levels::{LevelTable, LevelTier, XpGrant};
pub use powerups::Powerups;
