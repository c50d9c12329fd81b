//! Game configuration with documented constants
//!
//! Every tunable number of the progression and review loops lives here.
//! A TOML file may override any subset; missing keys keep their defaults.

use crate::content::schema::TaskKind;
use crate::core::error::{Result, SimError};
use crate::ledger::scoring::DecisionScorer;
use crate::metrics::{Delta, MetricKey};
use crate::progression::levels::LevelTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// XP granted per kind of action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpAwards {
    /// Regular scene option
    pub choice: u32,
    /// Completed task, unless the widget supplies its own award
    pub task: u32,
    /// Task bypassed with a skip charge
    pub skipped_task: u32,
    /// Resolved chapter event
    pub event: u32,
    /// Each answered interview-duel round
    pub duel_round: u32,
}

impl Default for XpAwards {
    fn default() -> Self {
        Self {
            choice: 10,
            task: 35,
            skipped_task: 15,
            event: 15,
            duel_round: 5,
        }
    }
}

/// Where the AI proxy lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Base URL serving `/api/ai` and `/api/health`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8787".into(),
            timeout_secs: 20,
        }
    }
}

/// Configuration for the game core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === SAVE ===
    /// Version stamped into save blobs
    pub app_version: String,

    /// Slot key the save blob is stored under
    pub save_key: String,

    // === PROGRESSION ===
    pub xp: XpAwards,

    /// Ascending level ladder; the first tier must start at 0
    pub levels: LevelTable,

    // === REVIEW LOOPS ===
    /// Maximum retained mistake entries (oldest dropped first)
    pub mistake_capacity: usize,

    /// Maximum undo snapshots (oldest dropped first)
    pub nav_capacity: usize,

    /// Weights and threshold for classifying a decision as wrong
    pub scorer: DecisionScorer,

    // === METRICS ===
    /// Clamp stored metric values to [-metric_bound, metric_bound] on write
    ///
    /// When false, values accumulate unbounded and only the display
    /// percentage is clamped.
    pub clamp_metrics_on_write: bool,

    /// Nominal half-range of the metric display
    pub metric_bound: f64,

    // === TASKS ===
    /// Task kinds that may be bypassed with a skip charge
    pub skippable_tasks: Vec<TaskKind>,

    /// Delta applied when a task is skipped
    pub skip_delta: Delta,

    // === INTERVIEW DUEL ===
    /// Rounds per duel
    pub duel_rounds: u32,

    /// Rubric points revealed by one hint
    pub duel_hint_points: usize,

    /// Answers scoring at or below this are recorded as mistakes
    pub duel_mistake_max_score: u8,

    /// Average score needed for the duel achievement
    pub duel_ace_average: f64,

    // === ROLEPLAY ===
    /// Messages of thread history sent with each roleplay request
    pub roleplay_context_messages: usize,

    // === RANDOMNESS ===
    /// Fixed seed for chapter-event draws; entropy when unset
    pub seed: Option<u64>,

    // === AI ===
    pub ai: AiSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            app_version: env!("CARGO_PKG_VERSION").into(),
            save_key: "ai_pm_sim_save_v1".into(),

            xp: XpAwards::default(),
            levels: LevelTable::default(),

            mistake_capacity: 60,
            nav_capacity: 50,
            scorer: DecisionScorer::default(),

            clamp_metrics_on_write: true,
            metric_bound: 2.0,

            skippable_tasks: vec![
                TaskKind::CompetitorMatrix,
                TaskKind::FunnelTracking,
                TaskKind::ExperienceFlow,
                TaskKind::MilestonePlan,
                TaskKind::AbBrief,
                TaskKind::AbInstrumentation,
            ],
            skip_delta: Delta::new()
                .with(MetricKey::Efficiency, 0.01)
                .with(MetricKey::Accuracy, -0.01),

            duel_rounds: 5,
            duel_hint_points: 3,
            duel_mistake_max_score: 2,
            duel_ace_average: 4.0,

            roleplay_context_messages: 6,

            seed: None,

            ai: AiSettings::default(),
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig =
            toml::from_str(content).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate().map_err(SimError::Config)?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Bound to clamp metric writes to, if clamping is enabled
    pub fn write_bound(&self) -> Option<f64> {
        self.clamp_metrics_on_write.then_some(self.metric_bound)
    }

    pub fn is_skippable(&self, kind: &TaskKind) -> bool {
        self.skippable_tasks.contains(kind)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.levels.validate()?;

        if self.mistake_capacity == 0 || self.nav_capacity == 0 {
            return Err("mistake_capacity and nav_capacity must be positive".into());
        }

        if self.metric_bound <= 0.0 {
            return Err(format!(
                "metric_bound ({}) must be positive",
                self.metric_bound
            ));
        }

        if self.scorer.wrong_threshold > 0.0 {
            return Err(format!(
                "scorer.wrong_threshold ({}) must not be positive, or neutral decisions count as mistakes",
                self.scorer.wrong_threshold
            ));
        }

        if self.duel_rounds == 0 {
            return Err("duel_rounds must be positive".into());
        }

        if !(1..=5).contains(&self.duel_mistake_max_score) {
            return Err(format!(
                "duel_mistake_max_score ({}) must be within 1..=5",
                self.duel_mistake_max_score
            ));
        }

        Ok(())
    }
}
