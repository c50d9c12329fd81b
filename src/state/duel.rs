//! Interview-duel sub-state

use serde::{Deserialize, Serialize};

/// Per-round position of the duel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelPhase {
    #[default]
    NoQuestion,
    QuestionShown,
    Answered,
    Finished,
}

/// Where a question or score came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuelSource {
    #[default]
    Local,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuelQuestion {
    pub id: String,
    pub prompt: String,
    /// Terms a strong answer mentions; used by the local scorer
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Points a strong answer covers; revealed by hints
    #[serde(default)]
    pub rubric: Vec<String>,
    #[serde(default)]
    pub source: DuelSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuelFeedback {
    /// 1..=5
    pub score: u8,
    pub comment: String,
    #[serde(default)]
    pub matched: Vec<String>,
    #[serde(default)]
    pub missed: Vec<String>,
    #[serde(default)]
    pub source: DuelSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuelTurn {
    pub round: u32,
    pub question_id: String,
    pub question: String,
    pub answer: String,
    pub score: u8,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuelSummary {
    pub average: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DuelState {
    pub active: bool,
    /// Questions shown so far (1-based once the first question appears)
    pub round: u32,
    pub score_total: u32,
    pub phase: DuelPhase,
    pub question: Option<DuelQuestion>,
    pub feedback: Option<DuelFeedback>,
    /// Rubric points revealed for the current question
    pub hints: Vec<String>,
    pub transcript: Vec<DuelTurn>,
    pub summary: Option<DuelSummary>,
}

impl DuelState {
    /// Average score over answered rounds
    pub fn average(&self) -> f64 {
        if self.transcript.is_empty() {
            return 0.0;
        }
        self.score_total as f64 / self.transcript.len() as f64
    }

    /// Repair combinations an older save could contain
    pub fn normalize(&mut self) {
        if self.phase == DuelPhase::QuestionShown && self.question.is_none() {
            self.phase = DuelPhase::NoQuestion;
        }
        if self.phase == DuelPhase::Answered && self.feedback.is_none() {
            self.phase = DuelPhase::NoQuestion;
        }
        let recomputed: u32 = self.transcript.iter().map(|t| t.score as u32).sum();
        if recomputed != self.score_total {
            self.score_total = recomputed;
        }
    }
}
