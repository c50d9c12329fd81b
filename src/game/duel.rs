//! Interview duel: five rounds of question, answer and score
//!
//! Questions and scores come from the AI proxy when its health check passed,
//! otherwise from a fixed local bank scored by keyword overlap.

use super::{ActionReport, Game};
use crate::core::error::{Result, SimError};
use crate::ledger::{MistakeEntry, MistakeKind};
use crate::llm::parser::{parse_duel_question, parse_duel_score};
use crate::llm::{AiAction, AiContext, AiRequest, AiResult};
use crate::metrics::Delta;
use crate::progression::AchievementId;
use crate::state::{
    DuelFeedback, DuelPhase, DuelQuestion, DuelSource, DuelState, DuelSummary, DuelTurn,
    HistoryKind,
};
use crate::ui::state::Notice;
use serde_json::json;

/// Id, prompt, keywords, rubric
type BankEntry = (&'static str, &'static str, &'static [&'static str], &'static [&'static str]);

const LOCAL_BANK: &[BankEntry] = &[
    (
        "north_star",
        "How would you choose a north-star metric for an AI identification feature?",
        &["user value", "accuracy", "retention", "guardrail", "leading"],
        &[
            "Tie the metric to the value users actually get",
            "Pair it with guardrails such as error rate or latency",
            "Name leading indicators the team can move weekly",
        ],
    ),
    (
        "low_confidence",
        "The model is unsure about 15% of inputs. What does the product do?",
        &["fallback", "threshold", "human", "feedback", "trust"],
        &[
            "Set a confidence threshold with an explicit fallback path",
            "Route hard cases to a human or ask the user for more input",
            "Collect feedback on those cases to improve the model",
        ],
    ),
    (
        "ab_design",
        "Walk me through designing an A/B test for a new result page.",
        &["hypothesis", "sample size", "primary metric", "guardrail", "duration"],
        &[
            "State a falsifiable hypothesis and one primary metric",
            "Size the sample and fix the duration before launch",
            "Watch guardrails and check for sample ratio mismatch",
        ],
    ),
    (
        "cost_tradeoff",
        "Inference cost doubled after launch. How do you respond?",
        &["cache", "smaller model", "cost per", "quality", "prioritize"],
        &[
            "Measure cost per successful outcome, not per call",
            "Try caching and smaller models on the easy traffic",
            "Agree on the quality floor before cutting spend",
        ],
    ),
    (
        "stakeholder",
        "Sales wants a feature next week; engineering says it needs a month. What now?",
        &["scope", "mvp", "risk", "timeline", "align"],
        &[
            "Clarify the underlying goal behind the request",
            "Propose a scoped MVP that fits the date",
            "Make risks and the follow-up timeline explicit to both sides",
        ],
    ),
];

/// The fixed local question bank
pub fn local_question_bank() -> Vec<DuelQuestion> {
    LOCAL_BANK
        .iter()
        .map(|(id, prompt, keywords, rubric)| DuelQuestion {
            id: (*id).to_string(),
            prompt: (*prompt).to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            rubric: rubric.iter().map(|r| r.to_string()).collect(),
            source: DuelSource::Local,
        })
        .collect()
}

fn local_question(round: u32) -> Option<DuelQuestion> {
    let bank = local_question_bank();
    let idx = round as usize % bank.len().max(1);
    bank.into_iter().nth(idx)
}

/// Keyword-overlap score: `round(5 * matched / total)` clamped to 1..=5
pub fn score_locally(question: &DuelQuestion, answer: &str) -> DuelFeedback {
    let answer = answer.to_lowercase();
    let (matched, missed): (Vec<String>, Vec<String>) = question
        .keywords
        .iter()
        .cloned()
        .partition(|k| answer.contains(&k.to_lowercase()));
    let total = question.keywords.len();
    let score = if total == 0 {
        3
    } else {
        ((5.0 * matched.len() as f64 / total as f64).round() as u8).clamp(1, 5)
    };
    let comment = match score {
        5 => "Complete answer covering every key point.",
        4 => "Strong answer; one point could go deeper.",
        3 => "Solid start; cover the missing points next time.",
        _ => "Thin answer; structure it around goal, metric and risk.",
    };
    DuelFeedback {
        score,
        comment: comment.to_string(),
        matched,
        missed,
        source: DuelSource::Local,
    }
}

impl Game {
    /// Reset the duel and open round one
    pub fn start_duel(&mut self) {
        self.state.duel = DuelState {
            active: true,
            ..DuelState::default()
        };
        tracing::info!("Interview duel started");
        self.commit();
    }

    fn duel_guard(&self, allowed: &[DuelPhase]) -> Result<()> {
        let duel = &self.state.duel;
        if !duel.active {
            return Err(SimError::DuelState("no duel running".into()));
        }
        if !allowed.contains(&duel.phase) {
            return Err(SimError::DuelState(format!(
                "not allowed while {:?}",
                duel.phase
            )));
        }
        Ok(())
    }

    /// Ask for the next question
    ///
    /// Returns the proxy request when the AI is available; otherwise the
    /// local question is shown immediately and `None` is returned.
    pub fn begin_duel_question(&mut self) -> Result<Option<AiRequest>> {
        self.duel_guard(&[DuelPhase::NoQuestion, DuelPhase::Answered])?;
        if self.state.duel.round >= self.config.duel_rounds {
            return Err(SimError::DuelState("all rounds played".into()));
        }
        if !self.ai_available() {
            self.show_local_question();
            return Ok(None);
        }
        self.begin_ai(AiAction::DuelQuestion)?;
        let asked: Vec<&str> = self
            .state
            .duel
            .transcript
            .iter()
            .map(|t| t.question.as_str())
            .collect();
        let payload = AiContext::from_state(&self.state, self.current_scene()).into_payload(json!({
            "round": self.state.duel.round + 1,
            "rounds": self.config.duel_rounds,
            "asked": asked,
        }));
        Ok(Some(AiRequest {
            action: AiAction::DuelQuestion,
            payload,
        }))
    }

    /// Fold in the proxy's question, or fall back to the local bank
    pub fn apply_duel_question(&mut self, result: Option<AiResult>) {
        self.end_ai(AiAction::DuelQuestion);
        if self
            .duel_guard(&[DuelPhase::NoQuestion, DuelPhase::Answered])
            .is_err()
        {
            tracing::debug!("Dropping stale duel question");
            return;
        }
        let round = self.state.duel.round + 1;
        match result.as_ref().and_then(|r| parse_duel_question(r, round)) {
            Some(question) => self.show_question(question),
            None => {
                tracing::warn!("AI duel question unusable, using local bank");
                self.state.ui.notify(&Notice::AiFallback);
                self.show_local_question();
            }
        }
    }

    fn show_local_question(&mut self) {
        match local_question(self.state.duel.round) {
            Some(question) => self.show_question(question),
            None => tracing::warn!("Local question bank is empty"),
        }
    }

    fn show_question(&mut self, question: DuelQuestion) {
        let duel = &mut self.state.duel;
        duel.round += 1;
        duel.question = Some(question);
        duel.feedback = None;
        duel.hints.clear();
        duel.phase = DuelPhase::QuestionShown;
        self.commit();
    }

    /// Spend a hint charge to reveal rubric points for the current question
    pub fn use_duel_hint(&mut self) -> Result<Vec<String>> {
        self.duel_guard(&[DuelPhase::QuestionShown])?;
        if !self.state.duel.hints.is_empty() {
            return Ok(self.state.duel.hints.clone());
        }
        if !self.state.powerups.try_spend_hint() {
            return Err(SimError::NoHintCharges);
        }
        let limit = self.config.duel_hint_points;
        let hints: Vec<String> = match &self.state.duel.question {
            Some(q) if !q.rubric.is_empty() => q.rubric.iter().take(limit).cloned().collect(),
            Some(q) => q.keywords.iter().take(limit).cloned().collect(),
            None => Vec::new(),
        };
        self.state.duel.hints = hints.clone();
        self.commit();
        Ok(hints)
    }

    /// Submit an answer
    ///
    /// Returns the scoring request when the AI is available; otherwise the
    /// answer is scored locally and recorded immediately.
    pub fn begin_duel_answer(&mut self, answer: &str) -> Result<Option<AiRequest>> {
        self.duel_guard(&[DuelPhase::QuestionShown])?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SimError::Validation("answer is empty".into()));
        }
        let Some(question) = self.state.duel.question.clone() else {
            return Err(SimError::DuelState("no question shown".into()));
        };
        if !self.ai_available() {
            let feedback = score_locally(&question, answer);
            self.record_answer(question, answer, feedback);
            return Ok(None);
        }
        self.begin_ai(AiAction::DuelScore)?;
        let payload = AiContext::from_state(&self.state, self.current_scene()).into_payload(json!({
            "question": question.prompt,
            "rubric": question.rubric,
            "answer": answer,
        }));
        Ok(Some(AiRequest {
            action: AiAction::DuelScore,
            payload,
        }))
    }

    /// Fold in the proxy's score, or fall back to keyword scoring
    pub fn apply_duel_answer(
        &mut self,
        answer: &str,
        result: Option<AiResult>,
    ) -> Result<ActionReport> {
        self.end_ai(AiAction::DuelScore);
        self.duel_guard(&[DuelPhase::QuestionShown])?;
        let Some(question) = self.state.duel.question.clone() else {
            return Err(SimError::DuelState("no question shown".into()));
        };
        let feedback = match result.as_ref().and_then(parse_duel_score) {
            Some(feedback) => feedback,
            None => {
                tracing::warn!("AI duel score unusable, scoring locally");
                self.state.ui.notify(&Notice::AiFallback);
                score_locally(&question, answer)
            }
        };
        Ok(self.record_answer(question, answer.trim(), feedback))
    }

    fn record_answer(
        &mut self,
        question: DuelQuestion,
        answer: &str,
        feedback: DuelFeedback,
    ) -> ActionReport {
        let mut report = ActionReport::default();
        let round = self.state.duel.round;
        let score = feedback.score;

        self.state.duel.transcript.push(DuelTurn {
            round,
            question_id: question.id.clone(),
            question: question.prompt.clone(),
            answer: answer.to_string(),
            score,
            comment: feedback.comment.clone(),
        });
        self.state.duel.score_total += u32::from(score);
        self.state.duel.feedback = Some(feedback);
        self.state.duel.phase = DuelPhase::Answered;

        self.award_xp(self.config.xp.duel_round, &mut report);
        self.record(
            HistoryKind::Duel,
            Some(question.id.clone()),
            Delta::new(),
            format!("Round {}: {}/5", round, score),
        );
        if score <= self.config.duel_mistake_max_score {
            self.log_mistake(MistakeEntry::new(
                MistakeKind::Duel,
                self.state.scene_id.clone(),
                question.id,
                format!("Interview answer scored {}/5", score),
            ));
            report.mistake = true;
        }
        tracing::debug!("Duel round {} scored {}", round, score);

        if round >= self.config.duel_rounds {
            self.conclude_duel(&mut report);
        }
        self.finish_action(&report);
        report
    }

    /// End the duel early (or again after the last round) and summarize
    pub fn finish_duel(&mut self) -> Result<ActionReport> {
        if !self.state.duel.active {
            return Err(SimError::DuelState("no duel running".into()));
        }
        let mut report = ActionReport::default();
        self.conclude_duel(&mut report);
        self.finish_action(&report);
        Ok(report)
    }

    fn conclude_duel(&mut self, report: &mut ActionReport) {
        let duel = &mut self.state.duel;
        let rounds = duel.transcript.len();
        let average = duel.average();
        let verdict = if rounds == 0 {
            "No answers recorded."
        } else if average >= 4.0 {
            "Interview-ready: structured, metric-driven answers."
        } else if average >= 3.0 {
            "Promising; tighten the metrics and risk sections."
        } else {
            "Keep practicing: lead with the goal, then metric, then risk."
        };
        duel.summary = Some(DuelSummary {
            average,
            text: format!(
                "Average {:.1}/5 over {} rounds. {}",
                average, rounds, verdict
            ),
        });
        duel.phase = DuelPhase::Finished;
        duel.active = false;
        duel.question = None;
        tracing::info!("Duel finished with average {:.2}", average);

        if rounds > 0 && average >= self.config.duel_ace_average {
            self.unlock_due(&[AchievementId::DuelAce], report);
        }
    }
}
