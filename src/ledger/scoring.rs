//! Decision quality heuristic

use crate::metrics::{Delta, Metrics};
use serde::{Deserialize, Serialize};

/// Weights applied to a decision delta. Cost and risk count against it.
pub const DEFAULT_DECISION_WEIGHTS: Metrics = Metrics {
    efficiency: 1.0,
    accuracy: 1.1,
    ux: 0.9,
    cost: -1.0,
    risk: -1.2,
};

/// Scores strictly below this are "wrong". Neutral decisions score 0.
pub const DEFAULT_WRONG_THRESHOLD: f64 = -0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionScorer {
    pub weights: Metrics,
    pub wrong_threshold: f64,
}

impl Default for DecisionScorer {
    fn default() -> Self {
        Self {
            weights: DEFAULT_DECISION_WEIGHTS,
            wrong_threshold: DEFAULT_WRONG_THRESHOLD,
        }
    }
}

impl DecisionScorer {
    pub fn score(&self, delta: &Delta) -> f64 {
        self.weights.dot(delta)
    }

    pub fn is_wrong(&self, delta: &Delta) -> bool {
        self.score(delta) < self.wrong_threshold
    }

    /// The score when the decision is wrong, `None` otherwise
    pub fn judge(&self, delta: &Delta) -> Option<f64> {
        let score = self.score(delta);
        (score < self.wrong_threshold).then_some(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricKey;

    #[test]
    fn test_lower_risk_is_not_wrong() {
        let scorer = DecisionScorer::default();
        let delta = Delta::new().with(MetricKey::Risk, -0.02);
        assert!((scorer.score(&delta) - 0.024).abs() < 1e-9);
        assert!(!scorer.is_wrong(&delta));
    }

    #[test]
    fn test_higher_risk_is_wrong() {
        let scorer = DecisionScorer::default();
        let delta = Delta::new().with(MetricKey::Risk, 0.02);
        assert!((scorer.score(&delta) + 0.024).abs() < 1e-9);
        assert!(scorer.is_wrong(&delta));
    }

    #[test]
    fn test_neutral_and_tiny_negative_not_wrong() {
        let scorer = DecisionScorer::default();
        assert!(!scorer.is_wrong(&Delta::new()));
        let tiny = Delta::new().with(MetricKey::Cost, 0.01);
        assert!(!scorer.is_wrong(&tiny));
    }

    #[test]
    fn test_mixed_delta() {
        let scorer = DecisionScorer::default();
        let delta = Delta::new()
            .with(MetricKey::Efficiency, 0.05)
            .with(MetricKey::Risk, 0.06);
        // 0.05 - 0.072 = -0.022
        assert_eq!(scorer.judge(&delta).map(|s| (s * 1000.0).round()), Some(-22.0));
    }
}
