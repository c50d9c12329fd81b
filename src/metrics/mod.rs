//! Training-feedback metrics
//!
//! Five counters that translate the player's trade-offs into explainable
//! feedback. They are not business telemetry. The nominal display range is
//! [-2.0, +2.0]; whether stored values are clamped is a config decision
//! (`GameConfig::clamp_metrics_on_write`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The five fixed metric keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKey {
    Efficiency,
    Accuracy,
    Ux,
    Cost,
    Risk,
}

impl MetricKey {
    pub const ALL: [MetricKey; 5] = [
        MetricKey::Efficiency,
        MetricKey::Accuracy,
        MetricKey::Ux,
        MetricKey::Cost,
        MetricKey::Risk,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Efficiency => "Efficiency",
            Self::Accuracy => "Accuracy",
            Self::Ux => "UX",
            Self::Cost => "Cost",
            Self::Risk => "Risk",
        }
    }
}

/// Metric values, one per key
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    pub efficiency: f64,
    pub accuracy: f64,
    pub ux: f64,
    pub cost: f64,
    pub risk: f64,
}

impl Metrics {
    pub fn get(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::Efficiency => self.efficiency,
            MetricKey::Accuracy => self.accuracy,
            MetricKey::Ux => self.ux,
            MetricKey::Cost => self.cost,
            MetricKey::Risk => self.risk,
        }
    }

    pub fn get_mut(&mut self, key: MetricKey) -> &mut f64 {
        match key {
            MetricKey::Efficiency => &mut self.efficiency,
            MetricKey::Accuracy => &mut self.accuracy,
            MetricKey::Ux => &mut self.ux,
            MetricKey::Cost => &mut self.cost,
            MetricKey::Risk => &mut self.risk,
        }
    }

    /// Apply a delta in place
    ///
    /// With `bound = Some(b)` every touched value is clamped to [-b, b].
    pub fn apply(&mut self, delta: &Delta, bound: Option<f64>) {
        for (key, change) in delta.iter() {
            let slot = self.get_mut(key);
            let next = *slot + change;
            *slot = match bound {
                Some(b) => next.clamp(-b, b),
                None => next,
            };
        }
    }

    /// Weighted sum of a delta against these values used as weights
    pub fn dot(&self, delta: &Delta) -> f64 {
        delta.iter().map(|(key, change)| self.get(key) * change).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, f64)> + '_ {
        MetricKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

/// Partial, signed adjustment to the metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Delta(BTreeMap<MetricKey, f64>);

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: MetricKey, value: f64) -> Self {
        *self.0.entry(key).or_insert(0.0) += value;
        self
    }

    pub fn add(&mut self, key: MetricKey, value: f64) {
        *self.0.entry(key).or_insert(0.0) += value;
    }

    pub fn get(&self, key: MetricKey) -> f64 {
        self.0.get(&key).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| *v == 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(MetricKey, f64)> for Delta {
    fn from_iter<I: IntoIterator<Item = (MetricKey, f64)>>(iter: I) -> Self {
        let mut delta = Delta::new();
        for (k, v) in iter {
            delta.add(k, v);
        }
        delta
    }
}

/// Map a metric value onto a 0..=100 bar, treating [-bound, bound] as full scale
pub fn display_percent(value: f64, bound: f64) -> u8 {
    let ratio = ((value + bound) / (2.0 * bound)).clamp(0.0, 1.0);
    (ratio * 100.0).round() as u8
}

/// Signed two-decimal rendering, e.g. `+0.12`
pub fn format_value(value: f64) -> String {
    if value > 0.0 {
        format!("+{:.2}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_unclamped_accumulates() {
        let mut m = Metrics::default();
        let d = Delta::new().with(MetricKey::Risk, 1.5);
        m.apply(&d, None);
        m.apply(&d, None);
        assert!((m.risk - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_clamped_stays_in_bound() {
        let mut m = Metrics::default();
        let d = Delta::new().with(MetricKey::Ux, 1.5).with(MetricKey::Cost, -3.0);
        m.apply(&d, Some(2.0));
        m.apply(&d, Some(2.0));
        assert_eq!(m.ux, 2.0);
        assert_eq!(m.cost, -2.0);
        assert_eq!(m.efficiency, 0.0);
    }

    #[test]
    fn test_delta_json_shape() {
        let d: Delta = serde_json::from_str(r#"{"risk": -0.02, "ux": 0.04}"#).unwrap();
        assert_eq!(d.get(MetricKey::Risk), -0.02);
        assert_eq!(d.get(MetricKey::Ux), 0.04);
        assert_eq!(d.get(MetricKey::Cost), 0.0);
    }

    #[test]
    fn test_delta_rejects_unknown_key() {
        let result: Result<Delta, _> = serde_json::from_str(r#"{"speed": 1.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_display_percent() {
        assert_eq!(display_percent(0.0, 2.0), 50);
        assert_eq!(display_percent(-2.0, 2.0), 0);
        assert_eq!(display_percent(5.0, 2.0), 100);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.1234), "+0.12");
        assert_eq!(format_value(-0.5), "-0.50");
        assert_eq!(format_value(0.0), "0.00");
    }
}
