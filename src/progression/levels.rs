//! XP to level-tier mapping

use serde::{Deserialize, Serialize};

/// One rung of the level ladder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTier {
    pub min_xp: u32,
    pub title: String,
}

impl LevelTier {
    pub fn new(min_xp: u32, title: impl Into<String>) -> Self {
        Self {
            min_xp,
            title: title.into(),
        }
    }
}

/// Result of a single XP grant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpGrant {
    pub amount: u32,
    pub prev_level: usize,
    pub next_level: usize,
    pub leveled_up: bool,
}

/// Ascending table of level tiers
///
/// The first tier must start at 0 XP so that every XP value resolves
/// to a tier; `validate` enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelTable {
    tiers: Vec<LevelTier>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::new(vec![
            LevelTier::new(0, "Intern"),
            LevelTier::new(55, "Associate PM"),
            LevelTier::new(140, "Product Manager"),
            LevelTier::new(260, "Senior PM"),
            LevelTier::new(420, "Lead PM"),
        ])
    }
}

impl LevelTable {
    pub fn new(tiers: Vec<LevelTier>) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &[LevelTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Check ordering and the zero-based first tier
    pub fn validate(&self) -> Result<(), String> {
        let first = self.tiers.first().ok_or("level table is empty")?;
        if first.min_xp != 0 {
            return Err(format!(
                "first level tier must start at 0 xp (got {})",
                first.min_xp
            ));
        }
        for pair in self.tiers.windows(2) {
            if pair[1].min_xp <= pair[0].min_xp {
                return Err(format!(
                    "level tiers must be strictly ascending ({} then {})",
                    pair[0].min_xp, pair[1].min_xp
                ));
            }
        }
        Ok(())
    }

    /// Index of the highest tier whose threshold is <= xp
    pub fn level_from_xp(&self, xp: u32) -> usize {
        self.tiers
            .iter()
            .rposition(|t| t.min_xp <= xp)
            .unwrap_or(0)
    }

    pub fn title(&self, level: usize) -> &str {
        self.tiers
            .get(level)
            .map(|t| t.title.as_str())
            .unwrap_or("")
    }

    /// Percentage progress toward the next tier (100 at the top tier)
    pub fn progress(&self, xp: u32) -> u8 {
        let level = self.level_from_xp(xp);
        let (Some(cur), Some(next)) = (self.tiers.get(level), self.tiers.get(level + 1)) else {
            return 100;
        };
        let span = (next.min_xp - cur.min_xp) as f64;
        let done = xp.saturating_sub(cur.min_xp) as f64;
        (100.0 * done / span).round().min(100.0) as u8
    }

    /// XP still needed to reach the next tier, `None` at the top
    pub fn xp_to_next(&self, xp: u32) -> Option<u32> {
        let level = self.level_from_xp(xp);
        self.tiers
            .get(level + 1)
            .map(|next| next.min_xp.saturating_sub(xp))
    }

    /// Add `amount` to `xp` and report the tier transition
    pub fn grant(&self, xp: &mut u32, amount: u32) -> XpGrant {
        let prev_level = self.level_from_xp(*xp);
        *xp = xp.saturating_add(amount);
        let next_level = self.level_from_xp(*xp);
        XpGrant {
            amount,
            prev_level,
            next_level,
            leveled_up: next_level > prev_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_xp_is_first_tier() {
        let table = LevelTable::default();
        assert_eq!(table.level_from_xp(0), 0);
        assert_eq!(table.title(0), "Intern");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let table = LevelTable::default();
        assert_eq!(table.level_from_xp(54), 0);
        assert_eq!(table.level_from_xp(55), 1);
        assert_eq!(table.level_from_xp(10_000), table.len() - 1);
    }

    #[test]
    fn test_progress_midway_and_top() {
        let table = LevelTable::default();
        // 55..140 -> 85 wide; 97 is 42 in -> 49.4%
        assert_eq!(table.progress(97), 49);
        assert_eq!(table.progress(0), 0);
        assert_eq!(table.progress(420), 100);
        assert_eq!(table.progress(9_999), 100);
    }

    #[test]
    fn test_grant_crosses_multiple_tiers() {
        let table = LevelTable::default();
        let mut xp = 50;
        let grant = table.grant(&mut xp, 300);
        assert_eq!(xp, 350);
        assert_eq!(grant.prev_level, 0);
        assert_eq!(grant.next_level, 3);
        assert!(grant.leveled_up);
    }

    #[test]
    fn test_grant_without_crossing() {
        let table = LevelTable::default();
        let mut xp = 0;
        let grant = table.grant(&mut xp, 10);
        assert!(!grant.leveled_up);
        assert_eq!(grant.next_level, 0);
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        assert!(LevelTable::default().validate().is_ok());
        assert!(LevelTable::new(vec![]).validate().is_err());
        assert!(LevelTable::new(vec![LevelTier::new(5, "a")]).validate().is_err());
        let unordered = LevelTable::new(vec![
            LevelTier::new(0, "a"),
            LevelTier::new(50, "b"),
            LevelTier::new(50, "c"),
        ]);
        assert!(unordered.validate().is_err());
    }

    #[test]
    fn test_xp_to_next() {
        let table = LevelTable::default();
        assert_eq!(table.xp_to_next(50), Some(5));
        assert_eq!(table.xp_to_next(500), None);
    }
}
