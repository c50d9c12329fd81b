//! Consumable and unlockable player capabilities

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Powerups {
    /// Charges for skipping a skippable task
    pub skip_task_charges: u32,
    /// Reveals scene insight text once unlocked
    pub insight_lens: bool,
    /// Charges for revealing rubric points during an interview duel
    pub duel_hint_charges: u32,
}

impl Powerups {
    /// Spend one skip charge; false (and no change) when the balance is zero
    pub fn try_spend_skip(&mut self) -> bool {
        if self.skip_task_charges == 0 {
            return false;
        }
        self.skip_task_charges -= 1;
        true
    }

    /// Spend one duel hint charge; false (and no change) when the balance is zero
    pub fn try_spend_hint(&mut self) -> bool {
        if self.duel_hint_charges == 0 {
            return false;
        }
        self.duel_hint_charges -= 1;
        true
    }
}
