//! Consumable item effects and the inventory boundary types.

use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::core::constants::{LEGACY_FULL_HEALTH_SENTINEL, LEGACY_FULL_SP_SENTINEL};
use crate::loot::{LootRarity, LootType};

/// How much of a pool an item restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Restore {
    Amount(u32),
    Full,
}

impl Default for Restore {
    fn default() -> Self {
        Restore::Amount(0)
    }
}

/// The `{health, sp}` effect of a consumable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEffects {
    #[serde(default)]
    pub health: Restore,
    #[serde(default)]
    pub sp: Restore,
}

impl ItemEffects {
    pub fn new(health: Restore, sp: Restore) -> Self {
        Self { health, sp }
    }

    /// Converts legacy numeric effects, where health >= 5000 or sp >= 1000
    /// meant "fully restore".
    pub fn from_legacy(health: u32, sp: u32) -> Self {
        let health = if health >= LEGACY_FULL_HEALTH_SENTINEL {
            Restore::Full
        } else {
            Restore::Amount(health)
        };
        let sp = if sp >= LEGACY_FULL_SP_SENTINEL {
            Restore::Full
        } else {
            Restore::Amount(sp)
        };
        Self { health, sp }
    }

    /// Applies the effects, capped at the effective maximums.
    /// Returns (hp restored, sp restored).
    pub fn apply(&self, target: &mut Combatant) -> (u32, u32) {
        let hp = match self.health {
            Restore::Amount(n) => target.heal(n),
            Restore::Full => target.heal(target.effective_max_hp()),
        };
        let sp = match self.sp {
            Restore::Amount(n) => target.restore_sp(n),
            Restore::Full => target.restore_sp(target.effective_max_sp()),
        };
        (hp, sp)
    }
}

/// What the inventory lookup returns for an item id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub item_type: LootType,
    pub rarity: LootRarity,
    pub effects: ItemEffects,
}
