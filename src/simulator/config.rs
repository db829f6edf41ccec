//! Simulation configuration.

use crate::battle::{ItemEffects, Restore};
use crate::combatant::{Combatant, StatBlock};
use crate::core::config::BattleConfig;
use crate::encounter::{Biome, DifficultyTier};

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Battles fought per tier
    pub battles_per_tier: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    pub tiers: Vec<DifficultyTier>,

    /// Fixed biome (None = rolled per encounter)
    pub biome: Option<Biome>,

    /// Stats of the pet entering the first battle of each tier
    pub player: StatBlock,

    /// Keep experience and levels between battles of a tier
    pub carry_progress: bool,

    /// The single consumable the scripted player may use per battle
    pub potion: Option<ItemEffects>,

    /// Rounds before a battle is abandoned as unfinished
    pub max_rounds: u32,

    pub battle: BattleConfig,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per battle)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            battles_per_tier: 1000,
            seed: None,
            tiers: DifficultyTier::ALL.to_vec(),
            biome: None,
            player: StatBlock {
                hp: 100,
                sp: 50,
                atk: 20,
                def: 10,
            },
            carry_progress: false,
            potion: Some(ItemEffects::new(Restore::Amount(30), Restore::Amount(0))),
            max_rounds: 200,
            battle: BattleConfig::default(),
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for checking a single tier
    pub fn tier_balance_test(tier: DifficultyTier) -> Self {
        Self {
            battles_per_tier: 200,
            tiers: vec![tier],
            ..Default::default()
        }
    }

    /// A pet that levels through every battle of a tier
    pub fn campaign(battles_per_tier: u32) -> Self {
        Self {
            battles_per_tier,
            carry_progress: true,
            ..Default::default()
        }
    }

    pub fn starting_player(&self) -> Combatant {
        Combatant::new("Simulated Pet", "pet_sim", self.player)
    }
}
