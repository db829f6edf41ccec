//! Tunable balance data.
//!
//! Every section deserializes with `#[serde(default)]`, so an override file
//! only needs the numbers it changes:
//!
//! ```json
//! { "combat": { "flee_success_chance": 0.4 }, "rewards": { "xp_per_tier": 60 } }
//! ```

use super::constants::*;
use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Action costs, damage variance and opponent AI odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub basic_attack_cost: u32,
    pub special_attack_cost: u32,
    pub heal_self_cost: u32,
    pub defend_cost: u32,
    pub variance_min: f64,
    pub variance_max: f64,
    pub special_multiplier: f64,
    pub heal_fraction: f64,
    pub flee_success_chance: f64,
    pub ai_special_chance: f64,
    pub ai_basic_chance: f64,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            basic_attack_cost: BASIC_ATTACK_SP_COST,
            special_attack_cost: SPECIAL_ATTACK_SP_COST,
            heal_self_cost: HEAL_SELF_SP_COST,
            defend_cost: DEFEND_SP_COST,
            variance_min: DAMAGE_VARIANCE_MIN,
            variance_max: DAMAGE_VARIANCE_MAX,
            special_multiplier: SPECIAL_ATTACK_MULTIPLIER,
            heal_fraction: HEAL_SELF_FRACTION,
            flee_success_chance: FLEE_SUCCESS_CHANCE,
            ai_special_chance: AI_SPECIAL_CHANCE,
            ai_basic_chance: AI_BASIC_CHANCE,
        }
    }
}

/// Opponent generation odds and scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterTuning {
    pub biome_ability_chance: f64,
    pub tier_stat_step: f64,
    pub support_hp_boost: f64,
    pub support_sp_boost: f64,
}

impl Default for EncounterTuning {
    fn default() -> Self {
        Self {
            biome_ability_chance: BIOME_ABILITY_CHANCE,
            tier_stat_step: TIER_STAT_STEP,
            support_hp_boost: SUPPORT_HP_BOOST,
            support_sp_boost: SUPPORT_SP_BOOST,
        }
    }
}

/// Drop chances and rarity tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootTuning {
    pub base_drop_chance: f64,
    pub drop_per_level: f64,
    pub drop_per_tier: f64,
    pub max_drop_chance: f64,
    /// Indexed by tier - 1: [common, uncommon, rare, legendary].
    pub rarity_weights: [[u32; 4]; 4],
}

impl Default for LootTuning {
    fn default() -> Self {
        Self {
            base_drop_chance: LOOT_BASE_DROP_CHANCE,
            drop_per_level: LOOT_DROP_PER_LEVEL,
            drop_per_tier: LOOT_DROP_PER_TIER,
            max_drop_chance: LOOT_MAX_DROP_CHANCE,
            rarity_weights: LOOT_RARITY_WEIGHTS,
        }
    }
}

/// Inclusive per-level stat growth ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub atk_growth: (u32, u32),
    pub def_growth: (u32, u32),
    pub max_hp_growth: (u32, u32),
    pub max_sp_growth: (u32, u32),
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            atk_growth: LEVEL_UP_ATK_RANGE,
            def_growth: LEVEL_UP_DEF_RANGE,
            max_hp_growth: LEVEL_UP_HP_RANGE,
            max_sp_growth: LEVEL_UP_SP_RANGE,
        }
    }
}

/// Experience and currency payouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTuning {
    pub xp_per_tier: u64,
    pub xp_per_opponent_level: u64,
    pub currency_per_tier: u64,
    pub currency_variance: u64,
    pub defeat_xp_fraction: f64,
}

impl Default for RewardTuning {
    fn default() -> Self {
        Self {
            xp_per_tier: REWARD_XP_PER_TIER,
            xp_per_opponent_level: REWARD_XP_PER_OPPONENT_LEVEL,
            currency_per_tier: REWARD_CURRENCY_PER_TIER,
            currency_variance: REWARD_CURRENCY_VARIANCE,
            defeat_xp_fraction: DEFEAT_XP_FRACTION,
        }
    }
}

/// All tuning consumed by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub combat: CombatTuning,
    pub encounter: EncounterTuning,
    pub loot: LootTuning,
    pub progression: ProgressionTuning,
    pub rewards: RewardTuning,
}

impl BattleConfig {
    /// Parses a JSON override and validates the result.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: BattleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON override file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects tuning the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.combat;
        if !(c.variance_min > 0.0 && c.variance_min < c.variance_max) {
            return Err(ConfigError::Invalid(format!(
                "damage variance range {}..{} is empty",
                c.variance_min, c.variance_max
            )));
        }

        let chances = [
            ("combat.flee_success_chance", c.flee_success_chance),
            ("combat.ai_special_chance", c.ai_special_chance),
            ("combat.ai_basic_chance", c.ai_basic_chance),
            ("combat.heal_fraction", c.heal_fraction),
            ("encounter.biome_ability_chance", self.encounter.biome_ability_chance),
            ("loot.base_drop_chance", self.loot.base_drop_chance),
            ("loot.max_drop_chance", self.loot.max_drop_chance),
            ("rewards.defeat_xp_fraction", self.rewards.defeat_xp_fraction),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0..=1, got {value}"
                )));
            }
        }

        for (index, row) in self.loot.rarity_weights.iter().enumerate() {
            if row.iter().sum::<u32>() == 0 {
                return Err(ConfigError::Invalid(format!(
                    "loot.rarity_weights for tier {} are all zero",
                    index + 1
                )));
            }
        }
        // Legendary drops start at tier 3
        for (index, row) in self.loot.rarity_weights.iter().take(2).enumerate() {
            if row[3] != 0 {
                return Err(ConfigError::Invalid(format!(
                    "loot.rarity_weights for tier {} allow legendary drops",
                    index + 1
                )));
            }
        }

        let p = &self.progression;
        for (name, (lo, hi)) in [
            ("atk_growth", p.atk_growth),
            ("def_growth", p.def_growth),
            ("max_hp_growth", p.max_hp_growth),
            ("max_sp_growth", p.max_sp_growth),
        ] {
            if lo > hi {
                return Err(ConfigError::Invalid(format!(
                    "progression.{name} range {lo}..={hi} is empty"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = BattleConfig::default();
        assert_eq!(config.combat.basic_attack_cost, 5);
        assert_eq!(config.combat.special_attack_cost, 10);
        assert!((config.combat.flee_success_chance - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.loot.rarity_weights[0][3], 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = BattleConfig::from_json_str(
            r#"{ "combat": { "flee_success_chance": 0.25 }, "rewards": { "xp_per_tier": 60 } }"#,
        )
        .unwrap();
        assert!((config.combat.flee_success_chance - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.combat.basic_attack_cost, BASIC_ATTACK_SP_COST);
        assert_eq!(config.rewards.xp_per_tier, 60);
        assert_eq!(config.loot, LootTuning::default());
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let err = BattleConfig::from_json_str(r#"{ "combat": { "ai_basic_chance": 1.5 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn test_legendary_weight_below_tier_three_rejected() {
        let err = BattleConfig::from_json_str(
            r#"{ "loot": { "rarity_weights": [[0, 0, 0, 1], [60, 30, 10, 0], [40, 35, 20, 5], [20, 35, 30, 15]] } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("tier 1")), "{err}");

        let mut config = BattleConfig::default();
        config.loot.rarity_weights[1][3] = 5;
        assert!(config.validate().is_err());

        let mut config = BattleConfig::default();
        config.loot.rarity_weights[2][3] = 50;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_variance_rejected() {
        let mut config = BattleConfig::default();
        config.combat.variance_min = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = BattleConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = BattleConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
