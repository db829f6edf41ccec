//! Default balance numbers.
//!
//! These seed `BattleConfig::default()`. Anything a designer may tune lives
//! in the config; the guarantees below the "Fixed rules" banner do not.

// =============================================================================
// ACTION COSTS
// =============================================================================

/// SP spent by a basic attack.
pub const BASIC_ATTACK_SP_COST: u32 = 5;

/// SP spent by the special attack (ability slot 0).
pub const SPECIAL_ATTACK_SP_COST: u32 = 10;

/// SP spent by heal self (ability slot 1).
pub const HEAL_SELF_SP_COST: u32 = 10;

/// SP spent by entering a defend stance.
pub const DEFEND_SP_COST: u32 = 5;

// =============================================================================
// DAMAGE & HEALING
// =============================================================================

/// Lower bound (inclusive) of the damage variance multiplier.
pub const DAMAGE_VARIANCE_MIN: f64 = 0.9;

/// Upper bound (exclusive) of the damage variance multiplier.
pub const DAMAGE_VARIANCE_MAX: f64 = 1.1;

/// Attack multiplier applied by the special attack.
pub const SPECIAL_ATTACK_MULTIPLIER: f64 = 1.5;

/// Fraction of effective max HP restored by heal self.
pub const HEAL_SELF_FRACTION: f64 = 0.25;

/// Chance that a flee attempt succeeds.
pub const FLEE_SUCCESS_CHANCE: f64 = 0.5;

// =============================================================================
// OPPONENT AI
// =============================================================================

/// Chance the opponent uses its special attack when it can afford it.
pub const AI_SPECIAL_CHANCE: f64 = 0.5;

/// Chance the opponent uses a basic attack when it can afford it.
pub const AI_BASIC_CHANCE: f64 = 0.7;

// =============================================================================
// ITEMS
// =============================================================================

/// Legacy item health effect at or above which the item fully restores HP.
pub const LEGACY_FULL_HEALTH_SENTINEL: u32 = 5000;

/// Legacy item SP effect at or above which the item fully restores SP.
pub const LEGACY_FULL_SP_SENTINEL: u32 = 1000;

// =============================================================================
// ENCOUNTERS
// =============================================================================

/// Chance that an ability slot draws from the biome pool instead of the neutral pool.
pub const BIOME_ABILITY_CHANCE: f64 = 0.8;

/// Stat multiplier gained per difficulty tier above 1.
pub const TIER_STAT_STEP: f64 = 0.5;

/// HP multiplier for opponents that drew a support ability.
pub const SUPPORT_HP_BOOST: f64 = 1.1;

/// SP multiplier for opponents that drew a support ability.
pub const SUPPORT_SP_BOOST: f64 = 1.2;

// =============================================================================
// LOOT
// =============================================================================

/// Base drop chance per loot slot.
pub const LOOT_BASE_DROP_CHANCE: f64 = 0.4;

/// Drop chance added per opponent level.
pub const LOOT_DROP_PER_LEVEL: f64 = 0.05;

/// Drop chance added per difficulty tier.
pub const LOOT_DROP_PER_TIER: f64 = 0.1;

/// Hard cap on the per-slot drop chance.
pub const LOOT_MAX_DROP_CHANCE: f64 = 0.85;

/// Rarity weights per tier: [common, uncommon, rare, legendary].
/// Tiers 1-2 never roll legendary.
pub const LOOT_RARITY_WEIGHTS: [[u32; 4]; 4] = [
    [70, 25, 5, 0],   // Tier 1: Easy
    [55, 30, 15, 0],  // Tier 2: Normal
    [40, 33, 20, 7],  // Tier 3: Hard
    [25, 35, 27, 13], // Tier 4: Expert
];

// =============================================================================
// PROGRESSION
// =============================================================================

/// Inclusive ATK growth per level-up.
pub const LEVEL_UP_ATK_RANGE: (u32, u32) = (1, 5);

/// Inclusive DEF growth per level-up.
pub const LEVEL_UP_DEF_RANGE: (u32, u32) = (1, 5);

/// Inclusive max HP growth per level-up.
pub const LEVEL_UP_HP_RANGE: (u32, u32) = (10, 29);

/// Inclusive max SP growth per level-up.
pub const LEVEL_UP_SP_RANGE: (u32, u32) = (5, 14);

// =============================================================================
// REWARDS
// =============================================================================

/// Victory XP granted per difficulty tier.
pub const REWARD_XP_PER_TIER: u64 = 40;

/// Victory XP granted per opponent level.
pub const REWARD_XP_PER_OPPONENT_LEVEL: u64 = 10;

/// Victory currency granted per difficulty tier.
pub const REWARD_CURRENCY_PER_TIER: u64 = 15;

/// Maximum random currency added on victory.
pub const REWARD_CURRENCY_VARIANCE: u64 = 10;

/// Fraction of the victory XP granted on defeat.
pub const DEFEAT_XP_FRACTION: f64 = 0.25;

// =============================================================================
// Fixed rules
// =============================================================================

/// Basic attacks always deal at least this much damage.
pub const MIN_BASIC_DAMAGE: u32 = 1;

/// Special attacks always deal at least this much damage.
pub const MIN_SPECIAL_DAMAGE: u32 = 2;

/// Item uses permitted per battle.
pub const ITEM_USES_PER_BATTLE: u32 = 1;

/// XP threshold for level N is `N² × XP_CURVE_BASE`.
pub const XP_CURVE_BASE: u64 = 100;

/// Lowest and highest difficulty tier.
pub const MIN_TIER: u8 = 1;
pub const MAX_TIER: u8 = 4;
