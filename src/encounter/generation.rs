//! Procedural opponent generation.

use rand::seq::SliceRandom;
use rand::Rng;

use super::data::{biome_abilities, biome_archetypes, NEUTRAL_ABILITIES};
use super::types::{Ability, AbilityCategory, Archetype, Biome, DifficultyTier, Encounter};
use crate::combatant::{Combatant, StatBlock};
use crate::core::config::EncounterTuning;

/// Number of abilities an opponent of this tier is generated with.
pub fn roll_ability_count(tier: DifficultyTier, rng: &mut impl Rng) -> usize {
    match tier.value() {
        1 => 1,
        2 => {
            if rng.gen_bool(0.5) {
                1
            } else {
                2
            }
        }
        3 => 2,
        _ => {
            if rng.gen_bool(0.5) {
                2
            } else {
                3
            }
        }
    }
}

/// Draws abilities for an opponent.
///
/// Each slot draws from the biome pool with `biome_ability_chance`, else from
/// the neutral pool. Below Expert a category may only appear once; when that
/// filter empties the chosen pool the draw falls back to the whole pool.
pub fn draw_abilities(
    biome: Biome,
    tier: DifficultyTier,
    tuning: &EncounterTuning,
    rng: &mut impl Rng,
) -> Vec<&'static Ability> {
    let count = roll_ability_count(tier, rng);
    let allow_repeats = tier == DifficultyTier::EXPERT;
    let mut drawn: Vec<&'static Ability> = Vec::with_capacity(count);

    for _ in 0..count {
        let pool = if rng.gen_bool(tuning.biome_ability_chance) {
            biome_abilities(biome)
        } else {
            NEUTRAL_ABILITIES
        };

        if let Some(ability) = pick_ability(pool, &drawn, allow_repeats, rng) {
            drawn.push(ability);
        }
    }

    drawn
}

/// Picks one ability from `pool`, skipping categories already in `drawn`
/// unless repeats are allowed. Falls back to the unfiltered pool.
pub fn pick_ability(
    pool: &'static [Ability],
    drawn: &[&'static Ability],
    allow_repeats: bool,
    rng: &mut impl Rng,
) -> Option<&'static Ability> {
    let filtered: Vec<&'static Ability> = pool
        .iter()
        .filter(|a| allow_repeats || drawn.iter().all(|d| d.category != a.category))
        .collect();

    if filtered.is_empty() {
        pool.choose(rng)
    } else {
        filtered.choose(rng).copied()
    }
}

/// Linear tier multiplier: 1.0, 1.5, 2.0, 2.5 at the default step.
pub fn tier_multiplier(tier: DifficultyTier, tuning: &EncounterTuning) -> f64 {
    1.0 + (tier.value() as f64 - 1.0) * tuning.tier_stat_step
}

/// Scales an archetype's base stats for the tier. Opponents with a support
/// ability get a larger HP and SP buffer.
pub fn scale_stats(
    base: StatBlock,
    tier: DifficultyTier,
    has_support: bool,
    tuning: &EncounterTuning,
) -> StatBlock {
    let mult = tier_multiplier(tier, tuning);
    let (hp_boost, sp_boost) = if has_support {
        (tuning.support_hp_boost, tuning.support_sp_boost)
    } else {
        (1.0, 1.0)
    };

    let scale = |value: u32, extra: f64| (value as f64 * mult * extra).round() as u32;

    StatBlock {
        hp: scale(base.hp, hp_boost).max(1),
        sp: scale(base.sp, sp_boost),
        atk: scale(base.atk, 1.0),
        def: scale(base.def, 1.0),
    }
}

/// Builds an opponent from an archetype and drawn abilities.
pub fn build_opponent(
    archetype: &Archetype,
    abilities: &[&'static Ability],
    tier: DifficultyTier,
    tuning: &EncounterTuning,
) -> Combatant {
    let has_support = abilities
        .iter()
        .any(|a| a.category == AbilityCategory::Support);
    let stats = scale_stats(archetype.base, tier, has_support, tuning);

    Combatant::new(archetype.name, archetype.sprite_key, stats)
        .with_level(tier.value() as u32, 0)
        .with_abilities(abilities.iter().map(|a| a.id.to_string()).collect())
}

/// Generates an encounter. Without a biome one is chosen uniformly.
pub fn generate_encounter(
    tier: DifficultyTier,
    biome: Option<Biome>,
    tuning: &EncounterTuning,
    rng: &mut impl Rng,
) -> Encounter {
    let biome = biome.unwrap_or_else(|| Biome::ALL[rng.gen_range(0..Biome::ALL.len())]);
    let archetypes = biome_archetypes(biome);
    let archetype = &archetypes[rng.gen_range(0..archetypes.len())];
    let abilities = draw_abilities(biome, tier, tuning, rng);
    let opponent = build_opponent(archetype, &abilities, tier, tuning);

    tracing::debug!(
        tier = tier.value(),
        biome = biome.name(),
        opponent = %opponent.name,
        hp = opponent.max_hp,
        sp = opponent.max_sp,
        atk = opponent.atk,
        def = opponent.def,
        abilities = ?opponent.abilities,
        "generated encounter"
    );

    Encounter::new(tier, biome, opponent)
}
