//! Damage, healing and flee arithmetic.
//!
//! The deterministic functions take the variance multiplier as an argument
//! so the formula bounds can be tested directly; the `roll_*` wrappers draw
//! it from the supplied RNG.

use rand::Rng;

use crate::core::config::CombatTuning;
use crate::core::constants::{MIN_BASIC_DAMAGE, MIN_SPECIAL_DAMAGE};

/// Draws the damage multiplier from `[variance_min, variance_max)`.
pub fn roll_variance(tuning: &CombatTuning, rng: &mut impl Rng) -> f64 {
    rng.gen_range(tuning.variance_min..tuning.variance_max)
}

fn floor_at(raw: f64, minimum: u32) -> u32 {
    let floored = raw.floor();
    if floored < minimum as f64 {
        minimum
    } else {
        floored as u32
    }
}

/// Basic attack damage.
///
/// `max(1, floor((atk - def / 2) * variance))`. Defense counts at half value.
pub fn basic_attack_damage(atk: u32, def: u32, variance: f64) -> u32 {
    let raw = (atk as f64 - def as f64 / 2.0) * variance;
    floor_at(raw, MIN_BASIC_DAMAGE)
}

/// Special attack damage.
///
/// `max(2, floor((atk * multiplier - def) * variance))`.
pub fn special_attack_damage(atk: u32, def: u32, multiplier: f64, variance: f64) -> u32 {
    let raw = (atk as f64 * multiplier - def as f64) * variance;
    floor_at(raw, MIN_SPECIAL_DAMAGE)
}

/// Halves damage against a defending target, never below the attack's floor.
pub fn apply_defend(damage: u32, minimum: u32) -> u32 {
    (damage / 2).max(minimum)
}

/// Heal self amount: `floor(effective_max_hp * fraction)`.
pub fn heal_amount(effective_max_hp: u32, fraction: f64) -> u32 {
    (effective_max_hp as f64 * fraction).floor() as u32
}

pub fn roll_basic_attack(atk: u32, def: u32, tuning: &CombatTuning, rng: &mut impl Rng) -> u32 {
    basic_attack_damage(atk, def, roll_variance(tuning, rng))
}

pub fn roll_special_attack(atk: u32, def: u32, tuning: &CombatTuning, rng: &mut impl Rng) -> u32 {
    special_attack_damage(atk, def, tuning.special_multiplier, roll_variance(tuning, rng))
}

/// Unweighted flee attempt.
pub fn roll_flee(tuning: &CombatTuning, rng: &mut impl Rng) -> bool {
    rng.gen_bool(tuning.flee_success_chance)
}
