//! Opponent turn policy.

use rand::Rng;

use super::types::EnemyAction;
use crate::combatant::Combatant;
use crate::core::config::CombatTuning;

/// Picks the opponent's action from its current SP and dice rolls.
///
/// Priority: special attack (if affordable and the special roll hits), basic
/// attack (if affordable and the basic roll hits), defend (if affordable),
/// otherwise skip. Never picks an action the opponent cannot pay for.
pub fn choose_enemy_action(
    opponent: &Combatant,
    tuning: &CombatTuning,
    rng: &mut impl Rng,
) -> EnemyAction {
    if opponent.can_afford(tuning.special_attack_cost) && rng.gen_bool(tuning.ai_special_chance) {
        return EnemyAction::SpecialAttack;
    }
    if opponent.can_afford(tuning.basic_attack_cost) && rng.gen_bool(tuning.ai_basic_chance) {
        return EnemyAction::BasicAttack;
    }
    if opponent.can_afford(tuning.defend_cost) {
        return EnemyAction::Defend;
    }
    EnemyAction::Skip
}
