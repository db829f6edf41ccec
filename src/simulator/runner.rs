//! Scripted battles driven through the real battle state machine.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::SimConfig;
use super::report::{SimReport, TierStats};
use crate::battle::{Battle, BattleOutcome, PlayerAction, HEAL_SELF_SLOT, SPECIAL_ATTACK_SLOT};
use crate::combatant::Combatant;
use crate::core::error::ConfigError;
use crate::encounter::{generate_encounter, DifficultyTier};

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport, ConfigError> {
    config.battle.validate()?;
    let tiers = config
        .tiers
        .iter()
        .map(|&tier| simulate_tier(config, tier))
        .collect();
    Ok(SimReport { tiers })
}

/// Simple scripted policy: potion when low, heal when hurt, otherwise the
/// strongest affordable attack, and flee once out of SP.
pub fn choose_player_action(battle: &Battle, config: &SimConfig) -> PlayerAction {
    let me = battle.player();
    let combat = &battle.config().combat;
    let hp_ratio = me.hp as f64 / me.effective_max_hp().max(1) as f64;

    if hp_ratio < 0.3 && battle.item_use_available() {
        if let Some(potion) = config.potion {
            return PlayerAction::UseItem(potion);
        }
    }
    if hp_ratio < 0.4 && me.can_afford(combat.heal_self_cost) {
        return PlayerAction::Ability(HEAL_SELF_SLOT);
    }
    if me.can_afford(combat.special_attack_cost) {
        return PlayerAction::Ability(SPECIAL_ATTACK_SLOT);
    }
    if me.can_afford(combat.basic_attack_cost) {
        return PlayerAction::BasicAttack;
    }
    PlayerAction::Flee
}

fn battle_rng(config: &SimConfig, tier: DifficultyTier, index: u32) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(
            seed.wrapping_add(tier.value() as u64 * 1_000_003)
                .wrapping_add(index as u64),
        ),
        None => StdRng::from_entropy(),
    }
}

fn simulate_tier(config: &SimConfig, tier: DifficultyTier) -> TierStats {
    let mut stats = TierStats::new(tier);
    let mut player = config.starting_player();

    for index in 0..config.battles_per_tier {
        let mut rng = battle_rng(config, tier, index);
        let encounter = generate_encounter(tier, config.biome, &config.battle.encounter, &mut rng);
        let mut battle =
            Battle::with_checked_config(player.clone(), encounter, config.battle.clone(), rng);

        match fight(&mut battle, config) {
            Some(outcome) => stats.record(&outcome, battle.round()),
            None => stats.unfinished += 1,
        }

        if config.verbosity >= 2 {
            println!(
                "Tier {} battle {}/{} - {:?} after {} rounds, L{}",
                tier.value(),
                index + 1,
                config.battles_per_tier,
                battle.state(),
                battle.round(),
                battle.player().level
            );
        }

        if config.carry_progress {
            player = rested(battle.player());
        }
    }

    stats.final_level = player.level;
    stats
}

/// Plays one battle to completion with the scripted policy.
pub fn fight(battle: &mut Battle, config: &SimConfig) -> Option<BattleOutcome> {
    if let Err(err) = battle.start() {
        tracing::warn!(error = %err, "simulated battle failed to start");
        return None;
    }

    while !battle.state().is_ended() {
        if battle.round() >= config.max_rounds {
            tracing::warn!(rounds = battle.round(), "simulated battle hit the round limit");
            return None;
        }
        let action = choose_player_action(battle, config);
        if let Err(err) = battle.submit(action) {
            tracing::warn!(error = %err, ?action, "scripted action refused");
            if battle.submit(PlayerAction::Flee).is_err() {
                return None;
            }
        }
    }

    battle.outcome().cloned()
}

/// The pet between battles: progress kept, pools refilled.
fn rested(player: &Combatant) -> Combatant {
    let mut next = player.clone();
    next.restore_full();
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::OutcomeKind;

    fn quick(tier: DifficultyTier) -> SimConfig {
        SimConfig {
            battles_per_tier: 50,
            seed: Some(42),
            tiers: vec![tier],
            verbosity: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_every_battle_is_accounted_for() {
        let report = run_simulation(&quick(DifficultyTier::NORMAL)).unwrap();
        let t = &report.tiers[0];
        assert_eq!(t.victories + t.defeats + t.escapes + t.unfinished, 50);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = run_simulation(&quick(DifficultyTier::HARD)).unwrap();
        let b = run_simulation(&quick(DifficultyTier::HARD)).unwrap();
        assert_eq!(a.tiers[0].victories, b.tiers[0].victories);
        assert_eq!(a.tiers[0].total_rounds, b.tiers[0].total_rounds);
        assert_eq!(a.tiers[0].loot_by_rarity, b.tiers[0].loot_by_rarity);
    }

    #[test]
    fn test_fight_reaches_an_outcome() {
        let config = quick(DifficultyTier::EASY);
        let mut rng = StdRng::seed_from_u64(7);
        let encounter =
            generate_encounter(DifficultyTier::EASY, None, &config.battle.encounter, &mut rng);
        let mut battle = Battle::new(
            config.starting_player(),
            encounter,
            config.battle.clone(),
            rng,
        )
        .unwrap();
        let outcome = fight(&mut battle, &config).unwrap();
        assert!(matches!(
            outcome.kind,
            OutcomeKind::Victory | OutcomeKind::Defeat | OutcomeKind::Escape
        ));
        assert!(battle.state().is_ended());
    }

    #[test]
    fn test_campaign_gains_levels() {
        let config = SimConfig {
            seed: Some(3),
            tiers: vec![DifficultyTier::EASY],
            verbosity: 0,
            ..SimConfig::campaign(30)
        };
        let report = run_simulation(&config).unwrap();
        assert!(report.tiers[0].final_level > 1);
    }

    #[test]
    fn test_invalid_tuning_stops_the_run() {
        let mut config = quick(DifficultyTier::EASY);
        config.battle.loot.base_drop_chance = -0.1;
        assert!(run_simulation(&config).is_err());
    }
}
