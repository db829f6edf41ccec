//! Integration test: Battle State Machine
//!
//! Drives whole battles through the public API: damage bounds, defend
//! stances, the single item use, fleeing, termination and rewards.

use petquest::battle::math::apply_defend;
use petquest::battle::{
    ActionKind, Battle, BattleEvent, BattleState, ItemEffects, OutcomeKind, PlayerAction, Restore,
};
use petquest::combatant::{ActiveBuffs, Combatant, Side, StatBlock, StatModifiers};
use petquest::core::config::BattleConfig;
use petquest::core::constants::{MIN_BASIC_DAMAGE, MIN_SPECIAL_DAMAGE};
use petquest::core::error::BattleError;
use petquest::encounter::{Biome, DifficultyTier, Encounter};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn pet(stats: StatBlock) -> Combatant {
    Combatant::new("Mochi", "pet_mochi", stats)
}

fn standard_pet() -> Combatant {
    pet(StatBlock {
        hp: 100,
        sp: 50,
        atk: 20,
        def: 10,
    })
}

fn boar(stats: StatBlock) -> Encounter {
    Encounter::new(
        DifficultyTier::EASY,
        Biome::Forest,
        Combatant::new("Mossback Boar", "enemy_forest_boar", stats),
    )
}

fn standard_boar() -> Encounter {
    boar(StatBlock {
        hp: 80,
        sp: 30,
        atk: 15,
        def: 8,
    })
}

fn battle_with(player: Combatant, encounter: Encounter, seed: u64) -> Battle<ChaCha8Rng> {
    Battle::new(
        player,
        encounter,
        BattleConfig::default(),
        ChaCha8Rng::seed_from_u64(seed),
    )
    .unwrap()
}

fn player_hits(events: &[BattleEvent]) -> Vec<(ActionKind, u32, u32)> {
    events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::Damage {
                attacker: Side::Player,
                action,
                raw,
                amount,
                ..
            } => Some((*action, *raw, *amount)),
            _ => None,
        })
        .collect()
}

// =========================================================================
// Damage
// =========================================================================

#[test]
fn test_example_basic_attack_lands_in_formula_bounds() {
    for seed in 0..200 {
        let mut battle = battle_with(standard_pet(), standard_boar(), seed);
        battle.start_with(Side::Player).unwrap();
        let result = battle.submit(PlayerAction::BasicAttack).unwrap();

        let hits = player_hits(&result.events);
        assert_eq!(hits.len(), 1);
        let (_, _, amount) = hits[0];
        assert!((14..=17).contains(&amount), "seed {seed}: damage {amount}");
        assert!(
            (63..=66).contains(&battle.opponent().hp),
            "seed {seed}: opponent hp {}",
            battle.opponent().hp
        );
        assert_eq!(battle.player().sp, 45);
    }
}

#[test]
fn test_minimum_damage_against_huge_defense() {
    let weakling = pet(StatBlock {
        hp: 100,
        sp: 200,
        atk: 1,
        def: 10,
    });
    let wall = boar(StatBlock {
        hp: 5000,
        sp: 0,
        atk: 1,
        def: 900,
    });
    let mut battle = battle_with(weakling, wall, 11);
    battle.start_with(Side::Player).unwrap();

    for turn in 0..20 {
        let action = if turn % 2 == 0 {
            PlayerAction::BasicAttack
        } else {
            PlayerAction::Ability(0)
        };
        let result = battle.submit(action).unwrap();
        for (kind, _, amount) in player_hits(&result.events) {
            match kind {
                ActionKind::BasicAttack => assert!(amount >= MIN_BASIC_DAMAGE),
                ActionKind::SpecialAttack => assert!(amount >= MIN_SPECIAL_DAMAGE),
                other => panic!("unexpected attack kind {other}"),
            }
        }
    }
    assert!(battle.opponent().hp < 5000);
}

#[test]
fn test_buffs_count_toward_damage_and_are_restored() {
    let buffs = ActiveBuffs::new(
        StatModifiers {
            atk: 10,
            ..Default::default()
        },
        Some(1_900_000_000),
    );
    let player = standard_pet().with_buffs(buffs);
    let mut battle = battle_with(player, standard_boar(), 5);
    battle.start_with(Side::Player).unwrap();

    let result = battle.submit(PlayerAction::BasicAttack).unwrap();
    let (_, _, amount) = player_hits(&result.events)[0];
    // (30 - 4) * [0.9, 1.1)
    assert!((23..=28).contains(&amount), "damage {amount}");

    while !battle.state().is_ended() {
        if battle.submit(PlayerAction::Flee).is_err() {
            break;
        }
    }
    assert_eq!(battle.player().active_buffs, buffs);
}

// =========================================================================
// Defend
// =========================================================================

#[test]
fn test_defend_halves_the_next_hit_only() {
    let mut guarded_hits = 0;
    for seed in 0..100 {
        let mut battle = battle_with(standard_pet(), standard_boar(), seed);
        battle.start_with(Side::Player).unwrap();
        let result = battle.submit(PlayerAction::Defend).unwrap();

        for event in &result.events {
            if let BattleEvent::Damage {
                attacker: Side::Opponent,
                action,
                raw,
                amount,
                defended,
                ..
            } = *event
            {
                assert!(defended, "seed {seed}: hit after defend was not guarded");
                let floor = if action == ActionKind::SpecialAttack {
                    MIN_SPECIAL_DAMAGE
                } else {
                    MIN_BASIC_DAMAGE
                };
                assert_eq!(amount, apply_defend(raw, floor));
                guarded_hits += 1;
            }
        }

        // The stance ends once the player's next turn begins
        assert!(!battle.is_defending(Side::Player));
    }
    assert!(guarded_hits > 50, "only {guarded_hits} guarded hits");
}

#[test]
fn test_opponent_defend_halves_players_next_hit_only() {
    let mut guarded_turns = 0;
    for seed in 0..100 {
        let mut encounter = standard_boar();
        // Too little SP for a special: basic attack or defend
        encounter.opponent.sp = 5;
        let mut battle = battle_with(standard_pet(), encounter, seed);
        let opening = battle.start_with(Side::Opponent).unwrap();
        if !opening.events.contains(&BattleEvent::Defending {
            side: Side::Opponent,
        }) {
            continue;
        }
        guarded_turns += 1;
        assert!(battle.is_defending(Side::Opponent));

        let result = battle.submit(PlayerAction::BasicAttack).unwrap();
        let (_, raw, amount) = player_hits(&result.events)[0];
        assert_eq!(amount, apply_defend(raw, MIN_BASIC_DAMAGE), "seed {seed}");
        assert!(result.events.iter().any(|e| matches!(
            e,
            BattleEvent::Damage {
                attacker: Side::Player,
                defended: true,
                ..
            }
        )));
        // The opponent's own turn began, so the stance is gone
        assert!(!battle.is_defending(Side::Opponent));

        let result = battle.submit(PlayerAction::BasicAttack).unwrap();
        for event in &result.events {
            if let BattleEvent::Damage {
                attacker: Side::Player,
                raw,
                amount,
                defended,
                ..
            } = *event
            {
                assert!(!defended, "seed {seed}: stance outlived its turn");
                assert_eq!(raw, amount);
            }
        }
    }
    assert!(guarded_turns > 10, "only {guarded_turns} opponent defends");
}

#[test]
fn test_undefended_hits_are_not_halved() {
    for seed in 0..50 {
        let mut battle = battle_with(standard_pet(), standard_boar(), seed);
        battle.start_with(Side::Player).unwrap();
        let result = battle.submit(PlayerAction::BasicAttack).unwrap();
        for event in &result.events {
            if let BattleEvent::Damage {
                attacker: Side::Opponent,
                raw,
                amount,
                defended,
                ..
            } = *event
            {
                assert!(!defended);
                assert_eq!(raw, amount);
            }
        }
    }
}

// =========================================================================
// Resources and items
// =========================================================================

#[test]
fn test_insufficient_sp_is_refused_without_change() {
    let mut player = standard_pet();
    player.sp = 4;
    let mut battle = battle_with(player, standard_boar(), 3);
    battle.start_with(Side::Player).unwrap();

    for action in [
        PlayerAction::BasicAttack,
        PlayerAction::Defend,
        PlayerAction::Ability(0),
        PlayerAction::Ability(1),
    ] {
        let err = battle.submit(action).unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, BattleError::InsufficientResource { available: 4, .. }));
    }
    assert_eq!(battle.player().sp, 4);
    assert_eq!(battle.opponent().hp, 80);
    assert_eq!(battle.round(), 0);
    assert_eq!(
        battle.state(),
        BattleState::InProgress {
            turn_owner: Side::Player
        }
    );
}

#[test]
fn test_exactly_one_item_use_per_battle() {
    let mut player = standard_pet();
    player.hp = 20;
    player.sp = 5;
    let mut battle = battle_with(player, standard_boar(), 8);
    battle.start_with(Side::Player).unwrap();

    let elixir = ItemEffects::new(Restore::Full, Restore::Full);
    let result = battle.submit(PlayerAction::UseItem(elixir)).unwrap();
    assert!(result.events.contains(&BattleEvent::ItemUsed {
        hp_restored: 80,
        sp_restored: 45,
    }));

    let hp = battle.player().hp;
    let sp = battle.player().sp;
    let err = battle.submit(PlayerAction::UseItem(elixir)).unwrap_err();
    assert_eq!(err, BattleError::ExhaustedItemUse);
    assert!(err.is_recoverable());
    assert_eq!(battle.player().hp, hp);
    assert_eq!(battle.player().sp, sp);
}

#[test]
fn test_legacy_sentinel_item_fully_restores() {
    let mut player = standard_pet();
    player.hp = 10;
    let mut battle = battle_with(player, standard_boar(), 9);
    battle.start_with(Side::Player).unwrap();

    let result = battle
        .submit(PlayerAction::UseItem(ItemEffects::from_legacy(5000, 0)))
        .unwrap();
    assert!(result.events.contains(&BattleEvent::ItemUsed {
        hp_restored: 90,
        sp_restored: 0,
    }));
}

// =========================================================================
// Fleeing and termination
// =========================================================================

#[test]
fn test_flee_success_rate_near_half() {
    let mut escapes = 0;
    for seed in 0..1000 {
        let mut battle = battle_with(standard_pet(), standard_boar(), seed);
        battle.start_with(Side::Player).unwrap();
        let result = battle.submit(PlayerAction::Flee).unwrap();
        if result.state == BattleState::Ended(OutcomeKind::Escape) {
            escapes += 1;
            let outcome = result.outcome.unwrap();
            assert_eq!(outcome.experience_gained, 0);
            assert_eq!(outcome.currency_gained, 0);
            assert!(outcome.loot.is_empty());
        } else {
            assert!(result.events.contains(&BattleEvent::FleeFailed));
        }
    }
    assert!(escapes > 430 && escapes < 570, "escaped {escapes}/1000");
}

#[test]
fn test_defeat_pays_reduced_experience() {
    let mut player = standard_pet();
    player.hp = 1;
    player.sp = 500;
    player.max_sp = 500;
    let mut battle = battle_with(player, standard_boar(), 21);
    battle.start_with(Side::Player).unwrap();

    for _ in 0..50 {
        if battle.state().is_ended() {
            break;
        }
        battle.submit(PlayerAction::Defend).unwrap();
    }

    assert_eq!(battle.state(), BattleState::Ended(OutcomeKind::Defeat));
    let outcome = battle.outcome().unwrap();
    // floor((1 * 40 + 1 * 10) * 0.25)
    assert_eq!(outcome.experience_gained, 12);
    assert_eq!(outcome.currency_gained, 0);
    assert!(outcome.loot.is_empty());
    assert_eq!(battle.player().hp, 0);
}

#[test]
fn test_hp_stays_in_bounds_through_random_battles() {
    for seed in 0..200 {
        let mut battle = battle_with(standard_pet(), standard_boar(), seed);
        battle.start().unwrap();
        let mut turns = 0;
        while !battle.state().is_ended() && turns < 100 {
            let action = match (seed + turns) % 5 {
                0 => PlayerAction::BasicAttack,
                1 => PlayerAction::Ability(0),
                2 => PlayerAction::Ability(1),
                3 => PlayerAction::Defend,
                _ => PlayerAction::Flee,
            };
            let _ = battle.submit(action);
            for c in [battle.player(), battle.opponent()] {
                assert!(c.hp <= c.effective_max_hp(), "{} hp {}", c.name, c.hp);
                assert!(c.sp <= c.effective_max_sp(), "{} sp {}", c.name, c.sp);
            }
            turns += 1;
        }
    }
}

#[test]
fn test_victory_log_reads_in_order() {
    let mut battle = battle_with(
        standard_pet(),
        boar(StatBlock {
            hp: 10,
            sp: 0,
            atk: 1,
            def: 0,
        }),
        4,
    );
    battle.start_with(Side::Player).unwrap();
    let result = battle.submit(PlayerAction::Ability(0)).unwrap();
    assert_eq!(result.state, BattleState::Ended(OutcomeKind::Victory));

    let log = battle.log_messages();
    assert!(log[0].contains("Mossback Boar"));
    assert!(log.iter().any(|line| line.contains("Special Attack")));
    assert!(log.iter().any(|line| line.contains("Victory")));
    assert!(log.iter().any(|line| line.contains("50 XP")));
}
