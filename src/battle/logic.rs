//! Turn-based battle state machine.
//!
//! A battle is driven entirely by its caller: `start` decides who acts first,
//! each `submit` resolves one player action and then the opponent's reply,
//! and nothing happens between calls. Pacing and animation belong to the
//! presentation layer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ai::choose_enemy_action;
use super::math::{apply_defend, heal_amount, roll_basic_attack, roll_flee, roll_special_attack};
use super::types::{
    ability_slot_action, ActionKind, ActionResult, BattleCommit, BattleEvent, BattleLogEntry,
    BattleOutcome, BattleState, OutcomeKind, PlayerAction,
};
use crate::combatant::{ActiveBuffs, Combatant, Side};
use crate::core::config::{BattleConfig, RewardTuning};
use crate::core::constants::{ITEM_USES_PER_BATTLE, MIN_BASIC_DAMAGE, MIN_SPECIAL_DAMAGE};
use crate::core::error::{BattleError, ConfigError, InvalidAction, PersistError};
use crate::encounter::{DifficultyTier, Encounter};
use crate::loot::generate_loot;
use crate::progression::apply_experience;

/// Experience and currency for an outcome.
///
/// Victory pays `tier * xp_per_tier + level * xp_per_opponent_level` XP plus
/// currency; defeat pays a fraction of that XP; escape pays nothing.
pub fn roll_rewards(
    kind: OutcomeKind,
    tier: DifficultyTier,
    opponent_level: u32,
    tuning: &RewardTuning,
    rng: &mut impl Rng,
) -> (u64, u64) {
    let tier = tier.value() as u64;
    let victory_xp = tier * tuning.xp_per_tier + opponent_level as u64 * tuning.xp_per_opponent_level;
    match kind {
        OutcomeKind::Victory => {
            let currency = tier * tuning.currency_per_tier + rng.gen_range(0..=tuning.currency_variance);
            (victory_xp, currency)
        }
        OutcomeKind::Defeat => ((victory_xp as f64 * tuning.defeat_xp_fraction).floor() as u64, 0),
        OutcomeKind::Escape => (0, 0),
    }
}

fn side_index(side: Side) -> usize {
    match side {
        Side::Player => 0,
        Side::Opponent => 1,
    }
}

/// One battle between the player's pet and a generated opponent.
#[derive(Debug, Clone)]
pub struct Battle<R: Rng = StdRng> {
    player: Combatant,
    encounter: Encounter,
    config: BattleConfig,
    state: BattleState,
    round: u32,
    defending: [bool; 2],
    item_uses_left: u32,
    buff_snapshot: ActiveBuffs,
    log: Vec<BattleLogEntry>,
    outcome: Option<BattleOutcome>,
    committed: bool,
    rng: R,
}

impl Battle<StdRng> {
    /// Creates a battle with an entropy-seeded RNG.
    pub fn from_entropy(
        player: Combatant,
        encounter: Encounter,
        config: BattleConfig,
    ) -> Result<Self, ConfigError> {
        Self::new(player, encounter, config, StdRng::from_entropy())
    }
}

impl<R: Rng> Battle<R> {
    /// Creates a battle. Tuning that could not be rolled against is rejected
    /// here rather than mid-battle.
    pub fn new(
        player: Combatant,
        encounter: Encounter,
        config: BattleConfig,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_checked_config(player, encounter, config, rng))
    }

    /// Skips validation for callers that already validated `config`.
    pub(crate) fn with_checked_config(
        player: Combatant,
        encounter: Encounter,
        config: BattleConfig,
        rng: R,
    ) -> Self {
        let buff_snapshot = player.active_buffs;
        Self {
            player,
            encounter,
            config,
            state: BattleState::NotStarted,
            round: 0,
            defending: [false; 2],
            item_uses_left: ITEM_USES_PER_BATTLE,
            buff_snapshot,
            log: Vec::new(),
            outcome: None,
            committed: false,
            rng,
        }
    }

    // === Accessors ===

    pub fn state(&self) -> BattleState {
        self.state
    }

    /// Completed rounds. Increments each time the turn returns to the player.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn opponent(&self) -> &Combatant {
        &self.encounter.opponent
    }

    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.encounter.opponent,
        }
    }

    fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.encounter.opponent,
        }
    }

    pub fn is_defending(&self, side: Side) -> bool {
        self.defending[side_index(side)]
    }

    pub fn item_use_available(&self) -> bool {
        self.item_uses_left > 0
    }

    pub fn log(&self) -> &[BattleLogEntry] {
        &self.log
    }

    pub fn log_messages(&self) -> Vec<String> {
        self.log.iter().map(|e| e.message.clone()).collect()
    }

    pub fn outcome(&self) -> Option<&BattleOutcome> {
        self.outcome.as_ref()
    }

    // === Lifecycle ===

    /// Starts the battle with a coin flip for the first turn.
    pub fn start(&mut self) -> Result<ActionResult, BattleError> {
        let first = if self.rng.gen_bool(0.5) {
            Side::Player
        } else {
            Side::Opponent
        };
        self.start_with(first)
    }

    /// Starts the battle with a fixed first turn. If the opponent goes first
    /// its turn resolves before this returns.
    pub fn start_with(&mut self, first: Side) -> Result<ActionResult, BattleError> {
        if self.state != BattleState::NotStarted {
            return Err(InvalidAction::AlreadyStarted.into());
        }

        self.buff_snapshot = self.player.active_buffs;
        self.player.clamp_pools();
        self.encounter.opponent.clamp_pools();
        tracing::info!(
            player = %self.player.name,
            opponent = %self.encounter.opponent.name,
            tier = self.encounter.tier.value(),
            biome = self.encounter.biome.name(),
            first = first.name(),
            "battle started"
        );
        self.push_log(
            None,
            format!(
                "A wild {} appears in the {}! ({})",
                self.encounter.opponent.name,
                self.encounter.biome.name(),
                self.encounter.tier.name()
            ),
        );
        let first_name = self.combatant(first).name.clone();
        self.push_log(Some(first), format!("{first_name} moves first."));

        let mut events = Vec::new();
        self.begin_turn(first, &mut events);
        if first == Side::Opponent {
            self.run_opponent_turn(&mut events);
            if let Some(kind) = self.check_end() {
                self.finish(kind, &mut events);
            } else {
                self.begin_turn(Side::Player, &mut events);
            }
        }
        Ok(self.result(events))
    }

    /// Resolves one player action, then the opponent's turn if the battle
    /// is still going.
    ///
    /// Rejected actions leave HP, SP, turn order and the item token untouched.
    pub fn submit(&mut self, action: PlayerAction) -> Result<ActionResult, BattleError> {
        let mut events = Vec::new();
        let escaped = match self.resolve_player_action(action, &mut events) {
            Ok(escaped) => escaped,
            Err(err) => {
                self.record_refusal(&err);
                return Err(err);
            }
        };
        self.player.check_invariants();
        self.encounter.opponent.check_invariants();

        let ended = if escaped {
            Some(OutcomeKind::Escape)
        } else {
            self.check_end()
        };
        if let Some(kind) = ended {
            self.finish(kind, &mut events);
            return Ok(self.result(events));
        }

        self.begin_turn(Side::Opponent, &mut events);
        self.run_opponent_turn(&mut events);
        if let Some(kind) = self.check_end() {
            self.finish(kind, &mut events);
            return Ok(self.result(events));
        }

        self.begin_turn(Side::Player, &mut events);
        Ok(self.result(events))
    }

    /// The record persistence should store, without marking it committed.
    pub fn pending_commit(&self) -> Result<BattleCommit, PersistError> {
        let Some(outcome) = self.outcome.clone() else {
            return Err(PersistError::NotEnded);
        };
        if self.committed {
            return Err(PersistError::AlreadyCommitted);
        }
        Ok(BattleCommit {
            player: self.player.clone(),
            outcome,
        })
    }

    /// Hands out the final player state and outcome, exactly once.
    ///
    /// Buffs are the snapshot taken at battle start.
    pub fn take_commit(&mut self) -> Result<BattleCommit, PersistError> {
        let commit = self.pending_commit()?;
        self.committed = true;
        Ok(commit)
    }

    // === Turn flow ===

    fn ensure_players_turn(&self) -> Result<(), BattleError> {
        match self.state {
            BattleState::NotStarted => Err(InvalidAction::NotStarted.into()),
            BattleState::Ended(_) => Err(InvalidAction::BattleEnded.into()),
            BattleState::InProgress {
                turn_owner: Side::Opponent,
            } => Err(InvalidAction::NotPlayersTurn.into()),
            BattleState::InProgress {
                turn_owner: Side::Player,
            } => Ok(()),
        }
    }

    /// Returns true if the player escaped.
    fn resolve_player_action(
        &mut self,
        action: PlayerAction,
        events: &mut Vec<BattleEvent>,
    ) -> Result<bool, BattleError> {
        self.ensure_players_turn()?;

        match action {
            PlayerAction::BasicAttack => {
                self.charge(Side::Player, ActionKind::BasicAttack)?;
                self.strike(Side::Player, ActionKind::BasicAttack, events);
            }
            PlayerAction::Ability(slot) => {
                let kind = ability_slot_action(slot).ok_or(InvalidAction::UnknownAbility(slot))?;
                self.charge(Side::Player, kind)?;
                if kind == ActionKind::HealSelf {
                    self.heal_self(Side::Player, events);
                } else {
                    self.strike(Side::Player, kind, events);
                }
            }
            PlayerAction::Defend => {
                self.charge(Side::Player, ActionKind::Defend)?;
                self.defend(Side::Player, events);
            }
            PlayerAction::UseItem(effects) => {
                if self.item_uses_left == 0 {
                    return Err(BattleError::ExhaustedItemUse);
                }
                self.item_uses_left -= 1;
                let (hp_restored, sp_restored) = effects.apply(&mut self.player);
                events.push(BattleEvent::ItemUsed {
                    hp_restored,
                    sp_restored,
                });
                let name = self.player.name.clone();
                self.push_log(
                    Some(Side::Player),
                    format!("{name} used an item: +{hp_restored} HP, +{sp_restored} SP."),
                );
                tracing::debug!(hp_restored, sp_restored, "item used");
            }
            PlayerAction::Flee => {
                let name = self.player.name.clone();
                if roll_flee(&self.config.combat, &mut self.rng) {
                    events.push(BattleEvent::Fled);
                    self.push_log(Some(Side::Player), format!("{name} got away safely!"));
                    return Ok(true);
                }
                events.push(BattleEvent::FleeFailed);
                self.push_log(Some(Side::Player), format!("{name} couldn't get away!"));
            }
        }
        Ok(false)
    }

    fn run_opponent_turn(&mut self, events: &mut Vec<BattleEvent>) {
        let action = choose_enemy_action(&self.encounter.opponent, &self.config.combat, &mut self.rng);
        let kind = action.kind();
        tracing::debug!(action = %kind, sp = self.encounter.opponent.sp, "opponent decided");

        if kind == ActionKind::Skip {
            events.push(BattleEvent::TurnSkipped {
                side: Side::Opponent,
            });
            let name = self.encounter.opponent.name.clone();
            self.push_log(Some(Side::Opponent), format!("{name} is too tired to act."));
            return;
        }

        if let Err(err) = self.charge(Side::Opponent, kind) {
            panic!("opponent AI chose an action it cannot afford: {err}");
        }
        match kind {
            ActionKind::Defend => self.defend(Side::Opponent, events),
            _ => self.strike(Side::Opponent, kind, events),
        }
        self.player.check_invariants();
    }

    fn begin_turn(&mut self, side: Side, events: &mut Vec<BattleEvent>) {
        if side == Side::Player
            && self.state
                == (BattleState::InProgress {
                    turn_owner: Side::Opponent,
                })
        {
            self.round += 1;
        }
        self.state = BattleState::InProgress { turn_owner: side };
        // A defend stance lasts until its owner's next turn begins
        self.defending[side_index(side)] = false;
        events.push(BattleEvent::TurnStarted {
            side,
            round: self.round,
        });
    }

    fn check_end(&self) -> Option<OutcomeKind> {
        if self.encounter.opponent.is_defeated() {
            Some(OutcomeKind::Victory)
        } else if self.player.is_defeated() {
            Some(OutcomeKind::Defeat)
        } else {
            None
        }
    }

    fn finish(&mut self, kind: OutcomeKind, events: &mut Vec<BattleEvent>) {
        let tier = self.encounter.tier;
        let opponent_level = self.encounter.opponent.level;
        let (experience_gained, currency_gained) =
            roll_rewards(kind, tier, opponent_level, &self.config.rewards, &mut self.rng);
        let loot = if kind == OutcomeKind::Victory {
            generate_loot(tier, opponent_level, &self.config.loot, &mut self.rng)
        } else {
            Vec::new()
        };

        // Battle-scoped buffs end here
        self.player.active_buffs = self.buff_snapshot;
        let level_up = apply_experience(
            &mut self.player,
            experience_gained,
            &self.config.progression,
            &mut self.rng,
        );

        self.state = BattleState::Ended(kind);
        self.defending = [false; 2];
        events.push(BattleEvent::Ended(kind));

        let player_name = self.player.name.clone();
        let opponent_name = self.encounter.opponent.name.clone();
        let headline = match kind {
            OutcomeKind::Victory => format!("{opponent_name} fainted! Victory!"),
            OutcomeKind::Defeat => format!("{player_name} fainted... Defeat."),
            OutcomeKind::Escape => format!("{player_name} escaped from {opponent_name}."),
        };
        self.push_log(None, headline);
        if experience_gained > 0 || currency_gained > 0 {
            self.push_log(
                None,
                format!("Gained {experience_gained} XP and {currency_gained} coins."),
            );
        }
        for item in &loot {
            let line = format!("Found: {} {}", item.rarity.name(), item.item_type.name());
            self.push_log(None, line);
        }
        if level_up.leveled_up() {
            self.push_log(
                Some(Side::Player),
                format!("{player_name} grew to level {}!", level_up.to_level),
            );
        }

        tracing::info!(
            outcome = kind.name(),
            rounds = self.round,
            xp = experience_gained,
            currency = currency_gained,
            loot = loot.len(),
            levels_gained = level_up.levels_gained,
            "battle ended"
        );

        self.outcome = Some(BattleOutcome {
            kind,
            experience_gained,
            currency_gained,
            loot,
            level_up,
        });
    }

    fn result(&self, events: Vec<BattleEvent>) -> ActionResult {
        ActionResult {
            events,
            state: self.state,
            outcome: self.outcome.clone(),
        }
    }

    // === Action effects ===

    fn cost_of(&self, kind: ActionKind) -> u32 {
        let combat = &self.config.combat;
        match kind {
            ActionKind::BasicAttack => combat.basic_attack_cost,
            ActionKind::SpecialAttack => combat.special_attack_cost,
            ActionKind::HealSelf => combat.heal_self_cost,
            ActionKind::Defend => combat.defend_cost,
            ActionKind::UseItem | ActionKind::Flee | ActionKind::Skip => 0,
        }
    }

    /// Deducts the action's SP cost from `side`, or refuses without change.
    fn charge(&mut self, side: Side, kind: ActionKind) -> Result<(), BattleError> {
        let cost = self.cost_of(kind);
        let actor = self.combatant_mut(side);
        let available = actor.sp;
        if !actor.spend_sp(cost) {
            return Err(BattleError::InsufficientResource {
                side,
                action: kind,
                required: cost,
                available,
            });
        }
        Ok(())
    }

    fn strike(&mut self, attacker: Side, kind: ActionKind, events: &mut Vec<BattleEvent>) {
        let target = attacker.opposite();
        let atk = self.combatant(attacker).effective_atk();
        let def = self.combatant(target).effective_def();
        let (raw, minimum) = match kind {
            ActionKind::SpecialAttack => (
                roll_special_attack(atk, def, &self.config.combat, &mut self.rng),
                MIN_SPECIAL_DAMAGE,
            ),
            _ => (
                roll_basic_attack(atk, def, &self.config.combat, &mut self.rng),
                MIN_BASIC_DAMAGE,
            ),
        };
        let defended = self.is_defending(target);
        let amount = if defended {
            apply_defend(raw, minimum)
        } else {
            raw
        };

        let defender = self.combatant_mut(target);
        defender.take_damage(amount);
        let target_hp = defender.hp;
        events.push(BattleEvent::Damage {
            attacker,
            action: kind,
            raw,
            amount,
            defended,
            target_hp,
        });

        let attacker_name = self.combatant(attacker).name.clone();
        let target_name = self.combatant(target).name.clone();
        let guard = if defended { " It was guarded!" } else { "" };
        self.push_log(
            Some(attacker),
            format!("{attacker_name} used {kind} on {target_name} for {amount} damage.{guard}"),
        );
        tracing::debug!(
            attacker = attacker.name(),
            action = %kind,
            raw,
            amount,
            defended,
            target_hp,
            "attack resolved"
        );
    }

    fn heal_self(&mut self, side: Side, events: &mut Vec<BattleEvent>) {
        let fraction = self.config.combat.heal_fraction;
        let actor = self.combatant_mut(side);
        let restore = heal_amount(actor.effective_max_hp(), fraction);
        let amount = actor.heal(restore);
        let hp = actor.hp;
        let name = actor.name.clone();
        events.push(BattleEvent::Healed { side, amount, hp });
        self.push_log(Some(side), format!("{name} healed {amount} HP."));
        tracing::debug!(side = side.name(), amount, hp, "healed");
    }

    fn defend(&mut self, side: Side, events: &mut Vec<BattleEvent>) {
        self.defending[side_index(side)] = true;
        events.push(BattleEvent::Defending { side });
        let name = self.combatant(side).name.clone();
        self.push_log(Some(side), format!("{name} braces for impact."));
        tracing::debug!(side = side.name(), "defending");
    }

    // === Log ===

    fn push_log(&mut self, side: Option<Side>, message: String) {
        self.log.push(BattleLogEntry {
            round: self.round,
            side,
            message,
        });
    }

    fn record_refusal(&mut self, err: &BattleError) {
        tracing::warn!(error = %err, "action refused");
        let name = self.player.name.clone();
        match err {
            BattleError::InsufficientResource { action, .. } => {
                self.push_log(
                    Some(Side::Player),
                    format!("{name} doesn't have enough SP for {action}."),
                );
            }
            BattleError::ExhaustedItemUse => {
                self.push_log(
                    Some(Side::Player),
                    "An item has already been used this battle.".to_string(),
                );
            }
            BattleError::InvalidAction(_) => {}
        }
    }
}
