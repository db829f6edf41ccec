use serde::{Deserialize, Serialize};
use std::fmt;

use super::items::ItemEffects;
use crate::combatant::{Combatant, Side};
use crate::loot::LootRequest;
use crate::progression::LevelUpSummary;

/// Every kind of turn a combatant can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    BasicAttack,
    SpecialAttack,
    HealSelf,
    Defend,
    UseItem,
    Flee,
    Skip,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::BasicAttack => "Basic Attack",
            ActionKind::SpecialAttack => "Special Attack",
            ActionKind::HealSelf => "Heal Self",
            ActionKind::Defend => "Defend",
            ActionKind::UseItem => "Use Item",
            ActionKind::Flee => "Flee",
            ActionKind::Skip => "Skip",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Universal ability slots every combatant has.
pub const SPECIAL_ATTACK_SLOT: usize = 0;
pub const HEAL_SELF_SLOT: usize = 1;

/// Maps an ability slot to its action. Unknown slots return `None`.
pub fn ability_slot_action(slot: usize) -> Option<ActionKind> {
    match slot {
        SPECIAL_ATTACK_SLOT => Some(ActionKind::SpecialAttack),
        HEAL_SELF_SLOT => Some(ActionKind::HealSelf),
        _ => None,
    }
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Victory,
    Defeat,
    Escape,
}

impl OutcomeKind {
    pub fn name(&self) -> &'static str {
        match self {
            OutcomeKind::Victory => "Victory",
            OutcomeKind::Defeat => "Defeat",
            OutcomeKind::Escape => "Escape",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleState {
    NotStarted,
    InProgress { turn_owner: Side },
    Ended(OutcomeKind),
}

impl BattleState {
    pub fn is_ended(&self) -> bool {
        matches!(self, BattleState::Ended(_))
    }
}

/// An action requested by the player's side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    BasicAttack,
    /// Universal ability slot: 0 is Special Attack, 1 is Heal Self.
    Ability(usize),
    Defend,
    /// An item whose effects were already resolved by the inventory boundary.
    UseItem(ItemEffects),
    Flee,
}

/// The opponent AI's decision for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyAction {
    SpecialAttack,
    BasicAttack,
    Defend,
    Skip,
}

impl EnemyAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            EnemyAction::SpecialAttack => ActionKind::SpecialAttack,
            EnemyAction::BasicAttack => ActionKind::BasicAttack,
            EnemyAction::Defend => ActionKind::Defend,
            EnemyAction::Skip => ActionKind::Skip,
        }
    }
}

/// Something that happened while resolving an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    TurnStarted {
        side: Side,
        round: u32,
    },
    Damage {
        attacker: Side,
        action: ActionKind,
        /// Damage before the defend stance was applied.
        raw: u32,
        amount: u32,
        defended: bool,
        target_hp: u32,
    },
    Healed {
        side: Side,
        amount: u32,
        hp: u32,
    },
    Defending {
        side: Side,
    },
    ItemUsed {
        hp_restored: u32,
        sp_restored: u32,
    },
    FleeFailed,
    Fled,
    TurnSkipped {
        side: Side,
    },
    Ended(OutcomeKind),
}

/// Payload handed to the presentation layer once a battle ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub kind: OutcomeKind,
    pub experience_gained: u64,
    pub currency_gained: u64,
    pub loot: Vec<LootRequest>,
    pub level_up: LevelUpSummary,
}

/// Result of `Battle::start` or `Battle::submit`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub events: Vec<BattleEvent>,
    pub state: BattleState,
    pub outcome: Option<BattleOutcome>,
}

/// What a finished battle hands to persistence: the player's final state
/// and the rewards to grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleCommit {
    pub player: Combatant,
    pub outcome: BattleOutcome,
}

/// One line in the battle log shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleLogEntry {
    pub round: u32,
    pub side: Option<Side>,
    pub message: String,
}
