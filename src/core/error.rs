//! Error types for the battle engine and its boundaries.
//!
//! Battle rejections are local and synchronous: the battle state is left
//! untouched and the caller decides what to submit next.

use crate::battle::ActionKind;
use crate::combatant::Side;
use thiserror::Error;

/// How a caller should treat a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// The same battle can continue with a different action.
    Recoverable,
    /// The request broke the engine's contract and should not be retried as-is.
    Validation,
}

/// Contract violations reported by the battle state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAction {
    #[error("battle has not started")]
    NotStarted,

    #[error("battle has already started")]
    AlreadyStarted,

    #[error("battle has already ended")]
    BattleEnded,

    #[error("it is not the player's turn")]
    NotPlayersTurn,

    #[error("ability slot {0} does not exist")]
    UnknownAbility(usize),
}

/// Rejections from `Battle::submit`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("{side:?} needs {required} SP for {action} but has {available}")]
    InsufficientResource {
        side: Side,
        action: ActionKind,
        required: u32,
        available: u32,
    },

    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),

    #[error("the item use for this battle has already been spent")]
    ExhaustedItemUse,
}

impl BattleError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientResource { .. } | Self::ExhaustedItemUse => {
                ErrorSeverity::Recoverable
            }
            Self::InvalidAction(_) => ErrorSeverity::Validation,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.severity() == ErrorSeverity::Recoverable
    }
}

/// Encounter requests outside the supported content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncounterError {
    #[error("difficulty tier {0} is outside 1..=4")]
    InvalidTier(u8),
}

/// Failures from the inventory lookup used by the Use Item action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("item {0:?} is not in the inventory")]
    NotFound(String),

    #[error("inventory backend failed: {0}")]
    Backend(String),
}

/// Failures while committing a finished battle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    #[error("battle has not ended")]
    NotEnded,

    #[error("battle outcome was already committed")]
    AlreadyCommitted,

    #[error("persistence backend failed: {0}")]
    Backend(String),
}

/// Failures while loading tuning data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
