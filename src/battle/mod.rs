//! Battle engine: the turn state machine, its arithmetic and the opponent AI.

pub mod ai;
pub mod items;
pub mod logic;
pub mod math;
pub mod types;

pub use ai::choose_enemy_action;
pub use items::{ItemEffects, ItemRecord, Restore};
pub use logic::{roll_rewards, Battle};
pub use types::*;
