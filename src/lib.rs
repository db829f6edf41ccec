//! PetQuest - Turn-Based Pet Battle Engine
//!
//! Generates opponents for a difficulty tier and biome, runs the battle
//! turn by turn, and turns the outcome into experience, currency and loot.
//! Rendering, persistence and inventory live outside this crate and plug in
//! through the `session` boundary.

pub mod battle;
pub mod combatant;
pub mod core;
pub mod encounter;
pub mod loot;
pub mod progression;
pub mod session;
pub mod simulator;

pub use battle::{Battle, BattleState, OutcomeKind, PlayerAction};
pub use combatant::{Combatant, Side, StatBlock};
pub use crate::core::config::BattleConfig;
pub use encounter::{generate_encounter, Biome, DifficultyTier, Encounter};
pub use session::{ActionRequest, BattleHandle, BattleRegistry, EncounterConfig};
