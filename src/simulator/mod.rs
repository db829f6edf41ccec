//! Headless battle balance simulator.
//!
//! Runs scripted battles per difficulty tier through the real `Battle`
//! state machine and aggregates:
//! - Victory, defeat and escape rates
//! - Average battle length in rounds
//! - Loot counts by rarity
//! - Experience, currency and levels gained

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{SimReport, TierStats};
pub use runner::{choose_player_action, fight, run_simulation};
