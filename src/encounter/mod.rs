//! Encounter generation: biome content, opponent archetypes and scaling.

pub mod data;
pub mod generation;
pub mod types;

pub use data::*;
pub use generation::*;
pub use types::*;
