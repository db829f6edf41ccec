//! Reward generation: slot counts, drop chances and rarity tables.

pub mod drops;
pub mod types;

pub use drops::*;
pub use types::*;
