use serde::{Deserialize, Serialize};

use crate::combatant::{Combatant, StatBlock};
use crate::core::constants::{MAX_TIER, MIN_TIER};
use crate::core::error::EncounterError;

/// Difficulty tier, 1 (Easy) through 4 (Expert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DifficultyTier(u8);

impl DifficultyTier {
    pub const EASY: DifficultyTier = DifficultyTier(1);
    pub const NORMAL: DifficultyTier = DifficultyTier(2);
    pub const HARD: DifficultyTier = DifficultyTier(3);
    pub const EXPERT: DifficultyTier = DifficultyTier(4);

    pub const ALL: [DifficultyTier; 4] = [Self::EASY, Self::NORMAL, Self::HARD, Self::EXPERT];

    pub fn new(tier: u8) -> Result<Self, EncounterError> {
        if (MIN_TIER..=MAX_TIER).contains(&tier) {
            Ok(Self(tier))
        } else {
            Err(EncounterError::InvalidTier(tier))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Zero-based index into per-tier tables.
    pub fn index(&self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn name(&self) -> &'static str {
        match self.0 {
            1 => "Easy",
            2 => "Normal",
            3 => "Hard",
            _ => "Expert",
        }
    }
}

impl TryFrom<u8> for DifficultyTier {
    type Error = EncounterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DifficultyTier> for u8 {
    fn from(tier: DifficultyTier) -> u8 {
        tier.0
    }
}

/// Thematic region selecting opponent archetypes and ability flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Forest,
    Ice,
    Desert,
    Volcano,
    Ocean,
}

impl Biome {
    pub const ALL: [Biome; 5] = [
        Biome::Forest,
        Biome::Ice,
        Biome::Desert,
        Biome::Volcano,
        Biome::Ocean,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Biome::Forest => "Forest",
            Biome::Ice => "Ice",
            Biome::Desert => "Desert",
            Biome::Volcano => "Volcano",
            Biome::Ocean => "Ocean",
        }
    }
}

/// Ability families used to keep drawn abilities varied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityCategory {
    Offensive,
    Defensive,
    Status,
    Support,
}

/// An ability an opponent may be generated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ability {
    pub id: &'static str,
    pub name: &'static str,
    pub category: AbilityCategory,
}

/// Opponent template for a biome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Archetype {
    pub name: &'static str,
    pub sprite_key: &'static str,
    pub base: StatBlock,
}

/// One generated battle request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub tier: DifficultyTier,
    pub biome: Biome,
    pub opponent: Combatant,
}

impl Encounter {
    pub fn new(tier: DifficultyTier, biome: Biome, opponent: Combatant) -> Self {
        Self {
            tier,
            biome,
            opponent,
        }
    }
}
