//! Biome content tables: opponent archetypes and ability pools.

use super::types::{Ability, AbilityCategory, Archetype, Biome};
use crate::combatant::StatBlock;

const fn ability(id: &'static str, name: &'static str, category: AbilityCategory) -> Ability {
    Ability { id, name, category }
}

/// Abilities any biome can roll.
pub const NEUTRAL_ABILITIES: &[Ability] = &[
    ability("tackle", "Tackle", AbilityCategory::Offensive),
    ability("harden", "Harden", AbilityCategory::Defensive),
    ability("growl", "Growl", AbilityCategory::Status),
    ability("rest", "Rest", AbilityCategory::Support),
];

const FOREST_ABILITIES: &[Ability] = &[
    ability("vine_lash", "Vine Lash", AbilityCategory::Offensive),
    ability("bark_skin", "Bark Skin", AbilityCategory::Defensive),
    ability("spore_cloud", "Spore Cloud", AbilityCategory::Status),
    ability("photosynthesis", "Photosynthesis", AbilityCategory::Support),
];

const ICE_ABILITIES: &[Ability] = &[
    ability("frost_bite", "Frost Bite", AbilityCategory::Offensive),
    ability("ice_wall", "Ice Wall", AbilityCategory::Defensive),
    ability("deep_freeze", "Deep Freeze", AbilityCategory::Status),
];

const DESERT_ABILITIES: &[Ability] = &[
    ability("sand_blast", "Sand Blast", AbilityCategory::Offensive),
    ability("burrow", "Burrow", AbilityCategory::Defensive),
    ability("mirage", "Mirage", AbilityCategory::Status),
    ability("oasis", "Oasis", AbilityCategory::Support),
];

const VOLCANO_ABILITIES: &[Ability] = &[
    ability("magma_fist", "Magma Fist", AbilityCategory::Offensive),
    ability("ember_storm", "Ember Storm", AbilityCategory::Offensive),
    ability("obsidian_shell", "Obsidian Shell", AbilityCategory::Defensive),
    ability("scorch", "Scorch", AbilityCategory::Status),
];

const OCEAN_ABILITIES: &[Ability] = &[
    ability("tidal_slam", "Tidal Slam", AbilityCategory::Offensive),
    ability("bubble_shield", "Bubble Shield", AbilityCategory::Defensive),
    ability("ink_spray", "Ink Spray", AbilityCategory::Status),
    ability("soothing_wave", "Soothing Wave", AbilityCategory::Support),
];

const fn archetype(name: &'static str, sprite_key: &'static str, hp: u32, sp: u32, atk: u32, def: u32) -> Archetype {
    Archetype {
        name,
        sprite_key,
        base: StatBlock { hp, sp, atk, def },
    }
}

const FOREST_ARCHETYPES: &[Archetype] = &[
    archetype("Mossback Boar", "enemy_forest_boar", 80, 30, 15, 8),
    archetype("Thornling", "enemy_forest_thornling", 65, 40, 17, 6),
];

const ICE_ARCHETYPES: &[Archetype] = &[archetype("Frost Fox", "enemy_ice_fox", 75, 35, 16, 9)];

const DESERT_ARCHETYPES: &[Archetype] = &[
    archetype("Dune Scorpion", "enemy_desert_scorpion", 70, 30, 18, 7),
];

const VOLCANO_ARCHETYPES: &[Archetype] = &[
    archetype("Cinder Salamander", "enemy_volcano_salamander", 85, 30, 19, 6),
];

const OCEAN_ARCHETYPES: &[Archetype] = &[
    archetype("Reef Crab", "enemy_ocean_crab", 90, 25, 13, 12),
    archetype("Glimmer Eel", "enemy_ocean_eel", 60, 45, 18, 5),
];

/// Opponent archetypes available in a biome. Never empty.
pub fn biome_archetypes(biome: Biome) -> &'static [Archetype] {
    match biome {
        Biome::Forest => FOREST_ARCHETYPES,
        Biome::Ice => ICE_ARCHETYPES,
        Biome::Desert => DESERT_ARCHETYPES,
        Biome::Volcano => VOLCANO_ARCHETYPES,
        Biome::Ocean => OCEAN_ARCHETYPES,
    }
}

/// Biome-flavored ability pool. Never empty.
pub fn biome_abilities(biome: Biome) -> &'static [Ability] {
    match biome {
        Biome::Forest => FOREST_ABILITIES,
        Biome::Ice => ICE_ABILITIES,
        Biome::Desert => DESERT_ABILITIES,
        Biome::Volcano => VOLCANO_ABILITIES,
        Biome::Ocean => OCEAN_ABILITIES,
    }
}

/// Looks up any ability by id across all pools.
pub fn find_ability(id: &str) -> Option<&'static Ability> {
    NEUTRAL_ABILITIES
        .iter()
        .chain(Biome::ALL.iter().flat_map(|b| biome_abilities(*b).iter()))
        .find(|a| a.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_biome_has_content() {
        for biome in Biome::ALL {
            assert!(!biome_archetypes(biome).is_empty(), "{:?}", biome);
            assert!(!biome_abilities(biome).is_empty(), "{:?}", biome);
        }
    }

    #[test]
    fn test_ability_ids_unique() {
        let mut seen = HashSet::new();
        for a in NEUTRAL_ABILITIES
            .iter()
            .chain(Biome::ALL.iter().flat_map(|b| biome_abilities(*b).iter()))
        {
            assert!(seen.insert(a.id), "duplicate ability id {}", a.id);
        }
    }

    #[test]
    fn test_find_ability() {
        assert_eq!(find_ability("ice_wall").unwrap().name, "Ice Wall");
        assert_eq!(
            find_ability("rest").unwrap().category,
            AbilityCategory::Support
        );
        assert!(find_ability("nonexistent").is_none());
    }
}
