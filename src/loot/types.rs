use serde::{Deserialize, Serialize};

/// Broad item family. The persistence boundary maps it to a concrete item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LootType {
    Medicine,
    Equipment,
    Food,
    Toy,
}

impl LootType {
    /// Types the drop table rolls from. Toys only come from the shop.
    pub const DROPPABLE: [LootType; 3] = [LootType::Medicine, LootType::Equipment, LootType::Food];

    pub fn name(&self) -> &'static str {
        match self {
            LootType::Medicine => "Medicine",
            LootType::Equipment => "Equipment",
            LootType::Food => "Food",
            LootType::Toy => "Toy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LootRarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Legendary = 3,
}

impl LootRarity {
    pub const ALL: [LootRarity; 4] = [
        LootRarity::Common,
        LootRarity::Uncommon,
        LootRarity::Rare,
        LootRarity::Legendary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LootRarity::Common => "Common",
            LootRarity::Uncommon => "Uncommon",
            LootRarity::Rare => "Rare",
            LootRarity::Legendary => "Legendary",
        }
    }
}

/// A reward request, not an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootRequest {
    pub item_type: LootType,
    pub rarity: LootRarity,
}
