use rand::Rng;

use super::types::{LootRarity, LootRequest, LootType};
use crate::core::config::LootTuning;
use crate::encounter::DifficultyTier;

/// Number of independent drop rolls for a tier.
pub fn roll_slot_count(tier: DifficultyTier, rng: &mut impl Rng) -> u32 {
    match tier.value() {
        1 => 1,
        2 => rng.gen_range(1..=2),
        3 => 2,
        _ => rng.gen_range(2..=3),
    }
}

/// Per-slot drop chance: `min(max, base + level * per_level + tier * per_tier)`.
pub fn drop_chance(tier: DifficultyTier, opponent_level: u32, tuning: &LootTuning) -> f64 {
    let chance = tuning.base_drop_chance
        + opponent_level as f64 * tuning.drop_per_level
        + tier.value() as f64 * tuning.drop_per_tier;
    chance.min(tuning.max_drop_chance)
}

/// Rolls a rarity from the tier's weight row.
pub fn roll_rarity(tier: DifficultyTier, tuning: &LootTuning, rng: &mut impl Rng) -> LootRarity {
    let weights = tuning.rarity_weights[tier.index()];
    let total: u32 = weights.iter().sum();
    if total == 0 {
        return LootRarity::Common;
    }

    let mut roll = rng.gen_range(0..total);
    for (rarity, weight) in LootRarity::ALL.iter().zip(weights) {
        if roll < weight {
            return *rarity;
        }
        roll -= weight;
    }
    LootRarity::Common
}

pub fn roll_loot_type(rng: &mut impl Rng) -> LootType {
    LootType::DROPPABLE[rng.gen_range(0..LootType::DROPPABLE.len())]
}

/// Rolls every slot independently. Zero or all slots may drop.
pub fn generate_loot(
    tier: DifficultyTier,
    opponent_level: u32,
    tuning: &LootTuning,
    rng: &mut impl Rng,
) -> Vec<LootRequest> {
    let slots = roll_slot_count(tier, rng);
    let chance = drop_chance(tier, opponent_level, tuning);
    let mut loot = Vec::new();

    for _ in 0..slots {
        if rng.gen::<f64>() >= chance {
            continue;
        }
        let item_type = roll_loot_type(rng);
        let rarity = roll_rarity(tier, tuning, rng);
        loot.push(LootRequest { item_type, rarity });
    }

    tracing::debug!(
        tier = tier.value(),
        opponent_level,
        slots,
        chance,
        dropped = loot.len(),
        "rolled loot"
    );

    loot
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_slot_counts_per_tier() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            assert_eq!(roll_slot_count(DifficultyTier::EASY, &mut rng), 1);
            assert_eq!(roll_slot_count(DifficultyTier::HARD, &mut rng), 2);
            let normal = roll_slot_count(DifficultyTier::NORMAL, &mut rng);
            assert!((1..=2).contains(&normal));
            let expert = roll_slot_count(DifficultyTier::EXPERT, &mut rng);
            assert!((2..=3).contains(&expert));
        }
    }

    #[test]
    fn test_drop_chance_formula() {
        let tuning = LootTuning::default();
        // 0.4 + 0.05 + 0.1
        assert!((drop_chance(DifficultyTier::EASY, 1, &tuning) - 0.55).abs() < 1e-9);
        // 0.4 + 0.15 + 0.3
        assert!((drop_chance(DifficultyTier::HARD, 3, &tuning) - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_drop_chance_capped() {
        let tuning = LootTuning::default();
        assert!((drop_chance(DifficultyTier::EXPERT, 50, &tuning) - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_low_tiers_never_legendary() {
        let tuning = LootTuning::default();
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..5000 {
            assert_ne!(roll_rarity(DifficultyTier::EASY, &tuning, &mut rng), LootRarity::Legendary);
            assert_ne!(
                roll_rarity(DifficultyTier::NORMAL, &tuning, &mut rng),
                LootRarity::Legendary
            );
        }
    }

    #[test]
    fn test_higher_tiers_shift_toward_rare() {
        let tuning = LootTuning::default();
        let mut rng = StdRng::seed_from_u64(13);
        let trials = 10_000;
        let mut common_easy = 0;
        let mut common_expert = 0;
        let mut legendary_expert = 0;
        for _ in 0..trials {
            if roll_rarity(DifficultyTier::EASY, &tuning, &mut rng) == LootRarity::Common {
                common_easy += 1;
            }
            match roll_rarity(DifficultyTier::EXPERT, &tuning, &mut rng) {
                LootRarity::Common => common_expert += 1,
                LootRarity::Legendary => legendary_expert += 1,
                _ => {}
            }
        }
        assert!(common_expert < common_easy, "easy={common_easy} expert={common_expert}");
        assert!(legendary_expert > 800, "expected ~13% legendary, got {legendary_expert}");
    }

    #[test]
    fn test_loot_types_cover_droppable_set() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(roll_loot_type(&mut rng));
        }
        assert_eq!(seen.len(), 3);
        assert!(!seen.contains(&LootType::Toy));
    }

    #[test]
    fn test_generate_loot_never_exceeds_slots() {
        let tuning = LootTuning::default();
        let mut rng = StdRng::seed_from_u64(15);
        for _ in 0..500 {
            assert!(generate_loot(DifficultyTier::EASY, 1, &tuning, &mut rng).len() <= 1);
            assert!(generate_loot(DifficultyTier::HARD, 3, &tuning, &mut rng).len() <= 2);
            assert!(generate_loot(DifficultyTier::EXPERT, 4, &tuning, &mut rng).len() <= 3);
        }
    }

    #[test]
    fn test_zero_chance_drops_nothing() {
        let tuning = LootTuning {
            base_drop_chance: 0.0,
            drop_per_level: 0.0,
            drop_per_tier: 0.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(16);
        for _ in 0..100 {
            assert!(generate_loot(DifficultyTier::EXPERT, 10, &tuning, &mut rng).is_empty());
        }
    }

    #[test]
    fn test_tier_one_drop_rate_matches_chance() {
        let tuning = LootTuning::default();
        let mut rng = StdRng::seed_from_u64(17);
        let trials = 4000;
        let drops: usize = (0..trials)
            .map(|_| generate_loot(DifficultyTier::EASY, 1, &tuning, &mut rng).len())
            .sum();
        // One slot at 55%
        assert!(drops > 2000 && drops < 2400, "got {drops}/{trials}");
    }
}
