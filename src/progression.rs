//! Experience and level-up resolution.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::core::config::ProgressionTuning;
use crate::core::constants::XP_CURVE_BASE;

/// XP needed to advance from `level`: level² × 100.
pub fn xp_threshold(level: u32) -> u64 {
    let level = level as u64;
    level * level * XP_CURVE_BASE
}

/// Stat gains accumulated across one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatGrowth {
    pub atk: u32,
    pub def: u32,
    pub max_hp: u32,
    pub max_sp: u32,
}

impl StatGrowth {
    fn add(&mut self, other: StatGrowth) {
        self.atk += other.atk;
        self.def += other.def;
        self.max_hp += other.max_hp;
        self.max_sp += other.max_sp;
    }
}

/// What a resolution pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpSummary {
    pub levels_gained: u32,
    pub from_level: u32,
    pub to_level: u32,
    pub growth: StatGrowth,
}

impl LevelUpSummary {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

fn roll_inclusive(range: (u32, u32), rng: &mut impl Rng) -> u32 {
    rng.gen_range(range.0..=range.1)
}

/// Rolls one level's worth of stat growth.
pub fn roll_growth(tuning: &ProgressionTuning, rng: &mut impl Rng) -> StatGrowth {
    StatGrowth {
        atk: roll_inclusive(tuning.atk_growth, rng),
        def: roll_inclusive(tuning.def_growth, rng),
        max_hp: roll_inclusive(tuning.max_hp_growth, rng),
        max_sp: roll_inclusive(tuning.max_sp_growth, rng),
    }
}

/// Spends banked experience on as many level-ups as it covers.
///
/// Any level-up fully restores HP and SP to the new maximums.
pub fn resolve_level_ups(
    combatant: &mut Combatant,
    tuning: &ProgressionTuning,
    rng: &mut impl Rng,
) -> LevelUpSummary {
    // Level 0 would have a zero threshold and never terminate
    combatant.level = combatant.level.max(1);
    let mut summary = LevelUpSummary {
        from_level: combatant.level,
        to_level: combatant.level,
        ..Default::default()
    };

    loop {
        let needed = xp_threshold(combatant.level);
        if combatant.experience < needed {
            break;
        }
        combatant.experience -= needed;
        combatant.level += 1;

        let growth = roll_growth(tuning, rng);
        combatant.atk += growth.atk;
        combatant.def += growth.def;
        combatant.max_hp += growth.max_hp;
        combatant.max_sp += growth.max_sp;
        summary.growth.add(growth);
        summary.levels_gained += 1;
    }

    summary.to_level = combatant.level;
    if summary.leveled_up() {
        combatant.restore_full();
        tracing::info!(
            name = %combatant.name,
            from = summary.from_level,
            to = summary.to_level,
            atk = summary.growth.atk,
            def = summary.growth.def,
            max_hp = summary.growth.max_hp,
            max_sp = summary.growth.max_sp,
            "level up"
        );
    }

    assert!(
        combatant.experience < xp_threshold(combatant.level),
        "unresolved experience after level-up pass"
    );
    summary
}

/// Adds experience and resolves any resulting level-ups.
pub fn apply_experience(
    combatant: &mut Combatant,
    xp: u64,
    tuning: &ProgressionTuning,
    rng: &mut impl Rng,
) -> LevelUpSummary {
    combatant.experience += xp;
    resolve_level_ups(combatant, tuning, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::StatBlock;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pet(level: u32, experience: u64) -> Combatant {
        Combatant::new(
            "Mochi",
            "pet_mochi",
            StatBlock {
                hp: 100,
                sp: 50,
                atk: 20,
                def: 10,
            },
        )
        .with_level(level, experience)
    }

    #[test]
    fn test_xp_threshold_curve() {
        assert_eq!(xp_threshold(1), 100);
        assert_eq!(xp_threshold(2), 400);
        assert_eq!(xp_threshold(3), 900);
        assert_eq!(xp_threshold(10), 10_000);
    }

    #[test]
    fn test_single_level_up() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut c = pet(1, 250);
        let summary = resolve_level_ups(&mut c, &ProgressionTuning::default(), &mut rng);
        assert_eq!(c.level, 2);
        assert_eq!(c.experience, 150);
        assert_eq!(summary.levels_gained, 1);
        assert_eq!(summary.from_level, 1);
        assert_eq!(summary.to_level, 2);
    }

    #[test]
    fn test_growth_within_ranges() {
        let tuning = ProgressionTuning::default();
        let mut rng = StdRng::seed_from_u64(22);
        for _ in 0..500 {
            let g = roll_growth(&tuning, &mut rng);
            assert!((1..=5).contains(&g.atk));
            assert!((1..=5).contains(&g.def));
            assert!((10..=29).contains(&g.max_hp));
            assert!((5..=14).contains(&g.max_sp));
        }
    }

    #[test]
    fn test_level_up_restores_pools() {
        let mut rng = StdRng::seed_from_u64(23);
        let mut c = pet(1, 0);
        c.hp = 3;
        c.sp = 0;
        let summary = apply_experience(&mut c, 100, &ProgressionTuning::default(), &mut rng);
        assert!(summary.leveled_up());
        assert_eq!(c.hp, c.max_hp);
        assert_eq!(c.sp, c.max_sp);
        assert_eq!(c.max_hp, 100 + summary.growth.max_hp);
        assert_eq!(c.atk, 20 + summary.growth.atk);
    }

    #[test]
    fn test_no_level_up_leaves_pools() {
        let mut rng = StdRng::seed_from_u64(24);
        let mut c = pet(2, 0);
        c.hp = 40;
        let summary = apply_experience(&mut c, 399, &ProgressionTuning::default(), &mut rng);
        assert!(!summary.leveled_up());
        assert_eq!(c.hp, 40);
        assert_eq!(c.experience, 399);
        assert_eq!(summary.growth, StatGrowth::default());
    }
}
