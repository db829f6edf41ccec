//! Simulation report generation.

use serde::Serialize;

use crate::battle::{BattleOutcome, OutcomeKind};
use crate::encounter::DifficultyTier;
use crate::loot::LootRarity;

/// Counters for every battle fought at one tier.
#[derive(Debug, Clone, Serialize)]
pub struct TierStats {
    pub tier: DifficultyTier,
    pub victories: u32,
    pub defeats: u32,
    pub escapes: u32,
    /// Battles abandoned at the round limit
    pub unfinished: u32,
    pub total_rounds: u64,
    /// Indexed like `LootRarity::ALL`
    pub loot_by_rarity: [u64; 4],
    pub total_experience: u64,
    pub total_currency: u64,
    pub levels_gained: u64,
    pub final_level: u32,
}

impl TierStats {
    pub fn new(tier: DifficultyTier) -> Self {
        Self {
            tier,
            victories: 0,
            defeats: 0,
            escapes: 0,
            unfinished: 0,
            total_rounds: 0,
            loot_by_rarity: [0; 4],
            total_experience: 0,
            total_currency: 0,
            levels_gained: 0,
            final_level: 1,
        }
    }

    pub fn record(&mut self, outcome: &BattleOutcome, rounds: u32) {
        match outcome.kind {
            OutcomeKind::Victory => self.victories += 1,
            OutcomeKind::Defeat => self.defeats += 1,
            OutcomeKind::Escape => self.escapes += 1,
        }
        self.total_rounds += rounds as u64;
        for item in &outcome.loot {
            self.loot_by_rarity[item.rarity as usize] += 1;
        }
        self.total_experience += outcome.experience_gained;
        self.total_currency += outcome.currency_gained;
        self.levels_gained += outcome.level_up.levels_gained as u64;
    }

    pub fn finished(&self) -> u32 {
        self.victories + self.defeats + self.escapes
    }

    pub fn battles(&self) -> u32 {
        self.finished() + self.unfinished
    }

    fn rate(&self, count: u32) -> f64 {
        count as f64 / self.battles().max(1) as f64
    }

    pub fn win_rate(&self) -> f64 {
        self.rate(self.victories)
    }

    pub fn defeat_rate(&self) -> f64 {
        self.rate(self.defeats)
    }

    pub fn escape_rate(&self) -> f64 {
        self.rate(self.escapes)
    }

    pub fn avg_rounds(&self) -> f64 {
        self.total_rounds as f64 / self.finished().max(1) as f64
    }

    /// Average items per victory.
    pub fn loot_per_victory(&self) -> f64 {
        self.loot_by_rarity.iter().sum::<u64>() as f64 / self.victories.max(1) as f64
    }
}

/// Aggregated results from a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub tiers: Vec<TierStats>,
}

impl SimReport {
    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    BATTLE SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str("── OUTCOMES ─────────────────────────────────────────────────────\n");
        report.push_str("  Tier      Battles   Win%    Loss%   Flee%   Rounds\n");
        report.push_str("  ────      ───────   ────    ─────   ─────   ──────\n");
        for t in &self.tiers {
            report.push_str(&format!(
                "  {:<8}  {:7}   {:5.1}   {:5.1}   {:5.1}   {:6.1}\n",
                t.tier.name(),
                t.battles(),
                t.win_rate() * 100.0,
                t.defeat_rate() * 100.0,
                t.escape_rate() * 100.0,
                t.avg_rounds()
            ));
        }
        report.push('\n');

        report.push_str("── LOOT ─────────────────────────────────────────────────────────\n");
        for t in &self.tiers {
            let by_rarity: Vec<String> = LootRarity::ALL
                .iter()
                .zip(t.loot_by_rarity.iter())
                .map(|(rarity, count)| format!("{} {}", rarity.name(), count))
                .collect();
            report.push_str(&format!(
                "  {:<8}  {:.2}/win  {}\n",
                t.tier.name(),
                t.loot_per_victory(),
                by_rarity.join(", ")
            ));
        }
        report.push('\n');

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        for t in &self.tiers {
            report.push_str(&format!(
                "  {:<8}  XP {:>8}  Coins {:>7}  Levels +{:<4} Final L{}\n",
                t.tier.name(),
                t.total_experience,
                t.total_currency,
                t.levels_gained,
                t.final_level
            ));
        }

        let stuck: Vec<&TierStats> = self.tiers.iter().filter(|t| t.unfinished > 0).collect();
        if !stuck.is_empty() {
            report.push('\n');
            for t in stuck {
                report.push_str(&format!(
                    "  ⚠️  {} battles at {} hit the round limit\n",
                    t.unfinished,
                    t.tier.name()
                ));
            }
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
