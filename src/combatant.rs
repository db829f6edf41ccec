//! Combatant model shared by the player's pet and generated opponents.
//!
//! Base values are what persists. Buffs are layered on top for every
//! combat calculation and never written into the base fields.

use serde::{Deserialize, Serialize};

/// Which side of a battle a combatant fights on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Opponent => "Opponent",
        }
    }
}

/// Stats that buffs can modify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Hp,
    Sp,
    Atk,
    Def,
}

/// A plain block of base values used for archetypes and construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub hp: u32,
    pub sp: u32,
    pub atk: u32,
    pub def: u32,
}

/// Additive modifiers. Negative values are debuffs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifiers {
    #[serde(default)]
    pub hp: i32,
    #[serde(default)]
    pub sp: i32,
    #[serde(default)]
    pub atk: i32,
    #[serde(default)]
    pub def: i32,
}

impl StatModifiers {
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Sp => self.sp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
        }
    }
}

/// Temporary modifiers with an external expiry.
///
/// `expires_at` is a unix timestamp owned by the session layer. The battle
/// engine takes a snapshot at battle start and never looks at the clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBuffs {
    #[serde(default)]
    pub stats: StatModifiers,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl ActiveBuffs {
    pub fn new(stats: StatModifiers, expires_at: Option<i64>) -> Self {
        Self { stats, expires_at }
    }

    /// For the session layer: whether these buffs have lapsed at `now`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// A participant in battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    /// Opaque asset/lookup key.
    pub key: String,
    pub hp: u32,
    pub max_hp: u32,
    pub sp: u32,
    pub max_sp: u32,
    pub atk: u32,
    pub def: u32,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub active_buffs: ActiveBuffs,
    pub level: u32,
    pub experience: u64,
}

fn apply_modifier(base: u32, modifier: i32) -> u32 {
    (base as i64 + modifier as i64).max(0) as u32
}

impl Combatant {
    /// Creates a level 1 combatant at full HP and SP.
    pub fn new(name: impl Into<String>, key: impl Into<String>, stats: StatBlock) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            hp: stats.hp,
            max_hp: stats.hp,
            sp: stats.sp,
            max_sp: stats.sp,
            atk: stats.atk,
            def: stats.def,
            abilities: Vec::new(),
            active_buffs: ActiveBuffs::default(),
            level: 1,
            experience: 0,
        }
    }

    pub fn with_level(mut self, level: u32, experience: u64) -> Self {
        self.level = level.max(1);
        self.experience = experience;
        self
    }

    pub fn with_buffs(mut self, buffs: ActiveBuffs) -> Self {
        self.active_buffs = buffs;
        self
    }

    pub fn with_abilities(mut self, abilities: Vec<String>) -> Self {
        self.abilities = abilities;
        self
    }

    /// Base value plus buff for `stat`. Hp and Sp refer to the pool maximums.
    pub fn effective(&self, stat: Stat) -> u32 {
        let base = match stat {
            Stat::Hp => self.max_hp,
            Stat::Sp => self.max_sp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
        };
        apply_modifier(base, self.active_buffs.stats.get(stat))
    }

    pub fn effective_atk(&self) -> u32 {
        self.effective(Stat::Atk)
    }

    pub fn effective_def(&self) -> u32 {
        self.effective(Stat::Def)
    }

    pub fn effective_max_hp(&self) -> u32 {
        self.effective(Stat::Hp)
    }

    pub fn effective_max_sp(&self) -> u32 {
        self.effective(Stat::Sp)
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.sp >= cost
    }

    /// Deducts `cost` SP. Returns false and leaves SP untouched if short.
    pub fn spend_sp(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.sp -= cost;
        true
    }

    /// Applies damage, clamping HP at 0. Returns HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Restores HP up to the effective maximum. Returns HP actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let cap = self.effective_max_hp();
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(cap).max(before);
        self.check_invariants();
        self.hp - before
    }

    /// Restores SP up to the effective maximum. Returns SP actually gained.
    pub fn restore_sp(&mut self, amount: u32) -> u32 {
        let cap = self.effective_max_sp();
        let before = self.sp;
        self.sp = self.sp.saturating_add(amount).min(cap).max(before);
        self.check_invariants();
        self.sp - before
    }

    /// Sets both pools to their effective maximums.
    pub fn restore_full(&mut self) {
        self.hp = self.effective_max_hp();
        self.sp = self.effective_max_sp();
    }

    /// Pulls both pools down to their effective maximums. A debuff applied
    /// outside battle can leave a stored pool above what the buffs allow.
    pub fn clamp_pools(&mut self) {
        self.hp = self.hp.min(self.effective_max_hp());
        self.sp = self.sp.min(self.effective_max_sp());
    }

    /// Panics if a pool has escaped its bounds. Reaching this is an engine bug.
    pub fn check_invariants(&self) {
        assert!(
            self.hp <= self.effective_max_hp(),
            "{}: hp {} exceeds effective max {}",
            self.name,
            self.hp,
            self.effective_max_hp()
        );
        assert!(
            self.sp <= self.effective_max_sp(),
            "{}: sp {} exceeds effective max {}",
            self.name,
            self.sp,
            self.effective_max_sp()
        );
    }
}
