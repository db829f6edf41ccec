//! Inbound boundary: battles addressed by handle.
//!
//! The registry owns every live battle, turns handle-based requests into
//! engine calls, resolves item ids through an [`Inventory`] and flushes
//! finished battles to a [`PersistenceSink`].

#[cfg(feature = "async")]
pub mod shared;

use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::battle::{ActionResult, Battle, BattleCommit, ItemEffects, ItemRecord, PlayerAction};
use crate::combatant::Combatant;
use crate::core::config::BattleConfig;
use crate::core::error::{BattleError, ConfigError, InventoryError, PersistError};
use crate::encounter::{generate_encounter, Biome, DifficultyTier};

/// Opaque identifier of a live battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleHandle(Uuid);

impl BattleHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BattleHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BattleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of encounter to generate. Without a biome one is rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterConfig {
    pub tier: DifficultyTier,
    #[serde(default)]
    pub biome: Option<Biome>,
}

impl EncounterConfig {
    pub fn new(tier: DifficultyTier) -> Self {
        Self { tier, biome: None }
    }

    pub fn in_biome(mut self, biome: Biome) -> Self {
        self.biome = Some(biome);
        self
    }
}

/// A player action as it arrives from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionRequest {
    BasicAttack,
    Ability(usize),
    Defend,
    UseItem { item_id: String },
    Flee,
}

/// What a request needs before the engine can take it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Resolved {
    Ready(PlayerAction),
    NeedsItem(String),
}

impl ActionRequest {
    pub(crate) fn resolve(self) -> Resolved {
        match self {
            ActionRequest::BasicAttack => Resolved::Ready(PlayerAction::BasicAttack),
            ActionRequest::Ability(slot) => Resolved::Ready(PlayerAction::Ability(slot)),
            ActionRequest::Defend => Resolved::Ready(PlayerAction::Defend),
            ActionRequest::Flee => Resolved::Ready(PlayerAction::Flee),
            ActionRequest::UseItem { item_id } => Resolved::NeedsItem(item_id),
        }
    }
}

/// Item lookup consumed by the Use Item action.
pub trait Inventory {
    fn lookup(&self, item_id: &str) -> Result<ItemRecord, InventoryError>;
}

/// Receives the final player state and rewards of a finished battle.
pub trait PersistenceSink {
    fn commit(&mut self, handle: BattleHandle, record: &BattleCommit) -> Result<(), PersistError>;
}

/// Map-backed inventory for tools and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    items: HashMap<String, ItemRecord>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item_id: impl Into<String>, record: ItemRecord) {
        self.items.insert(item_id.into(), record);
    }
}

impl Inventory for InMemoryInventory {
    fn lookup(&self, item_id: &str) -> Result<ItemRecord, InventoryError> {
        self.items
            .get(item_id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(item_id.to_string()))
    }
}

/// Collects commits in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    pub commits: Vec<(BattleHandle, BattleCommit)>,
}

impl PersistenceSink for InMemorySink {
    fn commit(&mut self, handle: BattleHandle, record: &BattleCommit) -> Result<(), PersistError> {
        self.commits.push((handle, record.clone()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no battle with handle {0}")]
    UnknownBattle(BattleHandle),

    #[error("an action is already pending for battle {0}")]
    ActionPending(BattleHandle),

    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Resolves a request against one battle, looking items up through `lookup`.
///
/// The inventory is only consulted while the item use is still available.
pub(crate) fn resolve_request(
    battle: &mut Battle,
    request: ActionRequest,
    lookup: impl FnOnce(&str) -> Result<ItemRecord, InventoryError>,
) -> Result<ActionResult, SessionError> {
    let action = match request.resolve() {
        Resolved::Ready(action) => action,
        Resolved::NeedsItem(_) if !battle.item_use_available() => {
            return refuse_item_use(battle);
        }
        Resolved::NeedsItem(item_id) => PlayerAction::UseItem(lookup(&item_id)?.effects),
    };
    Ok(battle.submit(action)?)
}

/// Lets the battle reject a second item use and record it in its log.
pub(crate) fn refuse_item_use(battle: &mut Battle) -> Result<ActionResult, SessionError> {
    Ok(battle.submit(PlayerAction::UseItem(ItemEffects::default()))?)
}

/// Every live battle, keyed by handle.
pub struct BattleRegistry<I: Inventory> {
    inventory: I,
    config: BattleConfig,
    battles: HashMap<BattleHandle, Battle>,
}

impl<I: Inventory> BattleRegistry<I> {
    /// Validates `config` once; every battle started here shares it.
    pub fn new(inventory: I, config: BattleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inventory,
            config,
            battles: HashMap::new(),
        })
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    pub fn len(&self) -> usize {
        self.battles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.battles.is_empty()
    }

    /// Generates an encounter, starts the battle and returns its handle.
    pub fn start_battle(
        &mut self,
        player: Combatant,
        request: EncounterConfig,
    ) -> Result<(BattleHandle, ActionResult), SessionError> {
        self.launch(player, request, StdRng::from_entropy())
    }

    /// Same as [`start_battle`](Self::start_battle) with a fixed seed.
    pub fn start_battle_seeded(
        &mut self,
        player: Combatant,
        request: EncounterConfig,
        seed: u64,
    ) -> Result<(BattleHandle, ActionResult), SessionError> {
        self.launch(player, request, StdRng::seed_from_u64(seed))
    }

    fn launch(
        &mut self,
        player: Combatant,
        request: EncounterConfig,
        rng: StdRng,
    ) -> Result<(BattleHandle, ActionResult), SessionError> {
        let (handle, battle, result) = open_battle(player, request, &self.config, rng)?;
        self.battles.insert(handle, battle);
        Ok((handle, result))
    }

    pub fn submit_action(
        &mut self,
        handle: BattleHandle,
        request: ActionRequest,
    ) -> Result<ActionResult, SessionError> {
        let battle = self
            .battles
            .get_mut(&handle)
            .ok_or(SessionError::UnknownBattle(handle))?;
        let inventory = &self.inventory;
        resolve_request(battle, request, |id| inventory.lookup(id))
    }

    /// Human-readable log lines, oldest first.
    pub fn battle_log(&self, handle: BattleHandle) -> Result<Vec<String>, SessionError> {
        Ok(self.get(handle)?.log_messages())
    }

    pub fn battle(&self, handle: BattleHandle) -> Option<&Battle> {
        self.battles.get(&handle)
    }

    fn get(&self, handle: BattleHandle) -> Result<&Battle, SessionError> {
        self.battles
            .get(&handle)
            .ok_or(SessionError::UnknownBattle(handle))
    }

    /// Drops a battle at any point. Nothing was persisted, so nothing rolls back.
    pub fn abandon(&mut self, handle: BattleHandle) -> Result<(), SessionError> {
        self.battles
            .remove(&handle)
            .ok_or(SessionError::UnknownBattle(handle))?;
        tracing::info!(%handle, "battle abandoned");
        Ok(())
    }

    /// Flushes a finished battle to `sink` and removes it from the registry.
    ///
    /// A failed sink leaves the battle in place so the commit can be retried.
    pub fn commit(
        &mut self,
        handle: BattleHandle,
        sink: &mut impl PersistenceSink,
    ) -> Result<BattleCommit, SessionError> {
        let battle = self
            .battles
            .get_mut(&handle)
            .ok_or(SessionError::UnknownBattle(handle))?;
        let record = commit_battle(handle, battle, sink)?;
        self.battles.remove(&handle);
        Ok(record)
    }
}

pub(crate) fn open_battle(
    player: Combatant,
    request: EncounterConfig,
    config: &BattleConfig,
    mut rng: StdRng,
) -> Result<(BattleHandle, Battle, ActionResult), SessionError> {
    let encounter = generate_encounter(request.tier, request.biome, &config.encounter, &mut rng);
    let mut battle = Battle::with_checked_config(player, encounter, config.clone(), rng);
    let result = battle.start()?;
    let handle = BattleHandle::new();
    tracing::debug!(%handle, "battle registered");
    Ok((handle, battle, result))
}

pub(crate) fn commit_battle(
    handle: BattleHandle,
    battle: &mut Battle,
    sink: &mut impl PersistenceSink,
) -> Result<BattleCommit, SessionError> {
    let record = battle.pending_commit()?;
    sink.commit(handle, &record)?;
    let record = battle.take_commit()?;
    tracing::info!(%handle, outcome = record.outcome.kind.name(), "battle committed");
    Ok(record)
}
