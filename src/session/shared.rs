//! Registry shared across async tasks.
//!
//! Each battle sits behind its own `tokio::sync::Mutex`. The guard is held
//! for the whole action, including the awaited inventory lookup, so two
//! submissions for one battle can never interleave.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{Mutex, RwLock};

use super::{
    commit_battle, open_battle, refuse_item_use, ActionRequest, BattleHandle, EncounterConfig,
    InMemoryInventory, Inventory, PersistenceSink, Resolved, SessionError,
};
use crate::battle::{ActionResult, Battle, BattleCommit, ItemRecord, PlayerAction};
use crate::combatant::Combatant;
use crate::core::config::BattleConfig;
use crate::core::error::{ConfigError, InventoryError};

/// Inventory lookup that may wait on I/O.
#[async_trait]
pub trait AsyncInventory: Send + Sync {
    async fn lookup(&self, item_id: &str) -> Result<ItemRecord, InventoryError>;
}

#[async_trait]
impl AsyncInventory for InMemoryInventory {
    async fn lookup(&self, item_id: &str) -> Result<ItemRecord, InventoryError> {
        Inventory::lookup(self, item_id)
    }
}

type Slot = Arc<Mutex<Battle>>;

pub struct SharedRegistry<I: AsyncInventory> {
    inventory: I,
    config: BattleConfig,
    battles: RwLock<HashMap<BattleHandle, Slot>>,
}

impl<I: AsyncInventory> SharedRegistry<I> {
    /// Validates `config` once; every battle started here shares it.
    pub fn new(inventory: I, config: BattleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inventory,
            config,
            battles: RwLock::new(HashMap::new()),
        })
    }

    pub async fn len(&self) -> usize {
        self.battles.read().await.len()
    }

    pub async fn start_battle(
        &self,
        player: Combatant,
        request: EncounterConfig,
    ) -> Result<(BattleHandle, ActionResult), SessionError> {
        let (handle, battle, result) =
            open_battle(player, request, &self.config, StdRng::from_entropy())?;
        self.battles
            .write()
            .await
            .insert(handle, Arc::new(Mutex::new(battle)));
        Ok((handle, result))
    }

    async fn slot(&self, handle: BattleHandle) -> Result<Slot, SessionError> {
        self.battles
            .read()
            .await
            .get(&handle)
            .cloned()
            .ok_or(SessionError::UnknownBattle(handle))
    }

    /// Waits for any in-flight action on the same battle, then resolves this one.
    pub async fn submit_action(
        &self,
        handle: BattleHandle,
        request: ActionRequest,
    ) -> Result<ActionResult, SessionError> {
        let slot = self.slot(handle).await?;
        let mut battle = slot.lock().await;
        self.resolve(&mut battle, request).await
    }

    /// Like `submit_action`, but rejects instead of waiting when another
    /// action for the battle is still pending.
    pub async fn try_submit_action(
        &self,
        handle: BattleHandle,
        request: ActionRequest,
    ) -> Result<ActionResult, SessionError> {
        let slot = self.slot(handle).await?;
        let mut battle = slot
            .try_lock()
            .map_err(|_| SessionError::ActionPending(handle))?;
        self.resolve(&mut battle, request).await
    }

    async fn resolve(
        &self,
        battle: &mut Battle,
        request: ActionRequest,
    ) -> Result<ActionResult, SessionError> {
        let action = match request.resolve() {
            Resolved::Ready(action) => action,
            Resolved::NeedsItem(_) if !battle.item_use_available() => {
                return refuse_item_use(battle);
            }
            Resolved::NeedsItem(item_id) => {
                PlayerAction::UseItem(self.inventory.lookup(&item_id).await?.effects)
            }
        };
        Ok(battle.submit(action)?)
    }

    pub async fn battle_log(&self, handle: BattleHandle) -> Result<Vec<String>, SessionError> {
        let slot = self.slot(handle).await?;
        let battle = slot.lock().await;
        Ok(battle.log_messages())
    }

    pub async fn abandon(&self, handle: BattleHandle) -> Result<(), SessionError> {
        self.battles
            .write()
            .await
            .remove(&handle)
            .ok_or(SessionError::UnknownBattle(handle))?;
        tracing::info!(%handle, "battle abandoned");
        Ok(())
    }

    pub async fn commit(
        &self,
        handle: BattleHandle,
        sink: &mut (impl PersistenceSink + Send),
    ) -> Result<BattleCommit, SessionError> {
        let slot = self.slot(handle).await?;
        let record = {
            let mut battle = slot.lock().await;
            commit_battle(handle, &mut battle, sink)?
        };
        self.battles.write().await.remove(&handle);
        Ok(record)
    }
}
