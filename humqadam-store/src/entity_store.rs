use std::sync::Arc;

use humqadam_entity::{Entity, IdGenerator, NewEntity, UuidIdGen};
use humqadam_persistence::kv::KVStore;
use humqadam_persistence::{DurableStore, Durability, SlotKey};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;

use crate::collection::{Collection, UserOrder};
use crate::config::{DEFAULT_CHANGE_CAPACITY, clamp_change_capacity};
use crate::error::StoreError;
use crate::observe::{EntityChange, EntityChangeReceiver, EntityChangeSender};

/// One kind of entity: fixed seeds merged with user entities that are mirrored to a slot of the
/// [DurableStore] after every mutation.
///
/// The in-memory state is authoritative. A failed write is logged and recorded in
/// [EntityStore::durability] but the mutation itself stands.
pub struct EntityStore<T, S> {
  slot: SlotKey,
  collection: RwLock<Collection<T>>,
  durable: DurableStore<S>,
  id_gen: Arc<dyn IdGenerator>,
  durability: Mutex<Durability>,
  change_tx: EntityChangeSender<T>,
}

impl<T, S> EntityStore<T, S>
where
  T: Entity,
  S: KVStore,
{
  pub fn new(slot: SlotKey, seeds: Vec<T>, durable: DurableStore<S>) -> Self {
    let (change_tx, _) = broadcast::channel(DEFAULT_CHANGE_CAPACITY);
    Self {
      slot,
      collection: RwLock::new(Collection::new(seeds, UserOrder::default())),
      durable,
      id_gen: Arc::new(UuidIdGen),
      durability: Mutex::new(Durability::Persisted),
      change_tx,
    }
  }

  pub fn with_order(mut self, order: UserOrder) -> Self {
    self.collection.get_mut().set_order(order);
    self
  }

  pub fn with_id_gen(mut self, id_gen: Arc<dyn IdGenerator>) -> Self {
    self.id_gen = id_gen;
    self
  }

  pub fn with_change_capacity(mut self, capacity: usize) -> Self {
    let (change_tx, _) = broadcast::channel(clamp_change_capacity(capacity));
    self.change_tx = change_tx;
    self
  }

  /// Loads the user entities from storage, replacing whatever is held in memory. Returns the
  /// number of user entities loaded.
  pub fn init(&self) -> usize {
    let mut collection = self.collection.write();
    let loaded = self
      .durable
      .load_entities::<T, _>(&self.slot, |id| collection.is_seed(id))
      .unwrap_or_default();
    collection.set_user_entities(loaded);
    let count = collection.user_entities().len();
    tracing::trace!("loaded {} user entities from {}", count, self.slot);
    count
  }

  pub fn slot(&self) -> &SlotKey {
    &self.slot
  }

  pub fn list(&self) -> Vec<T> {
    self.collection.read().list()
  }

  pub fn get(&self, id: &str) -> Option<T> {
    self.collection.read().get(id).cloned()
  }

  pub fn contains(&self, id: &str) -> bool {
    self.collection.read().contains(id)
  }

  pub fn is_seed(&self, id: &str) -> bool {
    self.collection.read().is_seed(id)
  }

  pub fn user_entities(&self) -> Vec<T> {
    self.collection.read().user_entities().to_vec()
  }

  pub fn len(&self) -> usize {
    self.collection.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.collection.read().is_empty()
  }

  /// Merged view filtered by `predicate`.
  pub fn filter<F>(&self, predicate: F) -> Vec<T>
  where
    F: Fn(&T) -> bool,
  {
    self
      .collection
      .read()
      .iter()
      .filter(|entity| predicate(entity))
      .cloned()
      .collect()
  }

  pub fn add<N>(&self, new: N) -> Result<String, StoreError>
  where
    N: NewEntity<Entity = T>,
  {
    let mut collection = self.collection.write();
    let entity = collection.insert_new(new, self.id_gen.as_ref())?;
    tracing::debug!("add {} to {}", entity.id(), self.slot);
    self.persist(&collection);
    let id = entity.id().to_string();
    let _ = self.change_tx.send(EntityChange::DidCreate { entity });
    Ok(id)
  }

  pub fn update_with<F>(&self, id: &str, f: F) -> Result<T, StoreError>
  where
    F: FnOnce(&mut T),
  {
    let mut collection = self.collection.write();
    let entity = collection.update_with(id, f).inspect_err(|err| {
      tracing::warn!("reject update of {} in {}: {}", id, self.slot, err);
    })?;
    tracing::debug!("update {} in {}", id, self.slot);
    self.persist(&collection);
    let _ = self.change_tx.send(EntityChange::DidUpdate {
      entity: entity.clone(),
    });
    Ok(entity)
  }

  pub fn delete(&self, id: &str) -> Result<T, StoreError> {
    let mut collection = self.collection.write();
    let entity = collection.remove(id).inspect_err(|err| {
      tracing::warn!("reject delete of {} in {}: {}", id, self.slot, err);
    })?;
    tracing::debug!("delete {} from {}", id, self.slot);
    self.persist(&collection);
    let _ = self.change_tx.send(EntityChange::DidDelete {
      entity: entity.clone(),
    });
    Ok(entity)
  }

  /// Writes the user entities again and returns the storage error instead of logging it. Use it
  /// to retry after a mutation ended [Durability::SessionOnly].
  pub fn try_persist(&self) -> Result<(), StoreError> {
    let collection = self.collection.read();
    let result = self
      .durable
      .try_save(&self.slot, collection.user_entities());
    *self.durability.lock() = match &result {
      Ok(_) => Durability::Persisted,
      Err(_) => Durability::SessionOnly,
    };
    Ok(result?)
  }

  /// Whether the most recent mutation reached storage.
  pub fn durability(&self) -> Durability {
    *self.durability.lock()
  }

  pub fn subscribe(&self) -> EntityChangeReceiver<T> {
    self.change_tx.subscribe()
  }

  fn persist(&self, collection: &Collection<T>) {
    let durability = self.durable.save(&self.slot, collection.user_entities());
    *self.durability.lock() = durability;
  }
}
