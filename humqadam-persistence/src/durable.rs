use std::collections::{BTreeMap, HashSet};

use humqadam_entity::Entity;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::PersistenceError;
use crate::kv::KVStore;
use crate::snapshot::{decode_snapshot, decode_snapshot_value, encode_snapshot};

/// Whether a mutation reached durable storage.
///
/// Writes are best effort: the in-memory state stays authoritative for the session even when a
/// write fails, so a failed save leaves the change [Durability::SessionOnly].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
  Persisted,
  SessionOnly,
}

impl Durability {
  pub fn is_persisted(&self) -> bool {
    matches!(self, Durability::Persisted)
  }
}

/// Serializes collections into named slots of a [KVStore].
#[derive(Clone)]
pub struct DurableStore<S> {
  kv: S,
}

impl<S> DurableStore<S>
where
  S: KVStore,
{
  pub fn new(kv: S) -> Self {
    Self { kv }
  }

  pub fn kv(&self) -> &S {
    &self.kv
  }

  pub fn try_save<P: Serialize + ?Sized>(
    &self,
    slot: &str,
    payload: &P,
  ) -> Result<(), PersistenceError> {
    let bytes = encode_snapshot(payload)?;
    self.kv.insert(slot, bytes).map_err(Into::<PersistenceError>::into)?;
    self.kv.flush().map_err(Into::<PersistenceError>::into)?;
    Ok(())
  }

  /// Writes `payload` under `slot`. Failures are logged, never returned.
  pub fn save<P: Serialize + ?Sized>(&self, slot: &str, payload: &P) -> Durability {
    match self.try_save(slot, payload) {
      Ok(_) => {
        tracing::trace!("saved slot {}", slot);
        Durability::Persisted
      },
      Err(err) => {
        tracing::error!("Failed to save slot {}: {}", slot, err);
        Durability::SessionOnly
      },
    }
  }

  pub fn try_load<P: DeserializeOwned>(&self, slot: &str) -> Result<Option<P>, PersistenceError> {
    let value = self.kv.get(slot.as_bytes()).map_err(Into::<PersistenceError>::into)?;
    match value {
      None => Ok(None),
      Some(bytes) => Ok(Some(decode_snapshot::<P>(bytes.as_ref())?.payload)),
    }
  }

  /// Reads `slot`. A missing slot, unreadable bytes or any other error all yield `None`.
  pub fn load<P: DeserializeOwned>(&self, slot: &str) -> Option<P> {
    match self.try_load(slot) {
      Ok(payload) => payload,
      Err(err) => {
        tracing::warn!("Failed to load slot {}: {}", slot, err);
        None
      },
    }
  }

  /// Reads a list of user entities from `slot`.
  ///
  /// Entries whose id is reserved (for example by a seed entity shipped in a newer build) are
  /// dropped, as are duplicate ids after the first and entries that no longer deserialize.
  pub fn load_entities<T, F>(&self, slot: &str, is_reserved: F) -> Option<Vec<T>>
  where
    T: Entity,
    F: Fn(&str) -> bool,
  {
    let bytes = match self.kv.get(slot.as_bytes()) {
      Ok(Some(bytes)) => bytes,
      Ok(None) => return None,
      Err(err) => {
        tracing::warn!("Failed to read slot {}: {:?}", slot, err);
        return None;
      },
    };

    let values = match decode_snapshot_value(bytes.as_ref()) {
      Ok(snapshot) => match snapshot.payload {
        Value::Array(values) => values,
        other => {
          tracing::warn!("slot {} does not hold a list: {}", slot, other);
          return None;
        },
      },
      Err(err) => {
        tracing::warn!("Failed to decode slot {}: {}", slot, err);
        return None;
      },
    };

    let mut seen = HashSet::new();
    let mut entities = Vec::with_capacity(values.len());
    for value in values {
      let entity = match serde_json::from_value::<T>(value) {
        Ok(entity) => entity,
        Err(err) => {
          tracing::warn!("skip malformed entity in slot {}: {}", slot, err);
          continue;
        },
      };
      if is_reserved(entity.id()) {
        tracing::debug!("skip reserved id {} in slot {}", entity.id(), slot);
        continue;
      }
      if !seen.insert(entity.id().to_string()) {
        tracing::debug!("skip duplicate id {} in slot {}", entity.id(), slot);
        continue;
      }
      entities.push(entity);
    }
    Some(entities)
  }

  /// Reads child entities grouped by parent id from `slot`.
  ///
  /// Malformed entries and duplicate ids within one parent are dropped.
  pub fn load_nested<T>(&self, slot: &str) -> Option<BTreeMap<String, Vec<T>>>
  where
    T: Entity,
  {
    let groups: BTreeMap<String, Vec<Value>> = self.load(slot)?;
    let mut nested = BTreeMap::new();
    for (parent_id, values) in groups {
      let mut seen = HashSet::new();
      let children = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
          Ok(child) => Some(child),
          Err(err) => {
            tracing::warn!("skip malformed child of {} in slot {}: {}", parent_id, slot, err);
            None
          },
        })
        .filter(|child| seen.insert(child.id().to_string()))
        .collect::<Vec<T>>();
      nested.insert(parent_id, children);
    }
    Some(nested)
  }

  pub fn clear(&self, slot: &str) -> Durability {
    match self.kv.remove(slot.as_bytes()).map_err(Into::<PersistenceError>::into) {
      Ok(_) => Durability::Persisted,
      Err(err) => {
        tracing::error!("Failed to clear slot {}: {}", slot, err);
        Durability::SessionOnly
      },
    }
  }
}
