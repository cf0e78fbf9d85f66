use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::PersistenceError;
use crate::kv::KVStore;

/// Process local storage with the shape of the browser's local storage: string-ish keys, whole
/// values, an optional byte quota.
///
/// Clones share the same map, so a clone outlives the stores that were built on top of it and
/// can be used to simulate a page reload.
#[derive(Clone, Default)]
pub struct MemoryKV {
  inner: Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>,
  quota: Option<usize>,
}

impl MemoryKV {
  pub fn new() -> Self {
    Self::default()
  }

  /// Writes that would grow the total size of keys and values past `quota` bytes fail with
  /// [PersistenceError::QuotaExceeded].
  pub fn with_quota(quota: usize) -> Self {
    Self {
      inner: Default::default(),
      quota: Some(quota),
    }
  }

  pub fn len(&self) -> usize {
    self.inner.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.inner.read().is_empty()
  }

  pub fn used_bytes(&self) -> usize {
    self
      .inner
      .read()
      .iter()
      .map(|(k, v)| k.len() + v.len())
      .sum()
  }
}

impl KVStore for MemoryKV {
  type Value = Vec<u8>;
  type Error = PersistenceError;

  fn get(&self, key: &[u8]) -> Result<Option<Self::Value>, Self::Error> {
    Ok(self.inner.read().get(key).cloned())
  }

  fn insert<K: AsRef<[u8]>, V: AsRef<[u8]>>(&self, key: K, value: V) -> Result<(), Self::Error> {
    let key = key.as_ref();
    let value = value.as_ref();
    let mut map = self.inner.write();
    if let Some(limit) = self.quota {
      let replaced = map.get(key).map(|old| key.len() + old.len()).unwrap_or(0);
      let used: usize = map.iter().map(|(k, v)| k.len() + v.len()).sum();
      let required = used - replaced + key.len() + value.len();
      if required > limit {
        return Err(PersistenceError::QuotaExceeded { limit, required });
      }
    }
    map.insert(key.to_vec(), value.to_vec());
    Ok(())
  }

  fn remove(&self, key: &[u8]) -> Result<(), Self::Error> {
    self.inner.write().remove(key);
    Ok(())
  }
}
