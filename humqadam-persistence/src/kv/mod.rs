mod any_kv;
mod memory_kv;
#[cfg(feature = "sled_db")]
mod sled_kv;

pub use any_kv::*;
pub use memory_kv::*;
#[cfg(feature = "sled_db")]
pub use sled_kv::*;

use std::fmt::Debug;
use std::sync::Arc;

use crate::PersistenceError;

/// A flat byte key-value store. Each persisted collection occupies a single key.
pub trait KVStore: Send + Sync {
  type Value: AsRef<[u8]>;
  type Error: Into<PersistenceError> + Debug;

  /// Get a value by key
  fn get(&self, key: &[u8]) -> Result<Option<Self::Value>, Self::Error>;

  /// Insert a key to a new value, replacing the previous value if it exists
  fn insert<K: AsRef<[u8]>, V: AsRef<[u8]>>(&self, key: K, value: V) -> Result<(), Self::Error>;

  /// Remove a key. Removing a missing key is not an error.
  fn remove(&self, key: &[u8]) -> Result<(), Self::Error>;

  /// Make previous writes durable.
  fn flush(&self) -> Result<(), Self::Error> {
    Ok(())
  }
}

impl<T> KVStore for Arc<T>
where
  T: KVStore,
{
  type Value = <T as KVStore>::Value;
  type Error = <T as KVStore>::Error;

  fn get(&self, key: &[u8]) -> Result<Option<Self::Value>, Self::Error> {
    (**self).get(key)
  }

  fn insert<K: AsRef<[u8]>, V: AsRef<[u8]>>(&self, key: K, value: V) -> Result<(), Self::Error> {
    (**self).insert(key, value)
  }

  fn remove(&self, key: &[u8]) -> Result<(), Self::Error> {
    (**self).remove(key)
  }

  fn flush(&self) -> Result<(), Self::Error> {
    (**self).flush()
  }
}
