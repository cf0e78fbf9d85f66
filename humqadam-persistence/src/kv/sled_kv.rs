use std::path::Path;
use std::sync::Arc;

use sled::{Db, IVec};

use crate::PersistenceError;
use crate::kv::KVStore;

/// On-disk storage backed by sled.
#[derive(Clone)]
pub struct SledKV(pub Arc<Db>);

impl SledKV {
  pub fn new(db: Db) -> Self {
    Self(Arc::new(db))
  }

  pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
    let db = sled::open(path)?;
    Ok(Self::new(db))
  }
}

impl KVStore for SledKV {
  type Value = IVec;
  type Error = PersistenceError;

  fn get(&self, key: &[u8]) -> Result<Option<Self::Value>, Self::Error> {
    let value = self.0.get(key)?;
    Ok(value)
  }

  fn insert<K: AsRef<[u8]>, V: AsRef<[u8]>>(&self, key: K, value: V) -> Result<(), Self::Error> {
    let _ = self.0.insert(key.as_ref(), value.as_ref())?;
    Ok(())
  }

  fn remove(&self, key: &[u8]) -> Result<(), Self::Error> {
    self.0.remove(key)?;
    Ok(())
  }

  fn flush(&self) -> Result<(), Self::Error> {
    self.0.flush()?;
    Ok(())
  }
}
