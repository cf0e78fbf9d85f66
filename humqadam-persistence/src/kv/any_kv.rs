use crate::PersistenceError;
use crate::kv::{KVStore, MemoryKV};
#[cfg(feature = "sled_db")]
use crate::kv::SledKV;

/// A backend picked at runtime, usually from configuration.
#[derive(Clone)]
pub enum AnyKV {
  Memory(MemoryKV),
  #[cfg(feature = "sled_db")]
  Sled(SledKV),
}

impl From<MemoryKV> for AnyKV {
  fn from(kv: MemoryKV) -> Self {
    AnyKV::Memory(kv)
  }
}

#[cfg(feature = "sled_db")]
impl From<SledKV> for AnyKV {
  fn from(kv: SledKV) -> Self {
    AnyKV::Sled(kv)
  }
}

impl KVStore for AnyKV {
  type Value = Vec<u8>;
  type Error = PersistenceError;

  fn get(&self, key: &[u8]) -> Result<Option<Self::Value>, Self::Error> {
    match self {
      AnyKV::Memory(kv) => kv.get(key),
      #[cfg(feature = "sled_db")]
      AnyKV::Sled(kv) => Ok(kv.get(key)?.map(|value| value.to_vec())),
    }
  }

  fn insert<K: AsRef<[u8]>, V: AsRef<[u8]>>(&self, key: K, value: V) -> Result<(), Self::Error> {
    match self {
      AnyKV::Memory(kv) => kv.insert(key, value),
      #[cfg(feature = "sled_db")]
      AnyKV::Sled(kv) => kv.insert(key, value),
    }
  }

  fn remove(&self, key: &[u8]) -> Result<(), Self::Error> {
    match self {
      AnyKV::Memory(kv) => kv.remove(key),
      #[cfg(feature = "sled_db")]
      AnyKV::Sled(kv) => kv.remove(key),
    }
  }

  fn flush(&self) -> Result<(), Self::Error> {
    match self {
      AnyKV::Memory(kv) => kv.flush(),
      #[cfg(feature = "sled_db")]
      AnyKV::Sled(kv) => kv.flush(),
    }
  }
}
