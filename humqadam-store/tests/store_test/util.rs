use std::path::PathBuf;
use std::sync::{Arc, Once};

use humqadam_entity::{Entity, NewEntity, SequentialIdGen, ValidateError};
use humqadam_persistence::DurableStore;
use humqadam_persistence::kv::{MemoryKV, SledKV};
use humqadam_store::{
  CommunityStore, EntityStore, IdStrategy, MarketplaceStore, StoreConfig, StoryStore, UserOrder,
};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tracing_subscriber::fmt::Subscriber;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
  pub id: String,
  pub name: String,
}

impl Entity for Item {
  fn id(&self) -> &str {
    &self.id
  }
}

pub struct NewItem(pub &'static str);

impl NewEntity for NewItem {
  type Entity = Item;

  fn validate(&self) -> Result<(), ValidateError> {
    if self.0.trim().is_empty() {
      return Err(ValidateError::MissingField("name"));
    }
    Ok(())
  }

  fn into_entity(self, id: String) -> Item {
    Item {
      id,
      name: self.0.to_string(),
    }
  }
}

pub fn item(id: &str, name: &str) -> Item {
  Item {
    id: id.to_string(),
    name: name.to_string(),
  }
}

pub fn setup_log() {
  static START: Once = Once::new();
  START.call_once(|| {
    let subscriber = Subscriber::builder()
      .with_env_filter(EnvFilter::new(
        "humqadam_store=trace,humqadam_persistence=trace",
      ))
      .with_ansi(true)
      .finish();
    subscriber.try_init().unwrap();
  });
}

pub fn test_config() -> StoreConfig {
  StoreConfig {
    namespace: "test".to_string(),
    id_strategy: IdStrategy::Sequential {
      prefix: "u".to_string(),
    },
    ..Default::default()
  }
}

pub fn item_store(kv: MemoryKV, seeds: Vec<Item>) -> EntityStore<Item, MemoryKV> {
  setup_log();
  let store = EntityStore::new(
    test_config().slot("items"),
    seeds,
    DurableStore::new(kv),
  )
  .with_id_gen(Arc::new(SequentialIdGen::new("u")))
  .with_order(UserOrder::OldestFirst);
  store.init();
  store
}

pub fn community_store(kv: MemoryKV) -> CommunityStore<MemoryKV> {
  setup_log();
  let store = CommunityStore::new(DurableStore::new(kv), &test_config());
  store.init();
  store
}

pub fn marketplace_store(kv: MemoryKV) -> MarketplaceStore<MemoryKV> {
  setup_log();
  let store = MarketplaceStore::new(DurableStore::new(kv), &test_config());
  store.init();
  store
}

pub fn story_store(kv: MemoryKV) -> StoryStore<MemoryKV> {
  setup_log();
  let store = StoryStore::new(DurableStore::new(kv), &test_config());
  store.init();
  store
}

pub fn temp_dir() -> Cleaner {
  setup_log();
  let tempdir = TempDir::new().unwrap();
  Cleaner::new(tempdir.into_path())
}

pub fn open_sled(cleaner: &Cleaner) -> SledKV {
  SledKV::open(cleaner.path()).unwrap()
}

pub struct Cleaner(PathBuf);

impl Cleaner {
  pub fn new(dir: PathBuf) -> Self {
    Cleaner(dir)
  }

  pub fn path(&self) -> &PathBuf {
    &self.0
  }

  fn cleanup(dir: &PathBuf) {
    let _ = std::fs::remove_dir_all(dir);
  }
}

impl Drop for Cleaner {
  fn drop(&mut self) {
    Self::cleanup(&self.0)
  }
}
