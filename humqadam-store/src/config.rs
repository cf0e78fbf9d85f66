use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use humqadam_entity::{IdGenerator, SequentialIdGen, UuidIdGen};
use humqadam_persistence::{SlotKey, make_slot_key};
use serde::{Deserialize, Serialize};

pub const STORE_CONFIG_ENV: &str = "HUMQADAM_STORE_CONFIG";
pub const DEFAULT_NAMESPACE: &str = "humqadam";
pub const DEFAULT_CHANGE_CAPACITY: usize = 100;
pub const MAX_CHANGE_CAPACITY: usize = 1 << 16;

pub const COMMUNITIES_COLLECTION: &str = "community-store/communities";
pub const MEMBERSHIPS_COLLECTION: &str = "community-store/memberships";
pub const MESSAGES_COLLECTION: &str = "community-store/messages";
pub const ANNOUNCEMENTS_COLLECTION: &str = "community-store/announcements";
pub const PROFESSIONALS_COLLECTION: &str = "community-store/professionals";
pub const BUSINESSES_COLLECTION: &str = "community-store/businesses";
pub const LOST_FOUND_COLLECTION: &str = "community-store/lostFoundItems";
pub const CAMPAIGNS_COLLECTION: &str = "community-store/campaigns";
pub const MARKET_ITEMS_COLLECTION: &str = "communityShareItems";
pub const STORIES_COLLECTION: &str = "communityStories";
pub const STORY_COMMENTS_COLLECTION: &str = "communityStories/comments";
pub const STORY_REACTIONS_COLLECTION: &str = "communityStories/reactions";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
  /// Prefix of every slot the stores write.
  pub namespace: String,
  pub storage: StorageConfig,
  pub id_strategy: IdStrategy,
  /// Buffered changes per subscriber. Clamped to `1..=MAX_CHANGE_CAPACITY` when a channel is
  /// created.
  pub change_capacity: usize,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      namespace: DEFAULT_NAMESPACE.to_string(),
      storage: StorageConfig::default(),
      id_strategy: IdStrategy::default(),
      change_capacity: DEFAULT_CHANGE_CAPACITY,
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
  /// Process local storage. `quota` caps the stored bytes the way a browser caps local storage.
  Memory {
    #[serde(default)]
    quota: Option<usize>,
  },
  Sled {
    path: PathBuf,
  },
}

impl Default for StorageConfig {
  fn default() -> Self {
    StorageConfig::Memory { quota: None }
  }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IdStrategy {
  #[default]
  Uuid,
  Sequential {
    prefix: String,
  },
}

impl StoreConfig {
  /// Reads the config from [STORE_CONFIG_ENV]. A missing or malformed value yields the default.
  pub fn from_env() -> Self {
    match std::env::var(STORE_CONFIG_ENV) {
      Ok(value) => match StoreConfig::from_str(&value) {
        Ok(config) => config,
        Err(err) => {
          tracing::warn!("Invalid {}: {}, using default config", STORE_CONFIG_ENV, err);
          StoreConfig::default()
        },
      },
      Err(_) => StoreConfig::default(),
    }
  }

  pub fn channel_capacity(&self) -> usize {
    clamp_change_capacity(self.change_capacity)
  }

  pub fn slot(&self, collection: &str) -> SlotKey {
    make_slot_key(&self.namespace, collection)
  }

  /// A fresh generator for one collection.
  pub fn id_generator(&self, collection: &str) -> Arc<dyn IdGenerator> {
    match &self.id_strategy {
      IdStrategy::Uuid => Arc::new(UuidIdGen),
      IdStrategy::Sequential { prefix } => {
        let name = collection.rsplit('/').next().unwrap_or(collection);
        Arc::new(SequentialIdGen::new(format!("{}-{}", prefix, name)))
      },
    }
  }
}

/// A capacity `tokio::sync::broadcast::channel` accepts.
pub fn clamp_change_capacity(capacity: usize) -> usize {
  let clamped = capacity.clamp(1, MAX_CHANGE_CAPACITY);
  if clamped != capacity {
    tracing::warn!("change capacity {} out of range, using {}", capacity, clamped);
  }
  clamped
}

impl FromStr for StoreConfig {
  type Err = serde_json::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    serde_json::from_str(s)
  }
}
