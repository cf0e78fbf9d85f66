use std::sync::Arc;

use anyhow::Context;
use humqadam_persistence::kv::{AnyKV, KVStore, MemoryKV};
use humqadam_persistence::{DurableStore, Durability};
use humqadam_store::{CommunityStore, MarketplaceStore, StorageConfig, StoreConfig, StoryStore};
use serde::Serialize;

/// Every store the app uses, sharing one backend. Hand this to the view layer instead of
/// reaching for globals.
pub struct AppStores<S = AnyKV> {
  pub communities: Arc<CommunityStore<S>>,
  pub marketplace: Arc<MarketplaceStore<S>>,
  pub stories: Arc<StoryStore<S>>,
}

impl<S> AppStores<S>
where
  S: KVStore,
{
  /// [Durability::SessionOnly] if the last mutation of any store missed storage.
  pub fn durability(&self) -> Durability {
    let all = [
      self.communities.durability(),
      self.marketplace.durability(),
      self.stories.durability(),
    ];
    if all.iter().all(Durability::is_persisted) {
      Durability::Persisted
    } else {
      Durability::SessionOnly
    }
  }

  pub fn summary(&self) -> StoreSummary {
    StoreSummary {
      communities: self.communities.list().len(),
      market_items: self.marketplace.list().len(),
      stories: self.stories.list().len(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
  pub communities: usize,
  pub market_items: usize,
  pub stories: usize,
}

pub struct AppStoresBuilder {
  config: StoreConfig,
}

impl AppStoresBuilder {
  pub fn new(config: StoreConfig) -> Self {
    Self { config }
  }

  /// Uses the config in `HUMQADAM_STORE_CONFIG`, or the default.
  pub fn from_env() -> Self {
    Self::new(StoreConfig::from_env())
  }

  pub fn config(&self) -> &StoreConfig {
    &self.config
  }

  /// Opens the backend named by the config.
  pub fn open_kv(&self) -> anyhow::Result<AnyKV> {
    match &self.config.storage {
      StorageConfig::Memory { quota } => {
        let kv = match quota {
          Some(quota) => MemoryKV::with_quota(*quota),
          None => MemoryKV::new(),
        };
        Ok(AnyKV::Memory(kv))
      },
      #[cfg(feature = "sled_db")]
      StorageConfig::Sled { path } => {
        let kv = humqadam_persistence::kv::SledKV::open(path)
          .with_context(|| format!("Failed to open sled db at {:?}", path))?;
        Ok(AnyKV::Sled(kv))
      },
      #[cfg(not(feature = "sled_db"))]
      StorageConfig::Sled { path } => Err(anyhow::anyhow!(
        "sled storage at {:?} requested but the sled_db feature is disabled",
        path
      )),
    }
  }

  /// Opens the configured backend and loads every store from it.
  pub fn build(&self) -> anyhow::Result<AppStores> {
    let kv = self.open_kv()?;
    Ok(self.build_with_kv(kv))
  }

  /// Builds every store on top of `kv` and loads it.
  pub fn build_with_kv<S>(&self, kv: S) -> AppStores<S>
  where
    S: KVStore + Clone,
  {
    let durable = DurableStore::new(kv);
    let communities = CommunityStore::new(durable.clone(), &self.config);
    let marketplace = MarketplaceStore::new(durable.clone(), &self.config);
    let stories = StoryStore::new(durable, &self.config);

    let loaded = communities.init() + marketplace.init() + stories.init();
    tracing::info!(
      "stores ready in namespace {}: {} user entities loaded",
      self.config.namespace,
      loaded
    );

    AppStores {
      communities: Arc::new(communities),
      marketplace: Arc::new(marketplace),
      stories: Arc::new(stories),
    }
  }
}
