use std::path::Path;

use humqadam_entity::{MarketItem, NewMarketItem};
use humqadam_persistence::kv::KVStore;
use humqadam_persistence::{DurableStore, Durability};

use crate::collection::UserOrder;
use crate::config::{MARKET_ITEMS_COLLECTION, StoreConfig};
use crate::entity_store::EntityStore;
use crate::error::StoreError;
use crate::image::embed_image;
use crate::observe::EntityChangeReceiver;
use crate::seed::default_market_items;

/// Items offered for free or for a price. The latest listing shows first, after the seeds.
pub struct MarketplaceStore<S> {
  items: EntityStore<MarketItem, S>,
}

impl<S> MarketplaceStore<S>
where
  S: KVStore,
{
  pub fn new(durable: DurableStore<S>, config: &StoreConfig) -> Self {
    Self::with_seeds(durable, config, default_market_items())
  }

  pub fn with_seeds(durable: DurableStore<S>, config: &StoreConfig, seeds: Vec<MarketItem>) -> Self {
    let items = EntityStore::new(config.slot(MARKET_ITEMS_COLLECTION), seeds, durable)
      .with_order(UserOrder::NewestFirst)
      .with_id_gen(config.id_generator(MARKET_ITEMS_COLLECTION))
      .with_change_capacity(config.change_capacity);
    Self { items }
  }

  pub fn init(&self) -> usize {
    self.items.init()
  }

  pub fn list(&self) -> Vec<MarketItem> {
    self.items.list()
  }

  pub fn get(&self, id: &str) -> Option<MarketItem> {
    self.items.get(id)
  }

  pub fn is_seed_item(&self, id: &str) -> bool {
    self.items.is_seed(id)
  }

  pub fn add_item(&self, new: NewMarketItem) -> Result<String, StoreError> {
    self.items.add(new)
  }

  /// Embeds the image at `path` into the item, then adds it.
  pub async fn add_item_with_image<P: AsRef<Path>>(
    &self,
    mut new: NewMarketItem,
    path: P,
  ) -> Result<String, StoreError> {
    let image = embed_image(path).await?;
    new.image_url = Some(image.url().to_string());
    self.add_item(new)
  }

  /// Seed items are rejected with [StoreError::SeedImmutable].
  pub fn delete_item(&self, id: &str) -> Result<MarketItem, StoreError> {
    self.items.delete(id)
  }

  /// Case insensitive match on name, description and location. Blank text matches everything.
  pub fn search(&self, text: &str) -> Vec<MarketItem> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
      return self.list();
    }
    self.items.filter(|item| {
      item.name.to_lowercase().contains(&text)
        || item.description.to_lowercase().contains(&text)
        || item.location.to_lowercase().contains(&text)
    })
  }

  pub fn try_persist(&self) -> Result<(), StoreError> {
    self.items.try_persist()
  }

  pub fn durability(&self) -> Durability {
    self.items.durability()
  }

  pub fn subscribe(&self) -> EntityChangeReceiver<MarketItem> {
    self.items.subscribe()
  }

  pub fn entity_store(&self) -> &EntityStore<MarketItem, S> {
    &self.items
  }
}
