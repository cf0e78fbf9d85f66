use assert_json_diff::assert_json_include;
use assert_matches2::assert_matches;
use humqadam_entity::NewMarketItem;
use humqadam_persistence::kv::{KVStore, MemoryKV};
use humqadam_store::StoreError;
use serde_json::{Value, json};

use crate::store_test::util::marketplace_store;

fn new_item(name: &str, price: &str) -> NewMarketItem {
  NewMarketItem {
    name: name.to_string(),
    description: "Barely used".to_string(),
    image_url: None,
    location: "Sector G-10, Islamabad".to_string(),
    pickup_times: "Evenings".to_string(),
    giver_name: "Sara Iqbal".to_string(),
    giver_contact_info: "Message via App".to_string(),
    price: price.to_string(),
  }
}

#[test]
fn seed_items_come_first_then_newest_listing() {
  let store = marketplace_store(MemoryKV::new());
  let first = store.add_item(new_item("Study table", "")).unwrap();
  let second = store.add_item(new_item("Ceiling fan", "1500")).unwrap();

  let ids: Vec<_> = store.list().into_iter().map(|item| item.id).collect();
  assert_eq!(
    ids,
    vec![
      "initial-1".to_string(),
      "initial-2".to_string(),
      "initial-3".to_string(),
      "initial-4".to_string(),
      "initial-5".to_string(),
      second,
      first
    ]
  );
}

#[test]
fn price_and_avatar_are_derived() {
  let store = marketplace_store(MemoryKV::new());
  let free = store.add_item(new_item("Study table", "")).unwrap();
  let priced = store.add_item(new_item("Ceiling fan", "1500")).unwrap();
  let garbage = store.add_item(new_item("Old radio", "cheap")).unwrap();

  assert!(store.get(&free).unwrap().is_free());
  assert_eq!(store.get(&priced).unwrap().price, Some(1500.0));
  assert!(store.get(&garbage).unwrap().is_free());
  assert_eq!(
    store.get(&free).unwrap().giver_profile_pic_url.as_deref(),
    Some("https://ui-avatars.com/api/?name=Sara%20Iqbal&background=random&color=fff")
  );
}

#[test]
fn seed_items_cannot_be_deleted() {
  let store = marketplace_store(MemoryKV::new());
  assert!(store.is_seed_item("initial-2"));
  assert_matches!(store.delete_item("initial-2"), Err(StoreError::SeedImmutable(_)));
  assert_eq!(store.list().len(), 5);
}

#[test]
fn deleted_item_stays_deleted_after_reload() {
  let kv = MemoryKV::new();
  let store = marketplace_store(kv.clone());
  let id = store.add_item(new_item("Study table", "")).unwrap();
  store.delete_item(&id).unwrap();
  assert!(store.get(&id).is_none());

  let reloaded = marketplace_store(kv);
  assert!(reloaded.get(&id).is_none());
  assert_eq!(reloaded.list().len(), 5);
}

#[test]
fn missing_contact_is_rejected() {
  let store = marketplace_store(MemoryKV::new());
  let mut item = new_item("Study table", "");
  item.giver_contact_info = String::new();
  assert_matches!(store.add_item(item), Err(StoreError::Validate(_)));
}

#[test]
fn search_covers_name_description_and_location() {
  let store = marketplace_store(MemoryKV::new());
  store.add_item(new_item("Ceiling fan", "1500")).unwrap();
  let names = |text: &str| -> Vec<String> {
    store.search(text).into_iter().map(|item| item.name).collect()
  };
  assert_eq!(names("armchair"), vec!["Comfy Armchair"]);
  assert_eq!(names("tire repair"), vec!["Kids Bicycle"]);
  assert_eq!(names("g-10"), vec!["Ceiling fan"]);
  assert_eq!(names("  ").len(), 6);
}

#[test]
fn stored_items_use_browser_field_names() {
  let kv = MemoryKV::new();
  let store = marketplace_store(kv.clone());
  let id = store.add_item(new_item("Ceiling fan", "1500")).unwrap();

  let bytes = kv.get(b"test/communityShareItems").unwrap().unwrap();
  let stored: Value = serde_json::from_slice(&bytes).unwrap();
  assert_json_include!(
    actual: stored,
    expected: json!({
      "version": 1,
      "payload": [{
        "id": id,
        "name": "Ceiling fan",
        "pickupTimes": "Evenings",
        "giverName": "Sara Iqbal",
        "giverContactInfo": "Message via App",
        "price": 1500.0
      }]
    })
  );
}
