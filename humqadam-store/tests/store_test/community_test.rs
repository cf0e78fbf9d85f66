use assert_matches2::assert_matches;
use humqadam_entity::{
  CommunityUpdate, LostFoundKind, Membership, NewAnnouncement, NewBusiness, NewCampaign,
  NewCommunity, NewLostFoundItem, NewMessage, NewProfessional, ValidateError,
};
use humqadam_persistence::kv::{KVStore, MemoryKV};
use humqadam_persistence::{DurableStore, Durability, PersistenceError};
use humqadam_store::{ChildKind, CommunityChange, CommunityStore, StoreConfig, StoreError};

use crate::store_test::util::{community_store, setup_log, test_config};

fn new_community(name: &str) -> NewCommunity {
  NewCommunity {
    name: name.to_string(),
    area: "Islamabad".to_string(),
    description: "Weekend hikes around the Margalla hills".to_string(),
    image: "https://example.com/hills.jpg".to_string(),
  }
}

fn new_message(text: &str) -> NewMessage {
  NewMessage {
    user: "You".to_string(),
    message: text.to_string(),
    time: "10:00 AM".to_string(),
    ..Default::default()
  }
}

#[test]
fn seeds_are_split_into_joined_and_discoverable() {
  let store = community_store(MemoryKV::new());
  assert_eq!(store.list().len(), 4);
  let mine: Vec<_> = store.my_communities().into_iter().map(|c| c.id).collect();
  assert_eq!(mine, vec!["comm-gikians", "comm-football"]);
  let discover: Vec<_> = store.discover().into_iter().map(|c| c.id).collect();
  assert_eq!(discover, vec!["comm-northern-trips", "comm-cricket"]);
}

#[test]
fn new_community_starts_with_its_creator() {
  let store = community_store(MemoryKV::new());
  let id = store.add_community(new_community("Hikers")).unwrap();
  let community = store.get(&id).unwrap();
  assert!(community.joined);
  assert_eq!(community.members, 1);
  assert_eq!(store.list().last().unwrap().id, id);
  assert!(store.my_communities().iter().any(|c| c.id == id));
}

#[test]
fn community_without_name_is_rejected() {
  let store = community_store(MemoryKV::new());
  let result = store.add_community(new_community(""));
  assert_matches!(
    result,
    Err(StoreError::Validate(ValidateError::MissingField("name")))
  );
  assert_eq!(store.list().len(), 4);
}

#[test]
fn update_merges_given_fields_only() {
  let store = community_store(MemoryKV::new());
  let id = store.add_community(new_community("Hikers")).unwrap();
  let updated = store
    .update_community(
      &id,
      CommunityUpdate {
        area: Some("Rawalpindi".to_string()),
        ..Default::default()
      },
    )
    .unwrap();
  assert_eq!(updated.name, "Hikers");
  assert_eq!(updated.area, "Rawalpindi");
  assert_eq!(updated.members, 1);
}

#[test]
fn seed_community_cannot_be_updated_or_deleted() {
  let store = community_store(MemoryKV::new());
  let before = store.list();
  let update = CommunityUpdate {
    name: Some("Renamed".to_string()),
    ..Default::default()
  };
  assert_matches!(
    store.update_community("comm-cricket", update),
    Err(StoreError::SeedImmutable(_))
  );
  assert_matches!(
    store.delete_community("comm-cricket"),
    Err(StoreError::SeedImmutable(_))
  );
  assert_eq!(store.list(), before);
}

#[test]
fn integrity_violations_are_rejections() {
  let store = community_store(MemoryKV::new());
  let seed = store.delete_community("comm-gikians").unwrap_err();
  assert!(seed.is_rejection());
  assert_matches!(seed, StoreError::SeedImmutable(_));

  let missing = store.join("missing").unwrap_err();
  assert!(missing.is_rejection());
  assert_matches!(missing, StoreError::NotFound(_));

  let orphan = store
    .add_message("missing", new_message("hello"))
    .unwrap_err();
  assert!(orphan.is_rejection());
  assert_matches!(orphan, StoreError::ParentNotFound(_));

  let invalid = store.add_community(new_community(" ")).unwrap_err();
  assert!(!invalid.is_rejection());
}

#[test]
fn join_then_leave_restores_membership() {
  let store = community_store(MemoryKV::new());
  let before = store.get("comm-cricket").unwrap().membership();

  let joined = store.join("comm-cricket").unwrap();
  assert_eq!(
    joined,
    Membership {
      joined: true,
      members: 951
    }
  );
  assert!(store.my_communities().iter().any(|c| c.id == "comm-cricket"));

  store.leave("comm-cricket").unwrap();
  assert_eq!(store.get("comm-cricket").unwrap().membership(), before);
}

#[test]
fn join_then_leave_on_user_community() {
  let store = community_store(MemoryKV::new());
  let id = store.add_community(new_community("Hikers")).unwrap();
  store.leave(&id).unwrap();
  let left = store.get(&id).unwrap().membership();
  assert_eq!(
    left,
    Membership {
      joined: false,
      members: 0
    }
  );

  store.join(&id).unwrap();
  store.leave(&id).unwrap();
  assert_eq!(store.get(&id).unwrap().membership(), left);
}

#[test]
fn leave_never_goes_below_zero() {
  let store = community_store(MemoryKV::new());
  let id = store.add_community(new_community("Hikers")).unwrap();
  store.leave(&id).unwrap();
  let membership = store.leave(&id).unwrap();
  assert_eq!(membership.members, 0);
  assert!(!membership.joined);
}

#[test]
fn join_unknown_community_is_not_found() {
  let store = community_store(MemoryKV::new());
  assert_matches!(store.join("missing"), Err(StoreError::NotFound(_)));
}

#[test]
fn seed_membership_survives_reload() {
  let kv = MemoryKV::new();
  let store = community_store(kv.clone());
  store.join("comm-northern-trips").unwrap();

  let reloaded = community_store(kv);
  let community = reloaded.get("comm-northern-trips").unwrap();
  assert!(community.joined);
  assert_eq!(community.members, 1601);
  assert!(reloaded.is_seed("comm-northern-trips"));
}

#[test]
fn search_matches_name_area_and_description() {
  let store = community_store(MemoryKV::new());
  let names = |text: &str| -> Vec<String> {
    store.search(text).into_iter().map(|c| c.name).collect()
  };
  assert_eq!(names("cricket"), vec!["Cricket Fanatics Pakistan"]);
  assert_eq!(names("TOPI"), vec!["GIKians Connect"]);
  assert_eq!(names("travel companions"), vec!["Northern Area Trips"]);
  assert_eq!(names("").len(), 4);
  assert!(names("nothing like this").is_empty());
}

#[test]
fn nested_records_belong_to_their_community() {
  let store = community_store(MemoryKV::new());
  let id = store.add_community(new_community("Hikers")).unwrap();

  store.add_message(&id, new_message("hello")).unwrap();
  store
    .add_message("comm-gikians", new_message("seed communities take messages too"))
    .unwrap();

  let messages = store.list_messages(&id);
  assert_eq!(messages.len(), 1);
  assert_eq!(messages[0].message, "hello");
  assert_eq!(store.list_messages("comm-gikians").len(), 1);
  assert!(store.list_messages("comm-football").is_empty());
}

#[test]
fn nested_record_of_unknown_community_is_rejected() {
  let store = community_store(MemoryKV::new());
  assert_matches!(
    store.add_message("missing", new_message("hello")),
    Err(StoreError::ParentNotFound(_))
  );
  assert_matches!(
    store.delete_message("missing", "m"),
    Err(StoreError::ParentNotFound(_))
  );
}

#[test]
fn blank_message_is_rejected() {
  let store = community_store(MemoryKV::new());
  assert_matches!(
    store.add_message("comm-gikians", new_message(" ")),
    Err(StoreError::Validate(_))
  );
}

#[test]
fn delete_nested_record() {
  let store = community_store(MemoryKV::new());
  let message_id = store
    .add_message("comm-football", new_message("match on sunday"))
    .unwrap();
  let removed = store.delete_message("comm-football", &message_id).unwrap();
  assert_eq!(removed.id, message_id);
  assert!(store.list_messages("comm-football").is_empty());
  assert_matches!(
    store.delete_message("comm-football", &message_id),
    Err(StoreError::NotFound(_))
  );
}

fn add_one_of_each(store: &humqadam_store::CommunityStore<MemoryKV>, id: &str) {
  store.add_message(id, new_message("hello")).unwrap();
  store
    .add_announcement(
      id,
      NewAnnouncement {
        title: "Cleanup drive".to_string(),
        description: "Bring gloves".to_string(),
        date: "2025-04-01".to_string(),
        time: "9:00 AM".to_string(),
      },
    )
    .unwrap();
  store
    .add_professional(
      id,
      NewProfessional {
        name: "Dr. Sana".to_string(),
        profession: "Doctor".to_string(),
        specialty: "Pediatrics".to_string(),
        contact: "sana@example.com".to_string(),
        phone: None,
      },
    )
    .unwrap();
  store
    .add_business(
      id,
      NewBusiness {
        name: "Chai Dhaba".to_string(),
        kind: "Restaurant".to_string(),
        description: "Tea and parathas".to_string(),
        address: "Main Bazaar".to_string(),
        hours: "7 AM - 11 PM".to_string(),
      },
    )
    .unwrap();
  store
    .add_lost_found_item(
      id,
      NewLostFoundItem {
        kind: LostFoundKind::Lost,
        title: "Blue wallet".to_string(),
        description: "Near the mosque".to_string(),
        date: "2025-03-30".to_string(),
        contact: "0300-1234567".to_string(),
      },
    )
    .unwrap();
  store
    .add_campaign(
      id,
      NewCampaign {
        title: "Library fund".to_string(),
        description: "Books for the school".to_string(),
        goal: "PKR 200,000".to_string(),
        progress: 10,
        end_date: "2025-06-30".to_string(),
      },
    )
    .unwrap();
}

#[test]
fn delete_community_cascades_to_every_nested_kind() {
  let kv = MemoryKV::new();
  let store = community_store(kv.clone());
  let doomed = store.add_community(new_community("Hikers")).unwrap();
  let kept = store.add_community(new_community("Cyclists")).unwrap();
  add_one_of_each(&store, &doomed);
  add_one_of_each(&store, &kept);
  assert_eq!(store.nested_count(&doomed), 6);

  store.delete_community(&doomed).unwrap();
  assert!(store.get(&doomed).is_none());
  assert_eq!(store.nested_count(&doomed), 0);
  assert_eq!(store.nested_count(&kept), 6);
  assert!(store.list_campaigns(&doomed).is_empty());
  assert!(store.list_lost_found_items(&doomed).is_empty());

  let reloaded = community_store(kv);
  assert!(reloaded.get(&doomed).is_none());
  assert_eq!(reloaded.nested_count(&doomed), 0);
  assert_eq!(reloaded.nested_count(&kept), 6);
}

#[test]
fn lost_item_can_be_marked_found() {
  let store = community_store(MemoryKV::new());
  let item_id = store
    .add_lost_found_item(
      "comm-gikians",
      NewLostFoundItem {
        kind: LostFoundKind::Found,
        title: "Keys".to_string(),
        contact: "Security office".to_string(),
        ..Default::default()
      },
    )
    .unwrap();
  assert!(!store.list_lost_found_items("comm-gikians")[0].is_found);

  let item = store
    .set_lost_found_status("comm-gikians", &item_id, true)
    .unwrap();
  assert!(item.is_found);
  assert!(store.list_lost_found_items("comm-gikians")[0].is_found);
}

#[test]
fn campaign_progress_is_bounded() {
  let store = community_store(MemoryKV::new());
  let campaign_id = store
    .add_campaign(
      "comm-football",
      NewCampaign {
        title: "New goalposts".to_string(),
        description: "For the local ground".to_string(),
        goal: "PKR 50,000".to_string(),
        progress: 0,
        end_date: "2025-05-01".to_string(),
      },
    )
    .unwrap();

  let campaign = store
    .update_campaign_progress("comm-football", &campaign_id, 100)
    .unwrap();
  assert_eq!(campaign.progress, 100);
  assert_matches!(
    store.update_campaign_progress("comm-football", &campaign_id, 101),
    Err(StoreError::Validate(ValidateError::OutOfRange { .. }))
  );
  assert_eq!(store.list_campaigns("comm-football")[0].progress, 100);
}

#[tokio::test]
async fn community_changes_are_broadcast() {
  let store = community_store(MemoryKV::new());
  let mut rx = store.subscribe();
  let id = store.add_community(new_community("Hikers")).unwrap();
  let message_id = store.add_message(&id, new_message("hi")).unwrap();
  store.delete_community(&id).unwrap();

  assert_matches!(
    rx.recv().await.unwrap(),
    CommunityChange::DidCreateCommunity { community }
  );
  assert_eq!(community.id, id);
  assert_matches!(
    rx.recv().await.unwrap(),
    CommunityChange::DidCreateChild {
      community_id,
      kind: ChildKind::Message,
      child_id
    }
  );
  assert_eq!(community_id, id);
  assert_eq!(child_id, message_id);
  assert_matches!(
    rx.recv().await.unwrap(),
    CommunityChange::DidDeleteCommunity { community }
  );
  assert_eq!(community.id, id);
}

#[test]
fn retried_write_covers_every_community_slot() {
  setup_log();
  let kv = MemoryKV::with_quota(4096);
  kv.insert("filler", vec![0u8; 4000]).unwrap();
  let store = CommunityStore::new(DurableStore::new(kv.clone()), &test_config());
  store.init();
  let id = store.add_community(new_community("Hikers")).unwrap();
  store.add_message(&id, new_message("first hike")).unwrap();
  store.join("comm-cricket").unwrap();
  assert_eq!(store.durability(), Durability::SessionOnly);

  assert_matches!(
    store.try_persist(),
    Err(StoreError::Persistence(PersistenceError::QuotaExceeded { .. }))
  );

  kv.remove(b"filler").unwrap();
  store.try_persist().unwrap();
  assert_eq!(store.durability(), Durability::Persisted);

  let reloaded = community_store(kv);
  assert_eq!(reloaded.list_messages(&id).len(), 1);
  assert!(reloaded.get("comm-cricket").unwrap().joined);
}

#[test]
fn oversized_change_capacity_is_accepted() {
  setup_log();
  let config = StoreConfig {
    change_capacity: usize::MAX,
    ..test_config()
  };
  let store = CommunityStore::new(DurableStore::new(MemoryKV::new()), &config);
  store.init();
  let _rx = store.subscribe();
  store.add_community(new_community("Hikers")).unwrap();
  assert_eq!(store.list().len(), 5);
}
