use humqadam_entity::{NewCommunity, NewMessage, ReactionKind};
use humqadam_persistence::DurableStore;
use humqadam_store::{CommunityStore, StoryStore};

use crate::store_test::util::{open_sled, temp_dir, test_config};

#[test]
fn community_state_survives_reopening_sled() {
  let dir = temp_dir();
  let config = test_config();
  let (community_id, message_id) = {
    let store = CommunityStore::new(DurableStore::new(open_sled(&dir)), &config);
    store.init();
    let community_id = store
      .add_community(NewCommunity {
        name: "Hikers".to_string(),
        area: "Islamabad".to_string(),
        description: "Weekend hikes".to_string(),
        image: String::new(),
      })
      .unwrap();
    let message_id = store
      .add_message(
        &community_id,
        NewMessage {
          user: "You".to_string(),
          message: "Trail 5 on saturday?".to_string(),
          ..Default::default()
        },
      )
      .unwrap();
    store.join("comm-cricket").unwrap();
    (community_id, message_id)
  };

  let store = CommunityStore::new(DurableStore::new(open_sled(&dir)), &config);
  assert_eq!(store.init(), 1);
  assert_eq!(store.get(&community_id).unwrap().name, "Hikers");
  assert_eq!(store.list_messages(&community_id)[0].id, message_id);
  assert!(store.get("comm-cricket").unwrap().joined);
  assert_eq!(store.list().len(), 5);
}

#[test]
fn story_engagement_survives_reopening_sled() {
  let dir = temp_dir();
  let config = test_config();
  {
    let store = StoryStore::new(DurableStore::new(open_sled(&dir)), &config);
    store.init();
    store.react("story-1", "user-1", ReactionKind::Love).unwrap();
  }

  let store = StoryStore::new(DurableStore::new(open_sled(&dir)), &config);
  store.init();
  assert_eq!(store.user_reaction("story-1", "user-1"), Some(ReactionKind::Love));
}
