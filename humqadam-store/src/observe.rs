use humqadam_entity::{Community, Membership};
use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub enum EntityChange<T> {
  DidCreate { entity: T },
  DidUpdate { entity: T },
  DidDelete { entity: T },
}

pub type EntityChangeSender<T> = broadcast::Sender<EntityChange<T>>;
pub type EntityChangeReceiver<T> = broadcast::Receiver<EntityChange<T>>;

/// The kinds of records nested under a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
  Message,
  Announcement,
  Professional,
  Business,
  LostFoundItem,
  Campaign,
}

impl ChildKind {
  pub const ALL: [ChildKind; 6] = [
    ChildKind::Message,
    ChildKind::Announcement,
    ChildKind::Professional,
    ChildKind::Business,
    ChildKind::LostFoundItem,
    ChildKind::Campaign,
  ];
}

#[derive(Debug, Clone)]
pub enum CommunityChange {
  DidCreateCommunity {
    community: Community,
  },
  DidUpdateCommunity {
    community: Community,
  },
  /// The community and every child it owned are gone.
  DidDeleteCommunity {
    community: Community,
  },
  DidUpdateMembership {
    community_id: String,
    membership: Membership,
  },
  DidCreateChild {
    community_id: String,
    kind: ChildKind,
    child_id: String,
  },
  DidUpdateChild {
    community_id: String,
    kind: ChildKind,
    child_id: String,
  },
  DidDeleteChild {
    community_id: String,
    kind: ChildKind,
    child_id: String,
  },
}

pub type CommunityChangeSender = broadcast::Sender<CommunityChange>;
pub type CommunityChangeReceiver = broadcast::Receiver<CommunityChange>;

#[derive(Debug, Clone)]
pub enum StoryChange {
  DidCreateStory { story_id: String },
  DidDeleteStory { story_id: String },
  DidUpdateEngagement { story_id: String },
}

pub type StoryChangeSender = broadcast::Sender<StoryChange>;
pub type StoryChangeReceiver = broadcast::Receiver<StoryChange>;
