use std::collections::BTreeMap;
use std::sync::Arc;

use humqadam_entity::{
  Announcement, Business, Campaign, Community, CommunityUpdate, Entity, IdGenerator, LostFoundItem,
  Membership, Message, NewAnnouncement, NewBusiness, NewCampaign, NewCommunity, NewEntity,
  NewLostFoundItem, NewMessage, NewProfessional, Professional, validate_campaign_progress,
};
use humqadam_persistence::kv::KVStore;
use humqadam_persistence::{DurableStore, Durability, SlotKey};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;

use crate::collection::{Collection, UserOrder};
use crate::config::{
  ANNOUNCEMENTS_COLLECTION, BUSINESSES_COLLECTION, CAMPAIGNS_COLLECTION, COMMUNITIES_COLLECTION,
  LOST_FOUND_COLLECTION, MEMBERSHIPS_COLLECTION, MESSAGES_COLLECTION, PROFESSIONALS_COLLECTION,
  StoreConfig,
};
use crate::error::StoreError;
use crate::nested::NestedCollections;
use crate::observe::{ChildKind, CommunityChange, CommunityChangeReceiver, CommunityChangeSender};
use crate::seed::default_communities;

struct CommunityState {
  communities: Collection<Community>,
  /// Membership of seed communities. Seed records are never written, so joining or leaving one
  /// is recorded here instead.
  memberships: BTreeMap<String, Membership>,
  messages: NestedCollections<Message>,
  announcements: NestedCollections<Announcement>,
  professionals: NestedCollections<Professional>,
  businesses: NestedCollections<Business>,
  lost_found_items: NestedCollections<LostFoundItem>,
  campaigns: NestedCollections<Campaign>,
}

impl CommunityState {
  fn with_membership(&self, community: &Community) -> Community {
    let mut community = community.clone();
    if let Some(membership) = self.memberships.get(&community.id) {
      community.apply_membership(*membership);
    }
    community
  }

  fn list(&self) -> Vec<Community> {
    self
      .communities
      .iter()
      .map(|community| self.with_membership(community))
      .collect()
  }

  fn get(&self, id: &str) -> Option<Community> {
    self
      .communities
      .get(id)
      .map(|community| self.with_membership(community))
  }

  fn require_parent(&self, community_id: &str) -> Result<(), StoreError> {
    if self.communities.contains(community_id) {
      Ok(())
    } else {
      Err(StoreError::ParentNotFound(community_id.to_string()))
    }
  }

  /// Drops child groups whose community no longer exists.
  fn drop_orphans(&mut self) -> usize {
    let communities = &self.communities;
    let exists = |id: &str| communities.contains(id);
    self.messages.retain_parents(exists)
      + self.announcements.retain_parents(exists)
      + self.professionals.retain_parents(exists)
      + self.businesses.retain_parents(exists)
      + self.lost_found_items.retain_parents(exists)
      + self.campaigns.retain_parents(exists)
  }
}

/// A record kind nested under a community.
trait CommunityChild: Entity {
  const KIND: ChildKind;

  fn children(state: &CommunityState) -> &NestedCollections<Self>;

  fn children_mut(state: &mut CommunityState) -> &mut NestedCollections<Self>;
}

struct ChildSlot {
  slot: SlotKey,
  id_gen: Arc<dyn IdGenerator>,
}

fn child_collection(kind: ChildKind) -> &'static str {
  match kind {
    ChildKind::Message => MESSAGES_COLLECTION,
    ChildKind::Announcement => ANNOUNCEMENTS_COLLECTION,
    ChildKind::Professional => PROFESSIONALS_COLLECTION,
    ChildKind::Business => BUSINESSES_COLLECTION,
    ChildKind::LostFoundItem => LOST_FOUND_COLLECTION,
    ChildKind::Campaign => CAMPAIGNS_COLLECTION,
  }
}

/// Communities, the records nested under each of them, and membership.
///
/// Every operation runs under one lock over the whole state, so deleting a community and its
/// children is observed as a single change.
pub struct CommunityStore<S> {
  state: RwLock<CommunityState>,
  durable: DurableStore<S>,
  communities_slot: SlotKey,
  memberships_slot: SlotKey,
  child_slots: [ChildSlot; 6],
  id_gen: Arc<dyn IdGenerator>,
  durability: Mutex<Durability>,
  change_tx: CommunityChangeSender,
}

impl<S> CommunityStore<S>
where
  S: KVStore,
{
  pub fn new(durable: DurableStore<S>, config: &StoreConfig) -> Self {
    Self::with_seeds(durable, config, default_communities())
  }

  pub fn with_seeds(durable: DurableStore<S>, config: &StoreConfig, seeds: Vec<Community>) -> Self {
    let child_slots = ChildKind::ALL.map(|kind| ChildSlot {
      slot: config.slot(child_collection(kind)),
      id_gen: config.id_generator(child_collection(kind)),
    });
    let (change_tx, _) = broadcast::channel(config.channel_capacity());
    let state = CommunityState {
      communities: Collection::new(seeds, UserOrder::OldestFirst),
      memberships: BTreeMap::new(),
      messages: NestedCollections::default(),
      announcements: NestedCollections::default(),
      professionals: NestedCollections::default(),
      businesses: NestedCollections::default(),
      lost_found_items: NestedCollections::default(),
      campaigns: NestedCollections::default(),
    };
    Self {
      state: RwLock::new(state),
      durable,
      communities_slot: config.slot(COMMUNITIES_COLLECTION),
      memberships_slot: config.slot(MEMBERSHIPS_COLLECTION),
      child_slots,
      id_gen: config.id_generator(COMMUNITIES_COLLECTION),
      durability: Mutex::new(Durability::Persisted),
      change_tx,
    }
  }

  /// Loads user communities, the membership overlay and every child kind from storage.
  pub fn init(&self) -> usize {
    let mut state = self.state.write();
    let communities = self
      .durable
      .load_entities::<Community, _>(&self.communities_slot, |id| state.communities.is_seed(id))
      .unwrap_or_default();
    state.communities.set_user_entities(communities);

    let mut memberships = self
      .durable
      .load::<BTreeMap<String, Membership>>(&self.memberships_slot)
      .unwrap_or_default();
    memberships.retain(|id, _| state.communities.is_seed(id));
    state.memberships = memberships;

    state.messages = self.load_children();
    state.announcements = self.load_children();
    state.professionals = self.load_children();
    state.businesses = self.load_children();
    state.lost_found_items = self.load_children();
    state.campaigns = self.load_children();

    let orphans = state.drop_orphans();
    if orphans > 0 {
      tracing::warn!("dropped {} child groups without a community", orphans);
    }

    let count = state.communities.user_entities().len();
    tracing::trace!("loaded {} user communities", count);
    count
  }

  pub fn list(&self) -> Vec<Community> {
    self.state.read().list()
  }

  pub fn get(&self, id: &str) -> Option<Community> {
    self.state.read().get(id)
  }

  pub fn is_seed(&self, id: &str) -> bool {
    self.state.read().communities.is_seed(id)
  }

  pub fn my_communities(&self) -> Vec<Community> {
    self.list().into_iter().filter(|c| c.joined).collect()
  }

  pub fn discover(&self) -> Vec<Community> {
    self.list().into_iter().filter(|c| !c.joined).collect()
  }

  /// Case insensitive match on name, area and description.
  pub fn search(&self, text: &str) -> Vec<Community> {
    let text = text.trim().to_lowercase();
    self
      .list()
      .into_iter()
      .filter(|c| {
        text.is_empty()
          || c.name.to_lowercase().contains(&text)
          || c.area.to_lowercase().contains(&text)
          || c.description.to_lowercase().contains(&text)
      })
      .collect()
  }

  /// Creates a community with its creator as the only member.
  pub fn add_community(&self, new: NewCommunity) -> Result<String, StoreError> {
    let mut state = self.state.write();
    let community = state.communities.insert_new(new, self.id_gen.as_ref())?;
    tracing::debug!("add community {}", community.id);
    let durability = self.save_communities(&state);
    self.record(durability);
    let id = community.id.clone();
    let _ = self
      .change_tx
      .send(CommunityChange::DidCreateCommunity { community });
    Ok(id)
  }

  pub fn update_community(
    &self,
    id: &str,
    update: CommunityUpdate,
  ) -> Result<Community, StoreError> {
    update.validate()?;
    let mut state = self.state.write();
    let community = state
      .communities
      .update_with(id, |community| community.apply_update(update))
      .inspect_err(|err| tracing::warn!("reject update of community {}: {}", id, err))?;
    let durability = self.save_communities(&state);
    self.record(durability);
    let _ = self.change_tx.send(CommunityChange::DidUpdateCommunity {
      community: community.clone(),
    });
    Ok(community)
  }

  /// Deletes a user community together with every record nested under it.
  pub fn delete_community(&self, id: &str) -> Result<Community, StoreError> {
    let mut state = self.state.write();
    let community = state
      .communities
      .remove(id)
      .inspect_err(|err| tracing::warn!("reject delete of community {}: {}", id, err))?;

    let mut removed = 0;
    removed += state.messages.remove_parent(id).len();
    removed += state.announcements.remove_parent(id).len();
    removed += state.professionals.remove_parent(id).len();
    removed += state.businesses.remove_parent(id).len();
    removed += state.lost_found_items.remove_parent(id).len();
    removed += state.campaigns.remove_parent(id).len();
    state.memberships.remove(id);
    tracing::debug!("delete community {} and {} nested records", id, removed);

    let mut durability = vec![
      self.save_communities(&state),
      self.durable.save(&self.memberships_slot, &state.memberships),
    ];
    durability.push(self.save_children::<Message>(&state));
    durability.push(self.save_children::<Announcement>(&state));
    durability.push(self.save_children::<Professional>(&state));
    durability.push(self.save_children::<Business>(&state));
    durability.push(self.save_children::<LostFoundItem>(&state));
    durability.push(self.save_children::<Campaign>(&state));
    self.record_all(durability);

    let _ = self.change_tx.send(CommunityChange::DidDeleteCommunity {
      community: community.clone(),
    });
    Ok(community)
  }

  pub fn join(&self, id: &str) -> Result<Membership, StoreError> {
    self.update_membership(id, Membership::join)
  }

  /// Never drives the member count below zero.
  pub fn leave(&self, id: &str) -> Result<Membership, StoreError> {
    self.update_membership(id, Membership::leave)
  }

  fn update_membership<F>(&self, id: &str, f: F) -> Result<Membership, StoreError>
  where
    F: FnOnce(Membership) -> Membership,
  {
    let mut state = self.state.write();
    let current = state
      .get(id)
      .ok_or_else(|| StoreError::NotFound(id.to_string()))?
      .membership();
    let membership = f(current);
    let durability = if state.communities.is_seed(id) {
      state.memberships.insert(id.to_string(), membership);
      self.durable.save(&self.memberships_slot, &state.memberships)
    } else {
      state
        .communities
        .update_with(id, |community| community.apply_membership(membership))?;
      self.save_communities(&state)
    };
    self.record(durability);
    tracing::debug!(
      "community {} membership: joined={}, members={}",
      id,
      membership.joined,
      membership.members
    );
    let _ = self.change_tx.send(CommunityChange::DidUpdateMembership {
      community_id: id.to_string(),
      membership,
    });
    Ok(membership)
  }

  pub fn set_lost_found_status(
    &self,
    community_id: &str,
    item_id: &str,
    is_found: bool,
  ) -> Result<LostFoundItem, StoreError> {
    self.update_child::<LostFoundItem, _>(community_id, item_id, |item| item.is_found = is_found)
  }

  pub fn update_campaign_progress(
    &self,
    community_id: &str,
    campaign_id: &str,
    progress: u32,
  ) -> Result<Campaign, StoreError> {
    validate_campaign_progress(progress)?;
    self.update_child::<Campaign, _>(community_id, campaign_id, |campaign| {
      campaign.progress = progress
    })
  }

  /// Number of records nested under `community_id`, across all kinds.
  pub fn nested_count(&self, community_id: &str) -> usize {
    let state = self.state.read();
    state.messages.list(community_id).len()
      + state.announcements.list(community_id).len()
      + state.professionals.list(community_id).len()
      + state.businesses.list(community_id).len()
      + state.lost_found_items.list(community_id).len()
      + state.campaigns.list(community_id).len()
  }

  /// Writes every slot again and returns the first storage error instead of logging it.
  pub fn try_persist(&self) -> Result<(), StoreError> {
    let state = self.state.read();
    let result = self.try_save_all(&state);
    self.record(match &result {
      Ok(_) => Durability::Persisted,
      Err(_) => Durability::SessionOnly,
    });
    result
  }

  pub fn durability(&self) -> Durability {
    *self.durability.lock()
  }

  pub fn subscribe(&self) -> CommunityChangeReceiver {
    self.change_tx.subscribe()
  }

  fn add_child<N>(&self, community_id: &str, new: N) -> Result<String, StoreError>
  where
    N: NewEntity,
    N::Entity: CommunityChild,
  {
    let mut state = self.state.write();
    state.require_parent(community_id)?;
    let kind = <N::Entity as CommunityChild>::KIND;
    let id_gen = self.child_slot(kind).id_gen.clone();
    let child = <N::Entity as CommunityChild>::children_mut(&mut state).insert_new(
      community_id,
      new,
      id_gen.as_ref(),
    )?;
    let child_id = child.id().to_string();
    tracing::debug!("add {:?} {} to community {}", kind, child_id, community_id);
    let durability = self.save_children::<N::Entity>(&state);
    self.record(durability);
    let _ = self.change_tx.send(CommunityChange::DidCreateChild {
      community_id: community_id.to_string(),
      kind,
      child_id: child_id.clone(),
    });
    Ok(child_id)
  }

  fn list_children<T: CommunityChild>(&self, community_id: &str) -> Vec<T> {
    T::children(&self.state.read()).list(community_id).to_vec()
  }

  fn update_child<T, F>(&self, community_id: &str, child_id: &str, f: F) -> Result<T, StoreError>
  where
    T: CommunityChild,
    F: FnOnce(&mut T),
  {
    let mut state = self.state.write();
    state.require_parent(community_id)?;
    let child = T::children_mut(&mut state).update_with(community_id, child_id, f)?;
    let durability = self.save_children::<T>(&state);
    self.record(durability);
    let _ = self.change_tx.send(CommunityChange::DidUpdateChild {
      community_id: community_id.to_string(),
      kind: T::KIND,
      child_id: child_id.to_string(),
    });
    Ok(child)
  }

  fn delete_child<T: CommunityChild>(
    &self,
    community_id: &str,
    child_id: &str,
  ) -> Result<T, StoreError> {
    let mut state = self.state.write();
    state.require_parent(community_id)?;
    let child = T::children_mut(&mut state)
      .remove(community_id, child_id)
      .inspect_err(|err| tracing::warn!("reject delete of {:?} {}: {}", T::KIND, child_id, err))?;
    let durability = self.save_children::<T>(&state);
    self.record(durability);
    let _ = self.change_tx.send(CommunityChange::DidDeleteChild {
      community_id: community_id.to_string(),
      kind: T::KIND,
      child_id: child_id.to_string(),
    });
    Ok(child)
  }

  fn child_slot(&self, kind: ChildKind) -> &ChildSlot {
    &self.child_slots[kind as usize]
  }

  fn load_children<T: CommunityChild>(&self) -> NestedCollections<T> {
    self
      .durable
      .load_nested::<T>(&self.child_slot(T::KIND).slot)
      .map(NestedCollections::from)
      .unwrap_or_default()
  }

  fn save_children<T: CommunityChild>(&self, state: &CommunityState) -> Durability {
    self
      .durable
      .save(&self.child_slot(T::KIND).slot, T::children(state))
  }

  fn try_save_all(&self, state: &CommunityState) -> Result<(), StoreError> {
    self
      .durable
      .try_save(&self.communities_slot, state.communities.user_entities())?;
    self
      .durable
      .try_save(&self.memberships_slot, &state.memberships)?;
    self.try_save_children::<Message>(state)?;
    self.try_save_children::<Announcement>(state)?;
    self.try_save_children::<Professional>(state)?;
    self.try_save_children::<Business>(state)?;
    self.try_save_children::<LostFoundItem>(state)?;
    self.try_save_children::<Campaign>(state)?;
    Ok(())
  }

  fn try_save_children<T: CommunityChild>(&self, state: &CommunityState) -> Result<(), StoreError> {
    Ok(
      self
        .durable
        .try_save(&self.child_slot(T::KIND).slot, T::children(state))?,
    )
  }

  fn save_communities(&self, state: &CommunityState) -> Durability {
    self
      .durable
      .save(&self.communities_slot, state.communities.user_entities())
  }

  fn record(&self, durability: Durability) {
    *self.durability.lock() = durability;
  }

  fn record_all(&self, durability: Vec<Durability>) {
    let all_persisted = durability.iter().all(Durability::is_persisted);
    self.record(if all_persisted {
      Durability::Persisted
    } else {
      Durability::SessionOnly
    });
  }
}

macro_rules! community_child {
  ($ty:ty, $new:ty, $kind:expr, $field:ident, $add:ident, $list:ident, $delete:ident) => {
    impl CommunityChild for $ty {
      const KIND: ChildKind = $kind;

      fn children(state: &CommunityState) -> &NestedCollections<Self> {
        &state.$field
      }

      fn children_mut(state: &mut CommunityState) -> &mut NestedCollections<Self> {
        &mut state.$field
      }
    }

    impl<S> CommunityStore<S>
    where
      S: KVStore,
    {
      pub fn $add(&self, community_id: &str, new: $new) -> Result<String, StoreError> {
        self.add_child(community_id, new)
      }

      pub fn $list(&self, community_id: &str) -> Vec<$ty> {
        self.list_children::<$ty>(community_id)
      }

      pub fn $delete(&self, community_id: &str, child_id: &str) -> Result<$ty, StoreError> {
        self.delete_child::<$ty>(community_id, child_id)
      }
    }
  };
}

community_child!(
  Message,
  NewMessage,
  ChildKind::Message,
  messages,
  add_message,
  list_messages,
  delete_message
);
community_child!(
  Announcement,
  NewAnnouncement,
  ChildKind::Announcement,
  announcements,
  add_announcement,
  list_announcements,
  delete_announcement
);
community_child!(
  Professional,
  NewProfessional,
  ChildKind::Professional,
  professionals,
  add_professional,
  list_professionals,
  delete_professional
);
community_child!(
  Business,
  NewBusiness,
  ChildKind::Business,
  businesses,
  add_business,
  list_businesses,
  delete_business
);
community_child!(
  LostFoundItem,
  NewLostFoundItem,
  ChildKind::LostFoundItem,
  lost_found_items,
  add_lost_found_item,
  list_lost_found_items,
  delete_lost_found_item
);
community_child!(
  Campaign,
  NewCampaign,
  ChildKind::Campaign,
  campaigns,
  add_campaign,
  list_campaigns,
  delete_campaign
);
