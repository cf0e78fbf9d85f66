use std::path::Path;
use std::sync::Arc;

use humqadam_entity::{
  Comment, IdGenerator, NewComment, NewStory, Reaction, ReactionKind, Story, avatar_url,
};
use humqadam_persistence::kv::KVStore;
use humqadam_persistence::{DurableStore, Durability, SlotKey};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;

use crate::collection::{Collection, UserOrder};
use crate::config::{
  STORIES_COLLECTION, STORY_COMMENTS_COLLECTION, STORY_REACTIONS_COLLECTION, StoreConfig,
};
use crate::error::StoreError;
use crate::image::embed_image;
use crate::nested::NestedCollections;
use crate::observe::{StoryChange, StoryChangeReceiver, StoryChangeSender};
use crate::seed::default_stories;

pub const DEFAULT_COMMENT_USER: &str = "You";
pub const NEW_COMMENT_TIMESTAMP: &str = "Just now";
const STORY_DATE_FORMAT: &str = "%B %-d, %Y";

struct StoryState {
  stories: Collection<Story>,
  comments: NestedCollections<Comment>,
  reactions: NestedCollections<Reaction>,
}

impl StoryState {
  /// The story with the engagement stored next to it folded in. Newer comments come first.
  fn merged(&self, story: &Story) -> Story {
    let mut story = story.clone();
    let reactions = self.reactions.list(&story.id);
    story
      .reactions
      .retain(|own| !reactions.iter().any(|r| r.user_id == own.user_id));
    story.reactions.extend(reactions.iter().cloned());

    let mut comments: Vec<Comment> = self.comments.list(&story.id).iter().rev().cloned().collect();
    comments.append(&mut story.comments);
    story.comments = comments;
    story
  }

  fn get(&self, id: &str) -> Option<Story> {
    self.stories.get(id).map(|story| self.merged(story))
  }

  /// Moves reactions and comments that older data stored inside user story records into the
  /// nested collections. Returns true if anything moved.
  fn migrate_inline_engagement(&mut self) -> bool {
    let inline: Vec<Story> = self
      .stories
      .user_entities()
      .iter()
      .filter(|story| !story.reactions.is_empty() || !story.comments.is_empty())
      .cloned()
      .collect();
    for story in &inline {
      for reaction in &story.reactions {
        self.reactions.upsert(&story.id, reaction.clone());
      }
      // Inline comments are stored newest first.
      for comment in story.comments.iter().rev() {
        if !self.comments.contains_child(&comment.id) {
          self.comments.upsert(&story.id, comment.clone());
        }
      }
      let _ = self.stories.update_with(&story.id, |story| {
        story.reactions.clear();
        story.comments.clear();
      });
    }
    !inline.is_empty()
  }
}

/// Community stories with per-user reactions and comments.
///
/// Engagement is kept apart from the story records, keyed by story id, so seed stories can be
/// reacted to and commented on while their records stay untouched.
pub struct StoryStore<S> {
  state: RwLock<StoryState>,
  durable: DurableStore<S>,
  stories_slot: SlotKey,
  comments_slot: SlotKey,
  reactions_slot: SlotKey,
  story_id_gen: Arc<dyn IdGenerator>,
  comment_id_gen: Arc<dyn IdGenerator>,
  durability: Mutex<Durability>,
  change_tx: StoryChangeSender,
}

impl<S> StoryStore<S>
where
  S: KVStore,
{
  pub fn new(durable: DurableStore<S>, config: &StoreConfig) -> Self {
    Self::with_seeds(durable, config, default_stories())
  }

  pub fn with_seeds(durable: DurableStore<S>, config: &StoreConfig, seeds: Vec<Story>) -> Self {
    let (change_tx, _) = broadcast::channel(config.channel_capacity());
    Self {
      state: RwLock::new(StoryState {
        stories: Collection::new(seeds, UserOrder::OldestFirst),
        comments: NestedCollections::default(),
        reactions: NestedCollections::default(),
      }),
      durable,
      stories_slot: config.slot(STORIES_COLLECTION),
      comments_slot: config.slot(STORY_COMMENTS_COLLECTION),
      reactions_slot: config.slot(STORY_REACTIONS_COLLECTION),
      story_id_gen: config.id_generator(STORIES_COLLECTION),
      comment_id_gen: config.id_generator(STORY_COMMENTS_COLLECTION),
      durability: Mutex::new(Durability::Persisted),
      change_tx,
    }
  }

  pub fn init(&self) -> usize {
    let mut state = self.state.write();
    let stories = self
      .durable
      .load_entities::<Story, _>(&self.stories_slot, |id| state.stories.is_seed(id))
      .unwrap_or_default();
    // The first version of the app saved its generated sample stories next to the user's own.
    let (stories, samples): (Vec<Story>, Vec<Story>) =
      stories.into_iter().partition(|story| story.is_user_story);
    if !samples.is_empty() {
      tracing::debug!("dropped {} stored sample stories", samples.len());
    }
    state.stories.set_user_entities(stories);
    state.comments = self
      .durable
      .load_nested::<Comment>(&self.comments_slot)
      .map(NestedCollections::from)
      .unwrap_or_default();
    state.reactions = self
      .durable
      .load_nested::<Reaction>(&self.reactions_slot)
      .map(NestedCollections::from)
      .unwrap_or_default();

    let StoryState {
      stories,
      comments,
      reactions,
    } = &mut *state;
    let orphans = comments.retain_parents(|id| stories.contains(id))
      + reactions.retain_parents(|id| stories.contains(id));
    if orphans > 0 {
      tracing::warn!("dropped engagement of {} missing stories", orphans);
    }

    let migrated = state.migrate_inline_engagement();
    if migrated {
      tracing::debug!("moved inline story engagement into nested collections");
    }
    if migrated || !samples.is_empty() {
      let durability = self.save_all(&state);
      self.record(durability);
    }

    let count = state.stories.user_entities().len();
    tracing::trace!("loaded {} user stories", count);
    count
  }

  pub fn list(&self) -> Vec<Story> {
    let state = self.state.read();
    state
      .stories
      .iter()
      .map(|story| state.merged(story))
      .collect()
  }

  pub fn get(&self, id: &str) -> Option<Story> {
    self.state.read().get(id)
  }

  pub fn is_seed(&self, id: &str) -> bool {
    self.state.read().stories.is_seed(id)
  }

  /// Adds a story written by the user. A blank date becomes today's date.
  pub fn add_story(&self, mut new: NewStory) -> Result<String, StoreError> {
    if new.date.trim().is_empty() {
      new.date = chrono::Local::now().format(STORY_DATE_FORMAT).to_string();
    }
    let mut state = self.state.write();
    let story = state.stories.insert_new(new, self.story_id_gen.as_ref())?;
    tracing::debug!("add story {}", story.id);
    let durability = self.save_stories(&state);
    self.record(durability);
    let _ = self.change_tx.send(StoryChange::DidCreateStory {
      story_id: story.id.clone(),
    });
    Ok(story.id)
  }

  /// Embeds the image at `path` into the story, then adds it.
  pub async fn add_story_with_image<P: AsRef<Path>>(
    &self,
    mut new: NewStory,
    path: P,
  ) -> Result<String, StoreError> {
    let image = embed_image(path).await?;
    new.image_url = Some(image.url().to_string());
    self.add_story(new)
  }

  /// Deletes a user story along with its reactions and comments.
  pub fn delete_story(&self, id: &str) -> Result<Story, StoreError> {
    let mut state = self.state.write();
    let story = state
      .stories
      .remove(id)
      .inspect_err(|err| tracing::warn!("reject delete of story {}: {}", id, err))?;
    let comments = state.comments.remove_parent(id).len();
    let reactions = state.reactions.remove_parent(id).len();
    tracing::debug!(
      "delete story {} with {} comments and {} reactions",
      id,
      comments,
      reactions
    );
    let durability = self.save_all(&state);
    self.record(durability);
    let _ = self.change_tx.send(StoryChange::DidDeleteStory {
      story_id: id.to_string(),
    });
    Ok(story)
  }

  /// Each user holds at most one reaction per story. Reacting with the current kind removes it,
  /// reacting with another kind replaces it. Returns the user's reaction afterwards.
  pub fn react(
    &self,
    story_id: &str,
    user_id: &str,
    kind: ReactionKind,
  ) -> Result<Option<ReactionKind>, StoreError> {
    let mut state = self.state.write();
    let current = state
      .get(story_id)
      .ok_or_else(|| StoreError::NotFound(story_id.to_string()))?
      .reaction_of(user_id);

    let reaction = if current == Some(kind) {
      state.reactions.remove(story_id, user_id)?;
      None
    } else {
      state.reactions.upsert(
        story_id,
        Reaction {
          user_id: user_id.to_string(),
          kind,
        },
      );
      Some(kind)
    };
    tracing::debug!("{} reacts to story {}: {:?}", user_id, story_id, reaction);
    let durability = self.durable.save(&self.reactions_slot, &state.reactions);
    self.record(durability);
    let _ = self.change_tx.send(StoryChange::DidUpdateEngagement {
      story_id: story_id.to_string(),
    });
    Ok(reaction)
  }

  /// Reactions of `kind`, or of any kind when `None`. Zero for an unknown story.
  pub fn reaction_count(&self, story_id: &str, kind: Option<ReactionKind>) -> usize {
    self
      .get(story_id)
      .map(|story| story.reaction_count(kind))
      .unwrap_or(0)
  }

  pub fn user_reaction(&self, story_id: &str, user_id: &str) -> Option<ReactionKind> {
    self.get(story_id)?.reaction_of(user_id)
  }

  /// Adds a comment as `user`, or as "You" when blank. Blank text is rejected.
  pub fn add_comment(&self, story_id: &str, user: &str, text: &str) -> Result<String, StoreError> {
    let user = if user.trim().is_empty() {
      DEFAULT_COMMENT_USER
    } else {
      user
    };
    let new = NewComment {
      user: user.to_string(),
      avatar: avatar_url(user),
      text: text.to_string(),
      timestamp: NEW_COMMENT_TIMESTAMP.to_string(),
    };

    let mut state = self.state.write();
    if !state.stories.contains(story_id) {
      return Err(StoreError::ParentNotFound(story_id.to_string()));
    }
    let comment = state
      .comments
      .insert_new(story_id, new, self.comment_id_gen.as_ref())?;
    tracing::debug!("add comment {} to story {}", comment.id, story_id);
    let durability = self.durable.save(&self.comments_slot, &state.comments);
    self.record(durability);
    let _ = self.change_tx.send(StoryChange::DidUpdateEngagement {
      story_id: story_id.to_string(),
    });
    Ok(comment.id)
  }

  /// Stories whose author or category contains `text`, case insensitive.
  pub fn search(&self, text: &str) -> Vec<Story> {
    let text = text.trim();
    self
      .list()
      .into_iter()
      .filter(|story| story.matches(text))
      .collect()
  }

  /// Like [StoryStore::search], limited to stories the user wrote.
  pub fn my_stories(&self, text: &str) -> Vec<Story> {
    self
      .search(text)
      .into_iter()
      .filter(|story| story.is_user_story)
      .collect()
  }

  /// Writes stories, comments and reactions again and returns the first storage error instead
  /// of logging it.
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

  pub fn subscribe(&self) -> StoryChangeReceiver {
    self.change_tx.subscribe()
  }

  fn save_stories(&self, state: &StoryState) -> Durability {
    self
      .durable
      .save(&self.stories_slot, state.stories.user_entities())
  }

  fn save_all(&self, state: &StoryState) -> Durability {
    let results = [
      self.save_stories(state),
      self.durable.save(&self.comments_slot, &state.comments),
      self.durable.save(&self.reactions_slot, &state.reactions),
    ];
    if results.iter().all(Durability::is_persisted) {
      Durability::Persisted
    } else {
      Durability::SessionOnly
    }
  }

  fn try_save_all(&self, state: &StoryState) -> Result<(), StoreError> {
    self
      .durable
      .try_save(&self.stories_slot, state.stories.user_entities())?;
    self.durable.try_save(&self.comments_slot, &state.comments)?;
    self.durable.try_save(&self.reactions_slot, &state.reactions)?;
    Ok(())
  }

  fn record(&self, durability: Durability) {
    *self.durability.lock() = durability;
  }
}
