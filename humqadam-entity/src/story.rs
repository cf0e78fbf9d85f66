use serde::{Deserialize, Serialize};

use crate::define::{Entity, NewEntity, deserialize_id, require};
use crate::error::ValidateError;

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Story {
  #[serde(deserialize_with = "deserialize_id")]
  pub id: String,
  pub name: String,
  pub location: String,
  pub content: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  pub category: String,
  pub date: String,
  pub is_user_story: bool,
  #[serde(default)]
  pub reactions: Vec<Reaction>,
  #[serde(default)]
  pub comments: Vec<Comment>,
}

impl Entity for Story {
  fn id(&self) -> &str {
    &self.id
  }
}

impl Story {
  pub fn reaction_count(&self, kind: Option<ReactionKind>) -> usize {
    match kind {
      None => self.reactions.len(),
      Some(kind) => self.reactions.iter().filter(|r| r.kind == kind).count(),
    }
  }

  pub fn reaction_of(&self, user_id: &str) -> Option<ReactionKind> {
    self
      .reactions
      .iter()
      .find(|r| r.user_id == user_id)
      .map(|r| r.kind)
  }

  /// Case insensitive match against the author name and the category.
  pub fn matches(&self, text: &str) -> bool {
    let text = text.to_lowercase();
    self.name.to_lowercase().contains(&text) || self.category.to_lowercase().contains(&text)
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
  Like,
  Love,
  Support,
}

/// One user's reaction to a story. A user holds at most one reaction per story, so the user id
/// doubles as the reaction's id.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
  pub user_id: String,
  #[serde(rename = "type")]
  pub kind: ReactionKind,
}

impl Entity for Reaction {
  fn id(&self) -> &str {
    &self.user_id
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Comment {
  #[serde(deserialize_with = "deserialize_id")]
  pub id: String,
  pub user: String,
  pub avatar: String,
  pub text: String,
  pub timestamp: String,
}

impl Entity for Comment {
  fn id(&self) -> &str {
    &self.id
  }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct NewComment {
  pub user: String,
  pub avatar: String,
  pub text: String,
  pub timestamp: String,
}

impl NewEntity for NewComment {
  type Entity = Comment;

  fn validate(&self) -> Result<(), ValidateError> {
    require("text", &self.text)
  }

  fn into_entity(self, id: String) -> Comment {
    Comment {
      id,
      user: self.user,
      avatar: self.avatar,
      text: self.text,
      timestamp: self.timestamp,
    }
  }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct NewStory {
  pub name: String,
  pub location: String,
  pub content: String,
  /// An embedded `data:` url or a remote url. Uploads must be embedded before the story is added.
  pub image_url: Option<String>,
  pub category: String,
  pub date: String,
}

pub const DEFAULT_STORY_CATEGORY: &str = "Personal Growth";

impl NewEntity for NewStory {
  type Entity = Story;

  fn validate(&self) -> Result<(), ValidateError> {
    require("name", &self.name)?;
    require("content", &self.content)
  }

  fn into_entity(self, id: String) -> Story {
    let category = if self.category.trim().is_empty() {
      DEFAULT_STORY_CATEGORY.to_string()
    } else {
      self.category
    };
    Story {
      id,
      name: self.name,
      location: self.location,
      content: self.content,
      image_url: self.image_url,
      category,
      date: self.date,
      is_user_story: true,
      reactions: vec![],
      comments: vec![],
    }
  }
}
