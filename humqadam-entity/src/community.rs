use serde::{Deserialize, Serialize};

use crate::define::{Entity, NewEntity, require};
use crate::error::ValidateError;

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Community {
  pub id: String,
  pub name: String,
  pub area: String,
  pub members: u64,
  pub description: String,
  pub image: String,
  pub joined: bool,
}

impl Entity for Community {
  fn id(&self) -> &str {
    &self.id
  }
}

impl Community {
  pub fn membership(&self) -> Membership {
    Membership {
      joined: self.joined,
      members: self.members,
    }
  }

  pub fn apply_membership(&mut self, membership: Membership) {
    self.joined = membership.joined;
    self.members = membership.members;
  }

  pub fn apply_update(&mut self, update: CommunityUpdate) {
    if let Some(name) = update.name {
      self.name = name;
    }
    if let Some(area) = update.area {
      self.area = area;
    }
    if let Some(description) = update.description {
      self.description = description;
    }
    if let Some(image) = update.image {
      self.image = image;
    }
  }
}

/// Fields a user fills in when creating a community. The creator is its first member.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct NewCommunity {
  pub name: String,
  pub area: String,
  pub description: String,
  pub image: String,
}

impl NewEntity for NewCommunity {
  type Entity = Community;

  fn validate(&self) -> Result<(), ValidateError> {
    require("name", &self.name)?;
    require("area", &self.area)?;
    require("description", &self.description)
  }

  fn into_entity(self, id: String) -> Community {
    Community {
      id,
      name: self.name,
      area: self.area,
      members: 1,
      description: self.description,
      image: self.image,
      joined: true,
    }
  }
}

/// A partial edit of a community. `None` leaves the field untouched.
///
/// Membership is changed through join/leave, never through an update.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct CommunityUpdate {
  pub name: Option<String>,
  pub area: Option<String>,
  pub description: Option<String>,
  pub image: Option<String>,
}

impl CommunityUpdate {
  pub fn validate(&self) -> Result<(), ValidateError> {
    if let Some(name) = &self.name {
      require("name", name)?;
    }
    if let Some(area) = &self.area {
      require("area", area)?;
    }
    if let Some(description) = &self.description {
      require("description", description)?;
    }
    Ok(())
  }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Membership {
  pub joined: bool,
  pub members: u64,
}

impl Membership {
  pub fn join(self) -> Self {
    Self {
      joined: true,
      members: self.members.saturating_add(1),
    }
  }

  /// The member count saturates at zero.
  pub fn leave(self) -> Self {
    Self {
      joined: false,
      members: self.members.saturating_sub(1),
    }
  }
}
