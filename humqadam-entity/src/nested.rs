//! Records that belong to a single community and live and die with it.
use serde::{Deserialize, Serialize};

use crate::define::{Entity, NewEntity, require};
use crate::error::ValidateError;

macro_rules! impl_entity {
  ($($ty:ty),* $(,)?) => {
    $(
      impl Entity for $ty {
        fn id(&self) -> &str {
          &self.id
        }
      }
    )*
  };
}

impl_entity!(
  Message,
  Announcement,
  Professional,
  Business,
  LostFoundItem,
  Campaign
);

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Message {
  pub id: String,
  pub user: String,
  pub avatar: String,
  pub message: String,
  pub time: String,
  pub replies: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct NewMessage {
  pub user: String,
  pub avatar: String,
  pub message: String,
  pub time: String,
  pub replies: u32,
}

impl NewEntity for NewMessage {
  type Entity = Message;

  fn validate(&self) -> Result<(), ValidateError> {
    require("message", &self.message)
  }

  fn into_entity(self, id: String) -> Message {
    Message {
      id,
      user: self.user,
      avatar: self.avatar,
      message: self.message,
      time: self.time,
      replies: self.replies,
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Announcement {
  pub id: String,
  pub title: String,
  pub description: String,
  pub date: String,
  pub time: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct NewAnnouncement {
  pub title: String,
  pub description: String,
  pub date: String,
  pub time: String,
}

impl NewEntity for NewAnnouncement {
  type Entity = Announcement;

  fn validate(&self) -> Result<(), ValidateError> {
    require("title", &self.title)?;
    require("description", &self.description)
  }

  fn into_entity(self, id: String) -> Announcement {
    Announcement {
      id,
      title: self.title,
      description: self.description,
      date: self.date,
      time: self.time,
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Professional {
  pub id: String,
  pub name: String,
  pub profession: String,
  pub specialty: String,
  pub contact: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct NewProfessional {
  pub name: String,
  pub profession: String,
  pub specialty: String,
  pub contact: String,
  pub phone: Option<String>,
}

impl NewEntity for NewProfessional {
  type Entity = Professional;

  fn validate(&self) -> Result<(), ValidateError> {
    require("name", &self.name)?;
    require("profession", &self.profession)?;
    require("contact", &self.contact)
  }

  fn into_entity(self, id: String) -> Professional {
    Professional {
      id,
      name: self.name,
      profession: self.profession,
      specialty: self.specialty,
      contact: self.contact,
      phone: self.phone.filter(|phone| !phone.trim().is_empty()),
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Business {
  pub id: String,
  pub name: String,
  #[serde(rename = "type")]
  pub kind: String,
  pub description: String,
  pub address: String,
  pub hours: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct NewBusiness {
  pub name: String,
  pub kind: String,
  pub description: String,
  pub address: String,
  pub hours: String,
}

impl NewEntity for NewBusiness {
  type Entity = Business;

  fn validate(&self) -> Result<(), ValidateError> {
    require("name", &self.name)?;
    require("type", &self.kind)?;
    require("address", &self.address)
  }

  fn into_entity(self, id: String) -> Business {
    Business {
      id,
      name: self.name,
      kind: self.kind,
      description: self.description,
      address: self.address,
      hours: self.hours,
    }
  }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LostFoundKind {
  #[default]
  Lost,
  Found,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LostFoundItem {
  pub id: String,
  #[serde(rename = "type")]
  pub kind: LostFoundKind,
  pub title: String,
  pub description: String,
  pub date: String,
  pub contact: String,
  pub is_found: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct NewLostFoundItem {
  pub kind: LostFoundKind,
  pub title: String,
  pub description: String,
  pub date: String,
  pub contact: String,
}

impl NewEntity for NewLostFoundItem {
  type Entity = LostFoundItem;

  fn validate(&self) -> Result<(), ValidateError> {
    require("title", &self.title)?;
    require("contact", &self.contact)
  }

  fn into_entity(self, id: String) -> LostFoundItem {
    LostFoundItem {
      id,
      kind: self.kind,
      title: self.title,
      description: self.description,
      date: self.date,
      contact: self.contact,
      is_found: false,
    }
  }
}

pub const MAX_CAMPAIGN_PROGRESS: u32 = 100;

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
  pub id: String,
  pub title: String,
  pub description: String,
  pub goal: String,
  /// Percentage of the goal reached, 0..=100.
  pub progress: u32,
  pub end_date: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct NewCampaign {
  pub title: String,
  pub description: String,
  pub goal: String,
  pub progress: u32,
  pub end_date: String,
}

pub fn validate_campaign_progress(progress: u32) -> Result<(), ValidateError> {
  if progress > MAX_CAMPAIGN_PROGRESS {
    return Err(ValidateError::OutOfRange {
      field: "progress",
      min: 0,
      max: MAX_CAMPAIGN_PROGRESS,
      value: progress,
    });
  }
  Ok(())
}

impl NewEntity for NewCampaign {
  type Entity = Campaign;

  fn validate(&self) -> Result<(), ValidateError> {
    require("title", &self.title)?;
    require("description", &self.description)?;
    require("goal", &self.goal)?;
    require("endDate", &self.end_date)?;
    validate_campaign_progress(self.progress)
  }

  fn into_entity(self, id: String) -> Campaign {
    Campaign {
      id,
      title: self.title,
      description: self.description,
      goal: self.goal,
      progress: self.progress,
      end_date: self.end_date,
    }
  }
}
