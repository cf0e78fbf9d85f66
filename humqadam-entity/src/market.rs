use serde::{Deserialize, Serialize};

use crate::avatar::avatar_url;
use crate::define::{Entity, NewEntity, require};
use crate::error::ValidateError;

/// An item offered in the Baitul-Maal marketplace.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketItem {
  pub id: String,
  pub name: String,
  pub description: String,
  /// A remote url for seed items, an embedded `data:` url for uploaded images.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  pub location: String,
  pub pickup_times: String,
  pub giver_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub giver_profile_pic_url: Option<String>,
  pub giver_contact_info: String,
  /// Price in PKR. `None` and `Some(0.0)` both mean free.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub price: Option<f64>,
}

impl Entity for MarketItem {
  fn id(&self) -> &str {
    &self.id
  }
}

impl MarketItem {
  pub fn is_free(&self) -> bool {
    self.price.is_none_or(|price| price == 0.0)
  }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct NewMarketItem {
  pub name: String,
  pub description: String,
  pub image_url: Option<String>,
  pub location: String,
  pub pickup_times: String,
  pub giver_name: String,
  pub giver_contact_info: String,
  /// Raw text from the price input.
  pub price: String,
}

/// Empty, unparsable, negative and non finite input all mean "no price".
pub fn parse_price(raw: &str) -> Option<f64> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }
  raw
    .parse::<f64>()
    .ok()
    .filter(|price| price.is_finite() && *price >= 0.0)
}

impl NewEntity for NewMarketItem {
  type Entity = MarketItem;

  fn validate(&self) -> Result<(), ValidateError> {
    require("name", &self.name)?;
    require("location", &self.location)?;
    require("giverName", &self.giver_name)?;
    require("giverContactInfo", &self.giver_contact_info)
  }

  fn into_entity(self, id: String) -> MarketItem {
    let giver_profile_pic_url = Some(avatar_url(&self.giver_name));
    MarketItem {
      id,
      name: self.name,
      description: self.description,
      image_url: self.image_url,
      location: self.location,
      pickup_times: self.pickup_times,
      giver_name: self.giver_name,
      giver_profile_pic_url,
      giver_contact_info: self.giver_contact_info,
      price: parse_price(&self.price),
    }
  }
}
