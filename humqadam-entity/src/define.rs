use std::fmt;

use serde::de::{DeserializeOwned, Visitor};
use serde::{Deserializer, Serialize};

use crate::error::ValidateError;

/// A record that lives in one of the store's collections.
///
/// The id is assigned once, when the record is created, and never changes afterwards.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
  fn id(&self) -> &str;
}

/// The user supplied fields of an entity that does not exist yet.
///
/// `into_entity` receives the freshly generated id and is where derived fields are filled in,
/// for example the creator's membership of a new community or the avatar of a marketplace giver.
pub trait NewEntity: Send {
  type Entity: Entity;

  fn validate(&self) -> Result<(), ValidateError>;

  fn into_entity(self, id: String) -> Self::Entity;
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidateError> {
  if value.trim().is_empty() {
    return Err(ValidateError::MissingField(field));
  }
  Ok(())
}

/// Reads an id stored either as a string or as a number. Stories and comments written by the
/// first version of the app used millisecond timestamps as ids.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  struct IdVisitor;

  impl Visitor<'_> for IdVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
      formatter.write_str("a string or a numeric id")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
      E: serde::de::Error,
    {
      Ok(value.to_string())
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
      E: serde::de::Error,
    {
      Ok(value)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
      E: serde::de::Error,
    {
      Ok(value.to_string())
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
      E: serde::de::Error,
    {
      Ok(value.to_string())
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
      E: serde::de::Error,
    {
      if value.is_finite() && value.fract() == 0.0 {
        Ok(format!("{value:.0}"))
      } else {
        Err(E::custom(format!("invalid numeric id: {value}")))
      }
    }
  }

  deserializer.deserialize_any(IdVisitor)
}
