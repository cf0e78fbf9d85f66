use std::fmt::{Display, Formatter};
use std::ops::Deref;

pub const SLOT_SEPARATOR: char = '/';

/// The storage key of one persisted collection: `{namespace}/{collection}`.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey(String);

pub fn make_slot_key(namespace: &str, collection: &str) -> SlotKey {
  debug_assert!(!collection.is_empty());
  if namespace.is_empty() {
    return SlotKey(collection.to_string());
  }
  SlotKey(format!("{namespace}{SLOT_SEPARATOR}{collection}"))
}

impl SlotKey {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Deref for SlotKey {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<[u8]> for SlotKey {
  #[inline]
  fn as_ref(&self) -> &[u8] {
    self.0.as_bytes()
  }
}

impl Display for SlotKey {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<SlotKey> for String {
  fn from(key: SlotKey) -> Self {
    key.0
  }
}
