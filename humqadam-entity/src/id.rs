use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Produces ids for user created entities.
pub trait IdGenerator: Send + Sync {
  fn next_id(&self) -> String;
}

/// Random v4 UUIDs. Every entity kind uses this unless a store is configured otherwise.
#[derive(Debug, Default, Clone)]
pub struct UuidIdGen;

impl IdGenerator for UuidIdGen {
  fn next_id(&self) -> String {
    Uuid::new_v4().to_string()
  }
}

/// Deterministic ids of the form `{prefix}-{n}`.
///
/// The counter is per generator, so two stores sharing a prefix can hand out the same id. The
/// entity store regenerates on collision.
#[derive(Debug)]
pub struct SequentialIdGen {
  prefix: String,
  counter: AtomicU64,
}

impl SequentialIdGen {
  pub fn new<T: Into<String>>(prefix: T) -> Self {
    Self::starting_at(prefix, 1)
  }

  pub fn starting_at<T: Into<String>>(prefix: T, start: u64) -> Self {
    Self {
      prefix: prefix.into(),
      counter: AtomicU64::new(start),
    }
  }
}

impl IdGenerator for SequentialIdGen {
  fn next_id(&self) -> String {
    let n = self.counter.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", self.prefix, n)
  }
}
