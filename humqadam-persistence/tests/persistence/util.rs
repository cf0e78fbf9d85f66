use std::path::PathBuf;
use std::sync::Once;

use humqadam_entity::Entity;
use humqadam_persistence::kv::SledKV;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tracing_subscriber::{EnvFilter, fmt::Subscriber, util::SubscriberInitExt};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
  pub id: String,
  pub text: String,
}

impl Entity for Note {
  fn id(&self) -> &str {
    &self.id
  }
}

pub fn note(id: &str, text: &str) -> Note {
  Note {
    id: id.to_string(),
    text: text.to_string(),
  }
}

pub fn setup_log() {
  static START: Once = Once::new();
  START.call_once(|| {
    let subscriber = Subscriber::builder()
      .with_env_filter(EnvFilter::new("humqadam_persistence=trace"))
      .with_ansi(true)
      .finish();
    subscriber.try_init().unwrap();
  });
}

pub fn sled_db() -> (PathBuf, SledKV) {
  setup_log();
  let tempdir = TempDir::new().unwrap();
  let path = tempdir.into_path();
  let cloned_path = path.clone();
  (path, SledKV::open(cloned_path).unwrap())
}
