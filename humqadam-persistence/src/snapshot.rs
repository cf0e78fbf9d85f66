//! The on-disk envelope of one persisted collection.
//!
//! ```json
//! { "version": 1, "payload": [ ... ] }
//! ```
//!
//! Data written before the envelope existed is a bare JSON value. It is read as version 0 and
//! rewritten in the current format on the next save.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::PersistenceError;

pub const SNAPSHOT_VERSION: u32 = 1;
pub const LEGACY_SNAPSHOT_VERSION: u32 = 0;

const VERSION_FIELD: &str = "version";
const PAYLOAD_FIELD: &str = "payload";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedSnapshot<P> {
  pub version: u32,
  pub payload: P,
}

impl<P> PersistedSnapshot<P> {
  pub fn new(payload: P) -> Self {
    Self {
      version: SNAPSHOT_VERSION,
      payload,
    }
  }
}

#[derive(Serialize)]
struct SnapshotRef<'a, P: ?Sized> {
  version: u32,
  payload: &'a P,
}

pub fn encode_snapshot<P: Serialize + ?Sized>(payload: &P) -> Result<Vec<u8>, PersistenceError> {
  let snapshot = SnapshotRef {
    version: SNAPSHOT_VERSION,
    payload,
  };
  Ok(serde_json::to_vec(&snapshot)?)
}

/// Splits raw bytes into the snapshot version and its untyped payload.
pub fn decode_snapshot_value(bytes: &[u8]) -> Result<PersistedSnapshot<Value>, PersistenceError> {
  let value: Value = serde_json::from_slice(bytes)?;
  match value {
    Value::Object(mut map)
      if map.len() == 2 && map.contains_key(PAYLOAD_FIELD) && map.contains_key(VERSION_FIELD) =>
    {
      let version = map
        .get(VERSION_FIELD)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| PersistenceError::InvalidData("snapshot version is not a number".into()))?;
      if version > SNAPSHOT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
          found: version,
          supported: SNAPSHOT_VERSION,
        });
      }
      let payload = map.remove(PAYLOAD_FIELD).unwrap_or(Value::Null);
      Ok(PersistedSnapshot { version, payload })
    },
    legacy => Ok(PersistedSnapshot {
      version: LEGACY_SNAPSHOT_VERSION,
      payload: legacy,
    }),
  }
}

pub fn decode_snapshot<P: DeserializeOwned>(
  bytes: &[u8],
) -> Result<PersistedSnapshot<P>, PersistenceError> {
  let snapshot = decode_snapshot_value(bytes)?;
  let payload = serde_json::from_value(snapshot.payload)?;
  Ok(PersistedSnapshot {
    version: snapshot.version,
    payload,
  })
}
