#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
  #[cfg(feature = "sled_db")]
  #[error(transparent)]
  SledDb(#[from] sled::Error),

  #[error(transparent)]
  Serde(#[from] serde_json::Error),

  #[error("Storage quota exceeded: {required} bytes required, {limit} bytes allowed")]
  QuotaExceeded { limit: usize, required: usize },

  #[error("Unsupported snapshot version {found}, this build reads up to {supported}")]
  UnsupportedVersion { found: u32, supported: u32 },

  #[error("invalid data: {0}")]
  InvalidData(String),

  #[error(transparent)]
  Internal(#[from] anyhow::Error),
}
