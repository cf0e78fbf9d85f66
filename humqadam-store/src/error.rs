use humqadam_entity::ValidateError;
use humqadam_persistence::PersistenceError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("{0} is a seed entity and cannot be changed")]
  SeedImmutable(String),

  #[error("Entity not found: {0}")]
  NotFound(String),

  #[error("Parent entity not found: {0}")]
  ParentNotFound(String),

  #[error(transparent)]
  Validate(#[from] ValidateError),

  #[error("No unique id after {0} attempts")]
  IdExhausted(usize),

  #[error(transparent)]
  Persistence(#[from] PersistenceError),

  #[error("Failed to read image: {0}")]
  Image(#[from] std::io::Error),

  #[error(transparent)]
  Internal(#[from] anyhow::Error),
}

impl StoreError {
  /// True for the integrity rejections the view layer reports back to the user.
  pub fn is_rejection(&self) -> bool {
    matches!(
      self,
      StoreError::SeedImmutable(_) | StoreError::NotFound(_) | StoreError::ParentNotFound(_)
    )
  }
}
