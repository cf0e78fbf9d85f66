#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidateError {
  #[error("Missing required field: {0}")]
  MissingField(&'static str),

  #[error("{field} must be between {min} and {max}, got {value}")]
  OutOfRange {
    field: &'static str,
    min: u32,
    max: u32,
    value: u32,
  },
}
