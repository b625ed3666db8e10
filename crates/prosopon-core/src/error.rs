//! Error types for `prosopon-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown factoid kind discriminant: {0:?}")]
  UnknownFactoidKind(String),

  #[error("graph pattern references node index {index} but only {len} nodes are declared")]
  PatternIndexOutOfRange { index: usize, len: usize },

  #[error("graph pattern declares no nodes")]
  EmptyPattern,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
