//! Error types for `prosopon-catalog`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read catalog file: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to parse catalog: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("invalid matcher regex for aggregate source {aggregate:?} sub-key {key:?}: {err}")]
  Matcher {
    aggregate: String,
    key:    String,
    err:    regex::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
