//! Error type for `prosopon-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] prosopon_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A pattern referenced a bound node that does not exist in the store.
  #[error("bound node not found: {0}")]
  BoundNodeNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
