//! Error type for `reclaim-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain failure (not-found, conflict, validation, …) surfaced by the
  /// store itself.
  #[error("core error: {0}")]
  Core(#[from] reclaim_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

/// Collapse into the domain taxonomy for callers that only speak
/// [`reclaim_core::Error`]. Backend failures become opaque storage errors.
impl From<Error> for reclaim_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      other => reclaim_core::Error::Storage(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
