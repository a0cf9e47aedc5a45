//! Error type for `progression-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("event not found: {0}")]
  EventNotFound(uuid::Uuid),

  #[error("stream not found: {0}")]
  StreamNotFound(uuid::Uuid),

  #[error("event {0} is already stored")]
  DuplicateEvent(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
