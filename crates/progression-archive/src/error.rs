//! Error type for `progression-archive`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid path for {event_name}: {source}")]
  Path {
    event_name: String,
    #[source]
    source:     progression_jsonpath::Error,
  },

  #[error("failed to read stream list {}: {source}", .path.display())]
  ReferenceFile {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("unknown policy {0:?}")]
  UnknownPolicy(String),

  #[error("no {0} stream list configured")]
  MissingStreamList(&'static str),

  #[error("invalid stream id {value:?} at {}:{line}", .path.display())]
  InvalidStreamId {
    path:  PathBuf,
    line:  usize,
    value: String,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
