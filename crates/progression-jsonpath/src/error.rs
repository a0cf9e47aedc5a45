//! Error types for the path-expression parser.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("path must start with '$': {0:?}")]
  MissingRoot(String),

  #[error("unexpected {found:?} at offset {offset} in {path:?}")]
  Unexpected {
    path:   String,
    offset: usize,
    found:  String,
  },

  #[error("unexpected end of path {0:?}")]
  UnexpectedEnd(String),

  #[error("invalid array index {value:?} in {path:?}")]
  InvalidIndex { path: String, value: String },

  #[error("filter expressions are not supported: {0:?}")]
  UnsupportedFilter(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
