//! Error types for `scrip-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown code status: {0:?}")]
  UnknownStatus(String),

  /// A legacy interface slot that is intentionally not implemented.
  /// Must surface as a 5xx at the HTTP boundary, never silently succeed.
  #[error("operation not supported: {0}")]
  Unsupported(&'static str),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
