//! Error type for `scrip-engine`.

use scrip_cache::GetOrAddError;
use thiserror::Error;
use uuid::Uuid;

/// Engine-level error, generic over the storage backend's error type.
///
/// `NotFound`, `CodeNotFound` and `Exhausted` are distinct variants so the
/// HTTP boundary can map them to distinct statuses instead of collapsing
/// every failed redeem into one response.
#[derive(Debug, Error)]
pub enum Error<E: std::error::Error> {
  /// No record with this id exists (in any state).
  #[error("promo code {0} not found")]
  NotFound(Uuid),

  /// No active record matches this redemption string.
  #[error("promo code {0:?} not found")]
  CodeNotFound(String),

  /// The code exists but has no remaining uses.
  #[error("promo code {0:?} has no remaining uses")]
  Exhausted(String),

  #[error("store error: {0}")]
  Store(#[source] E),

  #[error("cache error: {0}")]
  Cache(#[from] scrip_cache::Error),
}

impl<E: std::error::Error> From<GetOrAddError<E>> for Error<E> {
  fn from(e: GetOrAddError<E>) -> Self {
    match e {
      GetOrAddError::Cache(c) => Error::Cache(c),
      GetOrAddError::Loader(s) => Error::Store(s),
    }
  }
}

pub type Result<T, E> = std::result::Result<T, Error<E>>;
