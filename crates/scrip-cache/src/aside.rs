//! [`CacheAside`] — get-or-populate-with-failover over any [`CacheStore`].

use std::{future::Future, time::Duration};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{CacheStore, Error};

/// Error from [`CacheAside::get_or_add`]: either the cache transport failed
/// or the loader did.
#[derive(Debug, Error)]
pub enum GetOrAddError<E> {
  #[error("cache error: {0}")]
  Cache(#[from] Error),

  #[error("loader error: {0}")]
  Loader(E),
}

/// Cache-aside wrapper: check the fast store first, fall back to and
/// populate from the source of truth on miss.
pub struct CacheAside<C> {
  store:       C,
  default_ttl: Option<Duration>,
}

impl<C: CacheStore> CacheAside<C> {
  pub fn new(store: C) -> Self {
    Self { store, default_ttl: None }
  }

  /// TTL applied when `get_or_add` is called without an explicit one.
  pub fn with_default_ttl(mut self, ttl: Option<Duration>) -> Self {
    self.default_ttl = ttl;
    self
  }

  /// Look up `key`; on miss, invoke `loader` and, if it yields a value,
  /// store it under `key` before returning it.
  ///
  /// Population is not transactional with the loader: two concurrent misses
  /// may invoke the loader twice and both write the key (last write wins).
  /// Acceptable because values are idempotent reads of durable storage.
  /// No retry is performed; backend and loader errors propagate.
  pub async fn get_or_add<T, E, F, Fut>(
    &self,
    key: &str,
    loader: F,
    ttl: Option<Duration>,
  ) -> Result<Option<T>, GetOrAddError<E>>
  where
    T: Serialize + DeserializeOwned + Send + Sync,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
  {
    if let Some(hit) = self.store.get::<T>(key).await? {
      tracing::trace!(key, "cache hit");
      return Ok(Some(hit));
    }

    tracing::trace!(key, "cache miss");
    let loaded = loader().await.map_err(GetOrAddError::Loader)?;
    if let Some(value) = &loaded {
      self.store.set(key, value, ttl.or(self.default_ttl)).await?;
    }
    Ok(loaded)
  }

  /// Invalidate `key`. Returns whether a live entry was removed.
  pub async fn remove(&self, key: &str) -> Result<bool, Error> {
    self.store.remove(key).await
  }

  /// Whether `key` currently holds a live entry.
  pub async fn exists(&self, key: &str) -> Result<bool, Error> {
    self.store.exists(key).await
  }
}
