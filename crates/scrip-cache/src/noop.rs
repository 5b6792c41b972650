//! [`NoopCache`] — a backend that never stores anything.
//!
//! Installed when caching is disabled. Every read is a miss, so the
//! cache-aside layer degrades to calling its loader on each lookup. All
//! correctness-bearing logic must hold with this backend in place.

use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::{CacheStore, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl CacheStore for NoopCache {
  async fn get<'a, T>(&'a self, _key: &'a str) -> Result<Option<T>>
  where
    T: DeserializeOwned + Send + 'a,
  {
    Ok(None)
  }

  async fn set<T>(&self, _key: &str, _value: &T, _ttl: Option<Duration>) -> Result<()>
  where
    T: Serialize + Sync,
  {
    Ok(())
  }

  async fn remove(&self, _key: &str) -> Result<bool> {
    Ok(false)
  }

  async fn exists(&self, _key: &str) -> Result<bool> {
    Ok(false)
  }
}
