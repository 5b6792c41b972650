//! [`MemoryCache`] — the in-process [`CacheStore`] backend.
//!
//! Entries hold serialized JSON plus an optional expiry instant. Expiry is
//! checked lazily on access; an expired entry behaves exactly like a miss.

use std::{
  collections::HashMap,
  sync::{Arc, RwLock},
  time::{Duration, Instant},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{CacheStore, Result};

struct Entry {
  payload:    String,
  expires_at: Option<Instant>,
}

impl Entry {
  fn is_expired(&self, now: Instant) -> bool {
    self.expires_at.is_some_and(|at| at <= now)
  }
}

/// An in-process cache backed by a hash map.
///
/// Cloning is cheap — the entry map is reference-counted, so clones share
/// state.
#[derive(Clone, Default)]
pub struct MemoryCache {
  entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of live (non-expired) entries.
  pub fn len(&self) -> usize {
    let now = Instant::now();
    let entries = self.entries.read().expect("cache lock poisoned");
    entries.values().filter(|e| !e.is_expired(now)).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl CacheStore for MemoryCache {
  async fn get<'a, T>(&'a self, key: &'a str) -> Result<Option<T>>
  where
    T: DeserializeOwned + Send + 'a,
  {
    let now = Instant::now();
    let payload = {
      let entries = self.entries.read().expect("cache lock poisoned");
      match entries.get(key) {
        Some(e) if !e.is_expired(now) => Some(e.payload.clone()),
        _ => None,
      }
    };

    match payload {
      Some(p) => Ok(Some(serde_json::from_str(&p)?)),
      None => Ok(None),
    }
  }

  async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()>
  where
    T: Serialize + Sync,
  {
    let payload = serde_json::to_string(value)?;
    let entry = Entry {
      payload,
      expires_at: ttl.map(|d| Instant::now() + d),
    };
    let mut entries = self.entries.write().expect("cache lock poisoned");
    entries.insert(key.to_owned(), entry);
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<bool> {
    let now = Instant::now();
    let mut entries = self.entries.write().expect("cache lock poisoned");
    match entries.remove(key) {
      Some(e) => Ok(!e.is_expired(now)),
      None => Ok(false),
    }
  }

  async fn exists(&self, key: &str) -> Result<bool> {
    let now = Instant::now();
    let entries = self.entries.read().expect("cache lock poisoned");
    Ok(entries.get(key).is_some_and(|e| !e.is_expired(now)))
  }
}
