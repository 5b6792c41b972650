//! Cache-aside layer for Scrip.
//!
//! [`CacheStore`] is the contract of the external key/value transport: values
//! cross it as serialized JSON text, and a miss is indistinguishable from an
//! expired key. [`MemoryCache`] is the in-process backend; [`NoopCache`]
//! never stores anything, so the engine's correctness properties can be
//! exercised with the cache effectively absent.
//!
//! [`CacheAside`] adds the get-or-populate-with-failover read path on top of
//! any backend.

#![allow(async_fn_in_trait)]

mod aside;
mod memory;
mod noop;

pub mod error;

pub use aside::{CacheAside, GetOrAddError};
pub use error::{Error, Result};
pub use memory::MemoryCache;
pub use noop::NoopCache;

use std::{future::Future, time::Duration};

use serde::{Serialize, de::DeserializeOwned};

/// Contract of a key/value cache transport.
///
/// Implementations serialize values to a text wire format before storage and
/// deserialize on read. `get` on an absent or expired key yields `None`; the
/// two cases are indistinguishable to the caller.
pub trait CacheStore: Send + Sync {
  fn get<'a, T>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<T>>> + Send + 'a
  where
    T: DeserializeOwned + Send + 'a;

  fn set<'a, T>(
    &'a self,
    key: &'a str,
    value: &'a T,
    ttl: Option<Duration>,
  ) -> impl Future<Output = Result<()>> + Send + 'a
  where
    T: Serialize + Sync;

  /// Remove `key`. Returns whether a live entry was present.
  fn remove<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<bool>> + Send + 'a;

  /// Whether `key` currently holds a live entry.
  fn exists<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<bool>> + Send + 'a;
}
