//! JSON REST API for Scrip.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`CodeStore`] and [`VersionStore`]. Auth, TLS, and transport concerns are
//! the caller's responsibility.

pub mod codes;
pub mod error;
pub mod versions;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{delete, get, post},
};
use scrip_cache::CacheStore;
use scrip_core::store::{CodeStore, VersionStore};
use scrip_engine::{CodeEngine, VersionLog};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,

  /// When false the server runs with the no-op cache backend and every read
  /// hits the store.
  #[serde(default = "default_cache_enabled")]
  pub cache_enabled: bool,

  /// Cache TTL in seconds; entries never expire when absent.
  #[serde(default)]
  pub cache_ttl_seconds: Option<u64>,
}

fn default_cache_enabled() -> bool { true }

impl ServerConfig {
  pub fn cache_ttl(&self) -> Option<Duration> {
    self.cache_ttl_seconds.map(Duration::from_secs)
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, C> {
  pub engine:   Arc<CodeEngine<S, C>>,
  pub versions: Arc<VersionLog<S>>,
}

impl<S, C> AppState<S, C>
where
  S: CodeStore + VersionStore,
  C: CacheStore,
{
  pub fn new(store: Arc<S>, cache: C, cache_ttl: Option<Duration>) -> Self {
    Self {
      engine:   Arc::new(CodeEngine::new(store.clone(), cache, cache_ttl)),
      versions: Arc::new(VersionLog::new(store)),
    }
  }
}

// Derived Clone would demand S: Clone and C: Clone; the Arcs make both moot.
impl<S, C> Clone for AppState<S, C> {
  fn clone(&self) -> Self {
    Self {
      engine:   self.engine.clone(),
      versions: self.versions.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the promo-code API.
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  Router::new()
    // Promo codes
    .route(
      "/codes",
      get(codes::list::<S, C>).post(codes::create::<S, C>),
    )
    .route(
      "/codes/{id}",
      get(codes::get_one::<S, C>)
        .put(codes::update_one::<S, C>)
        .delete(codes::delete_one::<S, C>),
    )
    .route("/codes/{id}/deactivate", post(codes::deactivate_one::<S, C>))
    .route("/redeem/{code}", post(codes::redeem::<S, C>))
    .route("/availability/{code}", get(codes::availability::<S, C>))
    // Audit trail
    .route(
      "/versions",
      get(versions::list::<S, C>)
        .post(versions::append::<S, C>)
        .put(versions::update_one::<S, C>),
    )
    .route("/versions/{id}", delete(versions::delete_one::<S, C>))
    .route("/versions/object/{object_id}", get(versions::by_object_id::<S, C>))
    .route(
      "/versions/of/{object_type}/{tenant_id}/{object_id}",
      get(versions::by_object::<S, C>),
    )
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
