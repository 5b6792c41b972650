//! Business logic for the Scrip promo-code service.
//!
//! [`CodeEngine`] composes a [`CodeStore`](scrip_core::store::CodeStore)
//! backend with a cache-aside layer and enforces the service-level rules
//! (not-found vs. exhausted, soft-delete semantics, cache invalidation).
//! [`VersionLog`] is the read surface over the audit trail.

mod engine;
mod error;
mod versions;


pub use self::{
  engine::{CodeEngine, REDEEM_ACTOR},
  error::Error,
  versions::VersionLog,
};
