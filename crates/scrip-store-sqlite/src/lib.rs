//! SQLite backend for the Scrip promo-code and audit-version stores.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every mutation and its audit append
//! share one SQLite transaction, so the audit trail can never be left with a
//! gap by a half-applied write.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
