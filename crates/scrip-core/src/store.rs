//! The [`CodeStore`] and [`VersionStore`] traits.
//!
//! The traits are implemented by storage backends (e.g.
//! `scrip-store-sqlite`). Higher layers (`scrip-engine`, `scrip-api`) depend
//! on these abstractions, not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  code::{NewPromoCode, PromoCode, RedeemOutcome},
  patch::PromoCodePatch,
  version::{NewObjectVersion, ObjectVersion},
};

// ─── Promo codes ─────────────────────────────────────────────────────────────

/// Abstraction over promo-code persistence.
///
/// "Active" throughout means `status == Active && !is_deleted`; every read
/// applies that filter. Each mutating operation appends exactly one audit
/// record as a side effect, in the same logical write as the mutation.
pub trait CodeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All active codes, newest-updated-first.
  fn active_codes(
    &self,
  ) -> impl Future<Output = Result<Vec<PromoCode>, Self::Error>> + Send + '_;

  /// Active code with this id, or `None`.
  fn code_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<PromoCode>, Self::Error>> + Send + '_;

  /// Active code matching this redemption string, or `None`.
  fn code_by_code<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<PromoCode>, Self::Error>> + Send + 'a;

  /// Persist a new code (stamping `id` and `created_at`) and append its
  /// creation audit record (`before_value = None`), attributed to the
  /// record's `created_by`.
  fn add_code(
    &self,
    input: NewPromoCode,
  ) -> impl Future<Output = Result<PromoCode, Self::Error>> + Send + '_;

  /// Load the record addressed by `patch.id`, merge the patch onto it, stamp
  /// `updated_at`, persist, and append an audit record with before/after
  /// snapshots. Returns `None` if no record with that id exists; callers
  /// treat that as a hard not-found fault.
  fn update_code(
    &self,
    patch: PromoCodePatch,
  ) -> impl Future<Output = Result<Option<PromoCode>, Self::Error>> + Send + '_;

  /// Mark the record deleted (`is_deleted = true`, `status = Deleted` in the
  /// same write) and append an audit record. Returns `false` — without an
  /// error — if the record does not exist.
  fn soft_delete_code<'a>(
    &'a self,
    id: Uuid,
    updated_by: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// `remaining_uses` of the active record matching `code`, or `None`.
  fn check_availability<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<u32>, Self::Error>> + Send + 'a;

  /// Atomically decrement `remaining_uses` of the active record matching
  /// `code`, guarded by `remaining_uses > 0`, and append the audit record in
  /// the same transaction. The conditional write is what rules out the
  /// concurrent-redeem lost update.
  fn redeem_code<'a>(
    &'a self,
    code: &'a str,
    redeemed_by: &'a str,
  ) -> impl Future<Output = Result<RedeemOutcome, Self::Error>> + Send + 'a;
}

// ─── Audit versions ──────────────────────────────────────────────────────────

/// Abstraction over the append-only audit log.
///
/// There is no update or delete: the legacy interface slots below remain as
/// defaulted methods that signal [`Error::Unsupported`](crate::Error), which
/// the HTTP boundary surfaces as 501.
pub trait VersionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append a record (stamping `id` and `updated_on`) and return it.
  fn append_version(
    &self,
    input: NewObjectVersion,
  ) -> impl Future<Output = Result<ObjectVersion, Self::Error>> + Send + '_;

  /// Records for one object identity, newest-first.
  fn versions_by_object<'a>(
    &'a self,
    object_type: &'a str,
    object_tenant: Uuid,
    object_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ObjectVersion>, Self::Error>> + Send + 'a;

  /// Records matching only `object_id`, newest-first. Looser filter than
  /// [`versions_by_object`](Self::versions_by_object) — used for ad-hoc
  /// audit lookups.
  fn versions_by_object_id(
    &self,
    object_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ObjectVersion>, Self::Error>> + Send + '_;

  /// Every record in the log, newest-first.
  fn all_versions(
    &self,
  ) -> impl Future<Output = Result<Vec<ObjectVersion>, Self::Error>> + Send + '_;

  /// Legacy slot. Audit records are immutable.
  fn update_version(
    &self,
    _version: ObjectVersion,
  ) -> impl Future<Output = crate::Result<ObjectVersion>> + Send + '_ {
    async { Err(crate::Error::Unsupported("audit records are append-only")) }
  }

  /// Legacy slot. Audit records are never deleted.
  fn delete_version(
    &self,
    _id: Uuid,
  ) -> impl Future<Output = crate::Result<bool>> + Send + '_ {
    async { Err(crate::Error::Unsupported("audit records are append-only")) }
  }
}
