//! [`CodeEngine`] — promo-code lifecycle operations over a store and a cache.

use std::{sync::Arc, time::Duration};

use scrip_cache::{CacheAside, CacheStore};
use scrip_core::{
  code::{CodeStatus, NewPromoCode, PromoCode, RedeemOutcome},
  patch::PromoCodePatch,
  store::CodeStore,
};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Actor recorded on audit records produced by redemption.
pub const REDEEM_ACTOR: &str = "system:redeem";

/// The promo-code service core.
///
/// Reads by id go through the cache-aside layer; every other path talks to
/// the store directly. Only deletion invalidates the cached entry, so reads
/// may serve a stale snapshot until its TTL lapses.
pub struct CodeEngine<S, C> {
  store: Arc<S>,
  cache: CacheAside<C>,
}

impl<S: CodeStore, C: CacheStore> CodeEngine<S, C> {
  pub fn new(store: Arc<S>, cache: C, cache_ttl: Option<Duration>) -> Self {
    Self {
      store,
      cache: CacheAside::new(cache).with_default_ttl(cache_ttl),
    }
  }

  fn cache_key(id: Uuid) -> String { id.to_string() }

  // ─── Reads ─────────────────────────────────────────────────────────────────

  /// All active codes, newest-updated-first. Never cached; the listing must
  /// reflect the store.
  pub async fn active_codes(&self) -> Result<Vec<PromoCode>, S::Error> {
    self.store.active_codes().await.map_err(Error::Store)
  }

  /// Active code by id, through the cache.
  pub async fn code_by_id(
    &self,
    id: Uuid,
  ) -> Result<Option<PromoCode>, S::Error> {
    let key = Self::cache_key(id);
    let found = self
      .cache
      .get_or_add(&key, || self.store.code_by_id(id), None)
      .await?;
    Ok(found)
  }

  /// `remaining_uses` of the active code matching `code`, or `None`. Always
  /// reads the store so the count is current.
  pub async fn check_availability(
    &self,
    code: &str,
  ) -> Result<Option<u32>, S::Error> {
    self.store.check_availability(code).await.map_err(Error::Store)
  }

  // ─── Mutations ─────────────────────────────────────────────────────────────

  /// Create a code and return the stored record.
  pub async fn create(
    &self,
    input: NewPromoCode,
  ) -> Result<PromoCode, S::Error> {
    let stored = self.store.add_code(input).await.map_err(Error::Store)?;
    tracing::info!(id = %stored.id, code = %stored.code, "created promo code");
    Ok(stored)
  }

  /// Merge a sparse patch onto an existing record.
  ///
  /// The cached entry is left alone; it converges when its TTL lapses.
  pub async fn update(
    &self,
    patch: PromoCodePatch,
  ) -> Result<PromoCode, S::Error> {
    let id = patch.id;
    let merged = self
      .store
      .update_code(patch)
      .await
      .map_err(Error::Store)?
      .ok_or(Error::NotFound(id))?;
    tracing::info!(id = %merged.id, "updated promo code");
    Ok(merged)
  }

  /// Soft-delete the record and invalidate its cache entry.
  ///
  /// Always reports `true`, even when no record exists; deletion of an
  /// absent record is a no-op, not a fault.
  pub async fn delete(
    &self,
    id: Uuid,
    updated_by: &str,
  ) -> Result<bool, S::Error> {
    let existed = self
      .store
      .soft_delete_code(id, updated_by)
      .await
      .map_err(Error::Store)?;
    if existed {
      tracing::info!(%id, "deleted promo code");
    } else {
      tracing::debug!(%id, "delete of absent promo code ignored");
    }
    self.cache.remove(&Self::cache_key(id)).await?;
    Ok(true)
  }

  /// Set the code's status to `Inactive`. Returns `false` when no record
  /// with this id exists (in any state).
  pub async fn deactivate(
    &self,
    id: Uuid,
    updated_by: &str,
  ) -> Result<bool, S::Error> {
    let mut patch = PromoCodePatch::empty(id);
    patch.status = Some(CodeStatus::Inactive);
    patch.updated_by = Some(updated_by.to_owned());

    match self.store.update_code(patch).await.map_err(Error::Store)? {
      Some(_) => {
        tracing::info!(%id, "deactivated promo code");
        Ok(true)
      },
      None => Ok(false),
    }
  }

  /// Redeem one use of the code matching `code`.
  ///
  /// Bypasses the cache entirely: the decrement must hit the store, and its
  /// conditional write decides between success and exhaustion.
  pub async fn redeem(&self, code: &str) -> Result<PromoCode, S::Error> {
    let outcome = self
      .store
      .redeem_code(code, REDEEM_ACTOR)
      .await
      .map_err(Error::Store)?;

    match outcome {
      RedeemOutcome::Redeemed(after) => {
        tracing::info!(
          id = %after.id,
          remaining = after.remaining_uses,
          "redeemed promo code",
        );
        Ok(after)
      },
      RedeemOutcome::Exhausted => Err(Error::Exhausted(code.to_owned())),
      RedeemOutcome::NotFound => Err(Error::CodeNotFound(code.to_owned())),
    }
  }
}
