//! Promotional code records and their lifecycle states.
//!
//! A promo code is never physically removed: deletion flips `is_deleted` and
//! moves `status` to [`CodeStatus::Deleted`] in the same write. Only `Active`,
//! non-deleted rows are visible to read queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a promo code.
///
/// Transitions: `Active -> Inactive` (deactivate) and
/// `Active | Inactive -> Deleted` (soft delete). `Deleted` is terminal —
/// deleted rows are invisible to every read path, so no operation can move
/// one again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeStatus {
  Active,
  Inactive,
  Deleted,
}

/// A promotional code record as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCode {
  pub id:             Uuid,
  pub name:           String,
  /// The redemption string. Treated as a lookup key, but not guaranteed
  /// unique by the schema.
  pub code:           String,
  pub remaining_uses: u32,
  pub max_uses:       u32,
  pub status:         CodeStatus,
  pub tenant_id:      Uuid,
  pub is_deleted:     bool,
  pub created_at:     DateTime<Utc>,
  pub created_by:     String,
  pub updated_at:     Option<DateTime<Utc>>,
  pub updated_by:     Option<String>,
}

/// Input for creating a promo code. The store stamps `id` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPromoCode {
  pub name:           String,
  pub code:           String,
  pub remaining_uses: u32,
  pub max_uses:       u32,
  pub status:         CodeStatus,
  pub tenant_id:      Uuid,
  pub created_by:     String,
}

/// Result of an atomic redeem attempt at the store layer.
///
/// `Exhausted` means the row exists but the conditional decrement matched
/// zero rows (`remaining_uses` was already 0). No mutation is issued in the
/// `Exhausted` and `NotFound` cases.
#[derive(Debug, Clone)]
pub enum RedeemOutcome {
  Redeemed(PromoCode),
  Exhausted,
  NotFound,
}
