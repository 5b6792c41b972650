//! Sparse updates for promo codes.
//!
//! Callers construct a patch carrying only the fields they intend to change
//! (e.g. only `status` for a deactivation); the store applies it without the
//! caller re-fetching and re-sending the full record. `None` means "leave
//! untouched", `Some(v)` means "set to v" — including to a zero value, which
//! a default-value-sniffing merge could never express.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::code::{CodeStatus, PromoCode};

/// A partial update addressed to the record with `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCodePatch {
  pub id:             Uuid,
  pub name:           Option<String>,
  pub code:           Option<String>,
  pub remaining_uses: Option<u32>,
  pub max_uses:       Option<u32>,
  pub status:         Option<CodeStatus>,
  pub tenant_id:      Option<Uuid>,
  pub updated_by:     Option<String>,
}

impl PromoCodePatch {
  /// A patch that changes nothing.
  pub fn empty(id: Uuid) -> Self {
    Self {
      id,
      name:           None,
      code:           None,
      remaining_uses: None,
      max_uses:       None,
      status:         None,
      tenant_id:      None,
      updated_by:     None,
    }
  }

  /// Overwrite every field present on the patch; leave the rest untouched.
  ///
  /// `id`, `is_deleted` and the creation columns are never patched here.
  /// The store stamps `updated_at` when it persists the merged record.
  pub fn apply_to(&self, code: &mut PromoCode) {
    if let Some(v) = &self.name {
      code.name = v.clone();
    }
    if let Some(v) = &self.code {
      code.code = v.clone();
    }
    if let Some(v) = self.remaining_uses {
      code.remaining_uses = v;
    }
    if let Some(v) = self.max_uses {
      code.max_uses = v;
    }
    if let Some(v) = self.status {
      code.status = v;
    }
    if let Some(v) = self.tenant_id {
      code.tenant_id = v;
    }
    if let Some(v) = &self.updated_by {
      code.updated_by = Some(v.clone());
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn sample() -> PromoCode {
    PromoCode {
      id:             Uuid::new_v4(),
      name:           "Spring sale".into(),
      code:           "SPRING".into(),
      remaining_uses: 5,
      max_uses:       10,
      status:         CodeStatus::Active,
      tenant_id:      Uuid::new_v4(),
      is_deleted:     false,
      created_at:     Utc::now(),
      created_by:     "seed".into(),
      updated_at:     None,
      updated_by:     None,
    }
  }

  #[test]
  fn empty_patch_changes_nothing() {
    let mut code = sample();
    let before = code.clone();
    PromoCodePatch::empty(code.id).apply_to(&mut code);
    assert_eq!(code, before);
  }

  #[test]
  fn status_only_patch_leaves_other_fields() {
    let mut code = sample();
    let mut patch = PromoCodePatch::empty(code.id);
    patch.status = Some(CodeStatus::Inactive);
    patch.updated_by = Some("alice".into());
    patch.apply_to(&mut code);

    assert_eq!(code.status, CodeStatus::Inactive);
    assert_eq!(code.updated_by.as_deref(), Some("alice"));
    assert_eq!(code.name, "Spring sale");
    assert_eq!(code.code, "SPRING");
    assert_eq!(code.remaining_uses, 5);
    assert_eq!(code.max_uses, 10);
  }

  #[test]
  fn zero_value_is_expressible() {
    // The whole point of the typed patch: Some(0) is distinguishable from
    // "not set".
    let mut code = sample();
    let mut patch = PromoCodePatch::empty(code.id);
    patch.remaining_uses = Some(0);
    patch.apply_to(&mut code);
    assert_eq!(code.remaining_uses, 0);
  }
}
