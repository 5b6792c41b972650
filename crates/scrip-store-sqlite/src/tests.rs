//! Integration tests for `SqliteStore` against an in-memory database.

use scrip_core::{
  code::{CodeStatus, NewPromoCode, PromoCode, RedeemOutcome},
  patch::PromoCodePatch,
  store::{CodeStore, VersionStore},
  version::{NewObjectVersion, PROMO_CODE_OBJECT_TYPE},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_code(name: &str, code: &str, uses: u32) -> NewPromoCode {
  NewPromoCode {
    name:           name.into(),
    code:           code.into(),
    remaining_uses: uses,
    max_uses:       uses,
    status:         CodeStatus::Active,
    tenant_id:      Uuid::new_v4(),
    created_by:     "seed".into(),
  }
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_by_id() {
  let s = store().await;

  let stored = s.add_code(new_code("Promo1", "PROMO1", 10)).await.unwrap();
  assert_eq!(stored.code, "PROMO1");
  assert_eq!(stored.status, CodeStatus::Active);
  assert!(!stored.is_deleted);

  let fetched = s.code_by_id(stored.id).await.unwrap().unwrap();
  assert_eq!(fetched, stored);
}

#[tokio::test]
async fn get_by_id_missing_returns_none() {
  let s = store().await;
  assert!(s.code_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn get_by_id_excludes_inactive() {
  let s = store().await;

  let mut input = new_code("Dormant", "DORMANT", 5);
  input.status = CodeStatus::Inactive;
  let stored = s.add_code(input).await.unwrap();

  assert!(s.code_by_id(stored.id).await.unwrap().is_none());
  assert!(s.code_by_code("DORMANT").await.unwrap().is_none());
}

#[tokio::test]
async fn active_codes_excludes_inactive_and_deleted() {
  let s = store().await;

  let live = s.add_code(new_code("Live", "LIVE", 3)).await.unwrap();
  let mut dormant = new_code("Dormant", "DORMANT", 3);
  dormant.status = CodeStatus::Inactive;
  s.add_code(dormant).await.unwrap();
  let doomed = s.add_code(new_code("Doomed", "DOOMED", 3)).await.unwrap();
  s.soft_delete_code(doomed.id, "tester").await.unwrap();

  let active = s.active_codes().await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].id, live.id);
}

#[tokio::test]
async fn get_by_code_matches_redemption_string() {
  let s = store().await;

  s.add_code(new_code("Promo1", "PROMO1", 10)).await.unwrap();

  let found = s.code_by_code("PROMO1").await.unwrap().unwrap();
  assert_eq!(found.name, "Promo1");
  assert!(s.code_by_code("NOPE").await.unwrap().is_none());
}

// ─── Creation audit ──────────────────────────────────────────────────────────

#[tokio::test]
async fn add_appends_creation_audit() {
  let s = store().await;

  let stored = s.add_code(new_code("Promo1", "PROMO1", 10)).await.unwrap();

  let versions = s
    .versions_by_object(PROMO_CODE_OBJECT_TYPE, stored.tenant_id, stored.id)
    .await
    .unwrap();
  assert_eq!(versions.len(), 1);

  let v = &versions[0];
  assert!(v.before_value.is_none());
  assert_eq!(v.updated_by, "seed");

  let snapshot: PromoCode = serde_json::from_str(&v.after_value).unwrap();
  assert_eq!(snapshot, stored);
}

// ─── Sparse update ───────────────────────────────────────────────────────────

#[tokio::test]
async fn update_merges_sparse_patch() {
  let s = store().await;
  let stored = s.add_code(new_code("Promo1", "PROMO1", 10)).await.unwrap();

  let mut patch = PromoCodePatch::empty(stored.id);
  patch.status = Some(CodeStatus::Inactive);
  patch.updated_by = Some("alice".into());

  let merged = s.update_code(patch).await.unwrap().unwrap();

  assert_eq!(merged.status, CodeStatus::Inactive);
  assert_eq!(merged.updated_by.as_deref(), Some("alice"));
  assert!(merged.updated_at.is_some());
  // Untouched fields survive the merge.
  assert_eq!(merged.name, "Promo1");
  assert_eq!(merged.code, "PROMO1");
  assert_eq!(merged.remaining_uses, 10);
  assert_eq!(merged.max_uses, 10);
  assert_eq!(merged.tenant_id, stored.tenant_id);

  let versions = s
    .versions_by_object(PROMO_CODE_OBJECT_TYPE, stored.tenant_id, stored.id)
    .await
    .unwrap();
  assert_eq!(versions.len(), 2);

  // Newest first: the update record precedes the creation record.
  let before: PromoCode =
    serde_json::from_str(versions[0].before_value.as_deref().unwrap()).unwrap();
  let after: PromoCode = serde_json::from_str(&versions[0].after_value).unwrap();
  assert_eq!(before.status, CodeStatus::Active);
  assert_eq!(after.status, CodeStatus::Inactive);
  assert_eq!(versions[0].updated_by, "alice");
}

#[tokio::test]
async fn update_missing_returns_none_without_audit() {
  let s = store().await;

  let patch = PromoCodePatch::empty(Uuid::new_v4());
  assert!(s.update_code(patch).await.unwrap().is_none());
  assert!(s.all_versions().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_can_set_a_field_to_zero() {
  let s = store().await;
  let stored = s.add_code(new_code("Promo1", "PROMO1", 10)).await.unwrap();

  let mut patch = PromoCodePatch::empty(stored.id);
  patch.remaining_uses = Some(0);
  patch.updated_by = Some("ops".into());

  let merged = s.update_code(patch).await.unwrap().unwrap();
  assert_eq!(merged.remaining_uses, 0);
}

// ─── Soft delete ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn soft_delete_hides_record_and_audits() {
  let s = store().await;
  let stored = s.add_code(new_code("Promo1", "PROMO1", 10)).await.unwrap();

  assert!(s.soft_delete_code(stored.id, "admin").await.unwrap());

  // Gone from every read path.
  assert!(s.code_by_id(stored.id).await.unwrap().is_none());
  assert!(s.code_by_code("PROMO1").await.unwrap().is_none());
  assert!(s.active_codes().await.unwrap().is_empty());

  // The audit snapshot shows the terminal state.
  let versions = s.versions_by_object_id(stored.id).await.unwrap();
  assert_eq!(versions.len(), 2);
  let after: PromoCode = serde_json::from_str(&versions[0].after_value).unwrap();
  assert_eq!(after.status, CodeStatus::Deleted);
  assert!(after.is_deleted);
  assert_eq!(versions[0].updated_by, "admin");
}

#[tokio::test]
async fn soft_delete_missing_is_a_noop() {
  let s = store().await;
  assert!(!s.soft_delete_code(Uuid::new_v4(), "admin").await.unwrap());
  assert!(s.all_versions().await.unwrap().is_empty());
}

// ─── Availability ────────────────────────────────────────────────────────────

#[tokio::test]
async fn check_availability_reports_remaining_uses() {
  let s = store().await;
  s.add_code(new_code("Promo1", "PROMO1", 7)).await.unwrap();

  assert_eq!(s.check_availability("PROMO1").await.unwrap(), Some(7));
  assert_eq!(s.check_availability("NOPE").await.unwrap(), None);
}

// ─── Redeem ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn redeem_decrements_and_audits() {
  let s = store().await;
  let stored = s.add_code(new_code("Promo1", "PROMO1", 10)).await.unwrap();

  let outcome = s.redeem_code("PROMO1", "system:redeem").await.unwrap();
  let RedeemOutcome::Redeemed(after) = outcome else {
    panic!("expected Redeemed");
  };
  assert_eq!(after.remaining_uses, 9);

  let reread = s.code_by_id(stored.id).await.unwrap().unwrap();
  assert_eq!(reread.remaining_uses, 9);

  let versions = s.versions_by_object_id(stored.id).await.unwrap();
  assert_eq!(versions.len(), 2);
  let before: PromoCode =
    serde_json::from_str(versions[0].before_value.as_deref().unwrap()).unwrap();
  assert_eq!(before.remaining_uses, 10);
  assert_eq!(versions[0].updated_by, "system:redeem");
}

#[tokio::test]
async fn redeem_exhausted_issues_no_mutation() {
  let s = store().await;
  let mut input = new_code("Spent", "SPENT", 0);
  input.max_uses = 10;
  let stored = s.add_code(input).await.unwrap();

  let outcome = s.redeem_code("SPENT", "system:redeem").await.unwrap();
  assert!(matches!(outcome, RedeemOutcome::Exhausted));

  let reread = s.code_by_id(stored.id).await.unwrap().unwrap();
  assert_eq!(reread.remaining_uses, 0);
  assert!(reread.updated_at.is_none());

  // Only the creation record exists; the failed redeem appended nothing.
  assert_eq!(s.versions_by_object_id(stored.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn redeem_unknown_code_is_not_found() {
  let s = store().await;
  let outcome = s.redeem_code("GHOST", "system:redeem").await.unwrap();
  assert!(matches!(outcome, RedeemOutcome::NotFound));
  assert!(s.all_versions().await.unwrap().is_empty());
}

#[tokio::test]
async fn every_mutation_appends_exactly_one_audit_record() {
  let s = store().await;
  let stored = s.add_code(new_code("Promo1", "PROMO1", 10)).await.unwrap();

  let mut patch = PromoCodePatch::empty(stored.id);
  patch.name = Some("Renamed".into());
  patch.updated_by = Some("alice".into());
  s.update_code(patch).await.unwrap().unwrap();

  s.redeem_code("PROMO1", "system:redeem").await.unwrap();
  s.soft_delete_code(stored.id, "admin").await.unwrap();

  assert_eq!(s.versions_by_object_id(stored.id).await.unwrap().len(), 4);
}

// ─── Version queries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn versions_are_ordered_newest_first() {
  let s = store().await;
  let stored = s.add_code(new_code("Promo1", "PROMO1", 10)).await.unwrap();

  for actor in ["first", "second", "third"] {
    let mut patch = PromoCodePatch::empty(stored.id);
    patch.name = Some(format!("Promo1 ({actor})"));
    patch.updated_by = Some(actor.into());
    s.update_code(patch).await.unwrap().unwrap();
  }

  let versions = s
    .versions_by_object(PROMO_CODE_OBJECT_TYPE, stored.tenant_id, stored.id)
    .await
    .unwrap();
  let actors: Vec<&str> = versions.iter().map(|v| v.updated_by.as_str()).collect();
  assert_eq!(actors, ["third", "second", "first", "seed"]);

  let stamps: Vec<_> = versions.iter().map(|v| v.updated_on).collect();
  let mut sorted = stamps.clone();
  sorted.sort_by(|a, b| b.cmp(a));
  assert_eq!(stamps, sorted);
}

#[tokio::test]
async fn versions_by_object_filters_on_full_identity() {
  let s = store().await;
  let a = s.add_code(new_code("A", "CODE-A", 1)).await.unwrap();
  let b = s.add_code(new_code("B", "CODE-B", 1)).await.unwrap();

  let only_a = s
    .versions_by_object(PROMO_CODE_OBJECT_TYPE, a.tenant_id, a.id)
    .await
    .unwrap();
  assert_eq!(only_a.len(), 1);
  assert_eq!(only_a[0].object_id, a.id);

  // Wrong tenant: the strict filter misses, the loose one still matches.
  let wrong_tenant = s
    .versions_by_object(PROMO_CODE_OBJECT_TYPE, b.tenant_id, a.id)
    .await
    .unwrap();
  assert!(wrong_tenant.is_empty());
  assert_eq!(s.versions_by_object_id(a.id).await.unwrap().len(), 1);

  assert_eq!(s.all_versions().await.unwrap().len(), 2);
}

#[tokio::test]
async fn manual_version_append_roundtrips() {
  let s = store().await;

  let appended = s
    .append_version(NewObjectVersion {
      object_type:   "tenant".into(),
      object_id:     Uuid::new_v4(),
      object_tenant: Uuid::new_v4(),
      before_value:  None,
      after_value:   r#"{"name":"acme"}"#.into(),
      updated_by:    "importer".into(),
    })
    .await
    .unwrap();

  let found = s.versions_by_object_id(appended.object_id).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].id, appended.id);
  assert_eq!(found[0].after_value, r#"{"name":"acme"}"#);
}

// ─── Legacy slots ────────────────────────────────────────────────────────────

#[tokio::test]
async fn version_update_and_delete_are_unsupported() {
  let s = store().await;
  let appended = s
    .append_version(NewObjectVersion {
      object_type:   "tenant".into(),
      object_id:     Uuid::new_v4(),
      object_tenant: Uuid::new_v4(),
      before_value:  None,
      after_value:   "{}".into(),
      updated_by:    "importer".into(),
    })
    .await
    .unwrap();

  let err = s.update_version(appended.clone()).await.unwrap_err();
  assert!(matches!(err, scrip_core::Error::Unsupported(_)));

  let err = s.delete_version(appended.id).await.unwrap_err();
  assert!(matches!(err, scrip_core::Error::Unsupported(_)));
}
