//! [`SqliteStore`] — the SQLite implementation of [`CodeStore`] and
//! [`VersionStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use scrip_core::{
  code::{CodeStatus, NewPromoCode, PromoCode, RedeemOutcome},
  patch::PromoCodePatch,
  store::{CodeStore, VersionStore},
  version::{NewObjectVersion, ObjectVersion, PROMO_CODE_OBJECT_TYPE},
};

use crate::{
  Error, Result,
  encode::{RawObjectVersion, RawPromoCode, encode_dt, encode_status, encode_uuid},
  schema::SCHEMA,
};

const CODE_COLUMNS: &str = "id, name, code, remaining_uses, max_uses, status, \
                            tenant_id, is_deleted, created_at, created_by, \
                            updated_at, updated_by";
const VERSION_COLUMNS: &str = "id, object_type, object_id, object_tenant, \
                               before_value, after_value, updated_on, updated_by";

/// WHERE fragment selecting rows visible to read queries.
const ACTIVE_FILTER: &str = "status = 'active' AND is_deleted = 0";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Scrip store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// are funnelled through one connection, and every mutation commits its
/// audit append in the same transaction.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row helpers (run inside `call` closures) ────────────────────────────────

fn other_err<E>(e: E) -> tokio_rusqlite::Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  tokio_rusqlite::Error::Other(Box::new(e))
}

fn read_code_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPromoCode> {
  Ok(RawPromoCode {
    id:             row.get(0)?,
    name:           row.get(1)?,
    code:           row.get(2)?,
    remaining_uses: row.get(3)?,
    max_uses:       row.get(4)?,
    status:         row.get(5)?,
    tenant_id:      row.get(6)?,
    is_deleted:     row.get(7)?,
    created_at:     row.get(8)?,
    created_by:     row.get(9)?,
    updated_at:     row.get(10)?,
    updated_by:     row.get(11)?,
  })
}

fn read_version_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawObjectVersion> {
  Ok(RawObjectVersion {
    id:            row.get(0)?,
    object_type:   row.get(1)?,
    object_id:     row.get(2)?,
    object_tenant: row.get(3)?,
    before_value:  row.get(4)?,
    after_value:   row.get(5)?,
    updated_on:    row.get(6)?,
    updated_by:    row.get(7)?,
  })
}

/// Load a row by id with no visibility filter — mutations address deleted
/// rows too, matching the original find-by-key semantics.
fn select_code_by_id(
  conn: &rusqlite::Connection,
  id_str: &str,
) -> rusqlite::Result<Option<RawPromoCode>> {
  conn
    .query_row(
      &format!("SELECT {CODE_COLUMNS} FROM promo_codes WHERE id = ?1"),
      rusqlite::params![id_str],
      read_code_row,
    )
    .optional()
}

fn select_active_code_by_code(
  conn: &rusqlite::Connection,
  code: &str,
) -> rusqlite::Result<Option<RawPromoCode>> {
  conn
    .query_row(
      &format!(
        "SELECT {CODE_COLUMNS} FROM promo_codes
         WHERE code = ?1 AND {ACTIVE_FILTER}
         ORDER BY COALESCE(updated_at, created_at) DESC
         LIMIT 1"
      ),
      rusqlite::params![code],
      read_code_row,
    )
    .optional()
}

fn insert_code_row(conn: &rusqlite::Connection, code: &PromoCode) -> rusqlite::Result<()> {
  conn.execute(
    &format!(
      "INSERT INTO promo_codes ({CODE_COLUMNS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
    ),
    rusqlite::params![
      encode_uuid(code.id),
      code.name,
      code.code,
      i64::from(code.remaining_uses),
      i64::from(code.max_uses),
      encode_status(code.status),
      encode_uuid(code.tenant_id),
      code.is_deleted,
      encode_dt(code.created_at),
      code.created_by,
      code.updated_at.map(encode_dt),
      code.updated_by,
    ],
  )?;
  Ok(())
}

/// Full-row overwrite by id (the merge already happened in Rust).
fn persist_code_row(conn: &rusqlite::Connection, code: &PromoCode) -> rusqlite::Result<()> {
  conn.execute(
    "UPDATE promo_codes SET
       name = ?2, code = ?3, remaining_uses = ?4, max_uses = ?5, status = ?6,
       tenant_id = ?7, is_deleted = ?8, updated_at = ?9, updated_by = ?10
     WHERE id = ?1",
    rusqlite::params![
      encode_uuid(code.id),
      code.name,
      code.code,
      i64::from(code.remaining_uses),
      i64::from(code.max_uses),
      encode_status(code.status),
      encode_uuid(code.tenant_id),
      code.is_deleted,
      code.updated_at.map(encode_dt),
      code.updated_by,
    ],
  )?;
  Ok(())
}

fn insert_version_row(
  conn: &rusqlite::Connection,
  version: &ObjectVersion,
) -> rusqlite::Result<()> {
  conn.execute(
    &format!(
      "INSERT INTO object_versions ({VERSION_COLUMNS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
    ),
    rusqlite::params![
      encode_uuid(version.id),
      version.object_type,
      encode_uuid(version.object_id),
      encode_uuid(version.object_tenant),
      version.before_value,
      version.after_value,
      encode_dt(version.updated_on),
      version.updated_by,
    ],
  )?;
  Ok(())
}

/// Build the audit record for a promo-code mutation. `before = None` marks a
/// creation.
fn code_audit(
  before: Option<&PromoCode>,
  after: &PromoCode,
  updated_by: &str,
) -> serde_json::Result<ObjectVersion> {
  Ok(ObjectVersion {
    id:            Uuid::new_v4(),
    object_type:   PROMO_CODE_OBJECT_TYPE.to_owned(),
    object_id:     after.id,
    object_tenant: after.tenant_id,
    before_value:  before.map(serde_json::to_string).transpose()?,
    after_value:   serde_json::to_string(after)?,
    updated_on:    Utc::now(),
    updated_by:    updated_by.to_owned(),
  })
}

// ─── CodeStore impl ──────────────────────────────────────────────────────────

impl CodeStore for SqliteStore {
  type Error = Error;

  async fn active_codes(&self) -> Result<Vec<PromoCode>> {
    let raws: Vec<RawPromoCode> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CODE_COLUMNS} FROM promo_codes
           WHERE {ACTIVE_FILTER}
           ORDER BY COALESCE(updated_at, created_at) DESC"
        ))?;
        let rows = stmt
          .query_map([], read_code_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPromoCode::into_code).collect()
  }

  async fn code_by_id(&self, id: Uuid) -> Result<Option<PromoCode>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPromoCode> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {CODE_COLUMNS} FROM promo_codes
                 WHERE id = ?1 AND {ACTIVE_FILTER}"
              ),
              rusqlite::params![id_str],
              read_code_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPromoCode::into_code).transpose()
  }

  async fn code_by_code(&self, code: &str) -> Result<Option<PromoCode>> {
    let code = code.to_owned();

    let raw: Option<RawPromoCode> = self
      .conn
      .call(move |conn| Ok(select_active_code_by_code(conn, &code)?))
      .await?;

    raw.map(RawPromoCode::into_code).transpose()
  }

  async fn add_code(&self, input: NewPromoCode) -> Result<PromoCode> {
    let code = PromoCode {
      id:             Uuid::new_v4(),
      name:           input.name,
      code:           input.code,
      remaining_uses: input.remaining_uses,
      max_uses:       input.max_uses,
      status:         input.status,
      tenant_id:      input.tenant_id,
      // Deleted status and the soft-delete flag always travel together.
      is_deleted:     input.status == CodeStatus::Deleted,
      created_at:     Utc::now(),
      created_by:     input.created_by,
      updated_at:     None,
      updated_by:     None,
    };
    let audit = code_audit(None, &code, &code.created_by)?;

    let stored = code.clone();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        insert_code_row(&tx, &code)?;
        insert_version_row(&tx, &audit)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(stored)
  }

  async fn update_code(&self, patch: PromoCodePatch) -> Result<Option<PromoCode>> {
    let merged: Option<PromoCode> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(raw) = select_code_by_id(&tx, &encode_uuid(patch.id))? else {
          return Ok(None);
        };
        let existing = raw.into_code().map_err(other_err)?;

        let mut merged = existing.clone();
        patch.apply_to(&mut merged);
        if merged.status == CodeStatus::Deleted {
          merged.is_deleted = true;
        }
        merged.updated_at = Some(Utc::now());

        persist_code_row(&tx, &merged)?;

        let actor = merged
          .updated_by
          .clone()
          .unwrap_or_else(|| "system".to_owned());
        let audit = code_audit(Some(&existing), &merged, &actor).map_err(other_err)?;
        insert_version_row(&tx, &audit)?;

        tx.commit()?;
        Ok(Some(merged))
      })
      .await?;

    Ok(merged)
  }

  async fn soft_delete_code(&self, id: Uuid, updated_by: &str) -> Result<bool> {
    let id_str = encode_uuid(id);
    let updated_by = updated_by.to_owned();

    let deleted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(raw) = select_code_by_id(&tx, &id_str)? else {
          return Ok(false);
        };
        let existing = raw.into_code().map_err(other_err)?;

        let mut deleted = existing.clone();
        deleted.is_deleted = true;
        deleted.status = CodeStatus::Deleted;
        deleted.updated_at = Some(Utc::now());
        deleted.updated_by = Some(updated_by.clone());

        persist_code_row(&tx, &deleted)?;

        let audit =
          code_audit(Some(&existing), &deleted, &updated_by).map_err(other_err)?;
        insert_version_row(&tx, &audit)?;

        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(deleted)
  }

  async fn check_availability(&self, code: &str) -> Result<Option<u32>> {
    let code = code.to_owned();

    let remaining: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT remaining_uses FROM promo_codes
                 WHERE code = ?1 AND {ACTIVE_FILTER}
                 ORDER BY COALESCE(updated_at, created_at) DESC
                 LIMIT 1"
              ),
              rusqlite::params![code],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    remaining
      .map(|r| crate::encode::decode_uses("remaining_uses", r))
      .transpose()
  }

  async fn redeem_code(&self, code: &str, redeemed_by: &str) -> Result<RedeemOutcome> {
    let code = code.to_owned();
    let redeemed_by = redeemed_by.to_owned();

    let outcome: RedeemOutcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(raw) = select_active_code_by_code(&tx, &code)? else {
          return Ok(RedeemOutcome::NotFound);
        };
        let before = raw.into_code().map_err(other_err)?;

        // The decrement is guarded in SQL; a concurrent redeem that spent
        // the last use between our read and this write matches zero rows.
        let now = Utc::now();
        let rows = tx.execute(
          "UPDATE promo_codes
           SET remaining_uses = remaining_uses - 1, updated_at = ?2, updated_by = ?3
           WHERE id = ?1 AND remaining_uses > 0",
          rusqlite::params![encode_uuid(before.id), encode_dt(now), redeemed_by],
        )?;
        if rows == 0 {
          return Ok(RedeemOutcome::Exhausted);
        }

        let mut after = before.clone();
        after.remaining_uses -= 1;
        after.updated_at = Some(now);
        after.updated_by = Some(redeemed_by.clone());

        let audit =
          code_audit(Some(&before), &after, &redeemed_by).map_err(other_err)?;
        insert_version_row(&tx, &audit)?;

        tx.commit()?;
        Ok(RedeemOutcome::Redeemed(after))
      })
      .await?;

    Ok(outcome)
  }
}

// ─── VersionStore impl ───────────────────────────────────────────────────────

impl VersionStore for SqliteStore {
  type Error = Error;

  async fn append_version(&self, input: NewObjectVersion) -> Result<ObjectVersion> {
    let version = ObjectVersion {
      id:            Uuid::new_v4(),
      object_type:   input.object_type,
      object_id:     input.object_id,
      object_tenant: input.object_tenant,
      before_value:  input.before_value,
      after_value:   input.after_value,
      updated_on:    Utc::now(),
      updated_by:    input.updated_by,
    };

    let stored = version.clone();
    self
      .conn
      .call(move |conn| Ok(insert_version_row(conn, &version)?))
      .await?;

    Ok(stored)
  }

  async fn versions_by_object(
    &self,
    object_type: &str,
    object_tenant: Uuid,
    object_id: Uuid,
  ) -> Result<Vec<ObjectVersion>> {
    let object_type = object_type.to_owned();
    let tenant_str = encode_uuid(object_tenant);
    let id_str = encode_uuid(object_id);

    let raws: Vec<RawObjectVersion> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {VERSION_COLUMNS} FROM object_versions
           WHERE object_type = ?1 AND object_tenant = ?2 AND object_id = ?3
           ORDER BY updated_on DESC"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![object_type, tenant_str, id_str],
            read_version_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawObjectVersion::into_version).collect()
  }

  async fn versions_by_object_id(&self, object_id: Uuid) -> Result<Vec<ObjectVersion>> {
    let id_str = encode_uuid(object_id);

    let raws: Vec<RawObjectVersion> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {VERSION_COLUMNS} FROM object_versions
           WHERE object_id = ?1
           ORDER BY updated_on DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], read_version_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawObjectVersion::into_version).collect()
  }

  async fn all_versions(&self) -> Result<Vec<ObjectVersion>> {
    let raws: Vec<RawObjectVersion> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {VERSION_COLUMNS} FROM object_versions ORDER BY updated_on DESC"
        ))?;
        let rows = stmt
          .query_map([], read_version_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawObjectVersion::into_version).collect()
  }
}
