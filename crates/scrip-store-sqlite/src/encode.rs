//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings (which sort correctly as
//! text). UUIDs are stored as hyphenated lowercase strings. Snapshots are
//! compact JSON.

use chrono::{DateTime, Utc};
use scrip_core::{
  code::{CodeStatus, PromoCode},
  version::ObjectVersion,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── CodeStatus ──────────────────────────────────────────────────────────────

pub fn encode_status(s: CodeStatus) -> &'static str {
  match s {
    CodeStatus::Active => "active",
    CodeStatus::Inactive => "inactive",
    CodeStatus::Deleted => "deleted",
  }
}

pub fn decode_status(s: &str) -> Result<CodeStatus> {
  match s {
    "active" => Ok(CodeStatus::Active),
    "inactive" => Ok(CodeStatus::Inactive),
    "deleted" => Ok(CodeStatus::Deleted),
    other => Err(Error::Core(scrip_core::Error::UnknownStatus(other.to_owned()))),
  }
}

// ─── Counters ────────────────────────────────────────────────────────────────

pub fn decode_uses(column: &str, raw: i64) -> Result<u32> {
  u32::try_from(raw).map_err(|_| Error::OutOfRange(format!("{column} = {raw}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `promo_codes` row.
pub struct RawPromoCode {
  pub id:             String,
  pub name:           String,
  pub code:           String,
  pub remaining_uses: i64,
  pub max_uses:       i64,
  pub status:         String,
  pub tenant_id:      String,
  pub is_deleted:     bool,
  pub created_at:     String,
  pub created_by:     String,
  pub updated_at:     Option<String>,
  pub updated_by:     Option<String>,
}

impl RawPromoCode {
  pub fn into_code(self) -> Result<PromoCode> {
    Ok(PromoCode {
      id:             decode_uuid(&self.id)?,
      name:           self.name,
      code:           self.code,
      remaining_uses: decode_uses("remaining_uses", self.remaining_uses)?,
      max_uses:       decode_uses("max_uses", self.max_uses)?,
      status:         decode_status(&self.status)?,
      tenant_id:      decode_uuid(&self.tenant_id)?,
      is_deleted:     self.is_deleted,
      created_at:     decode_dt(&self.created_at)?,
      created_by:     self.created_by,
      updated_at:     self.updated_at.as_deref().map(decode_dt).transpose()?,
      updated_by:     self.updated_by,
    })
  }
}

/// Raw values read directly from an `object_versions` row.
pub struct RawObjectVersion {
  pub id:            String,
  pub object_type:   String,
  pub object_id:     String,
  pub object_tenant: String,
  pub before_value:  Option<String>,
  pub after_value:   String,
  pub updated_on:    String,
  pub updated_by:    String,
}

impl RawObjectVersion {
  pub fn into_version(self) -> Result<ObjectVersion> {
    Ok(ObjectVersion {
      id:            decode_uuid(&self.id)?,
      object_type:   self.object_type,
      object_id:     decode_uuid(&self.object_id)?,
      object_tenant: decode_uuid(&self.object_tenant)?,
      before_value:  self.before_value,
      after_value:   self.after_value,
      updated_on:    decode_dt(&self.updated_on)?,
      updated_by:    self.updated_by,
    })
  }
}
