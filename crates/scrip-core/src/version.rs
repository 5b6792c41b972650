//! Object versioning — the append-only audit trail.
//!
//! Every mutation of a tracked object appends exactly one record holding
//! serialized before/after snapshots. Records are immutable once written and
//! are retrieved newest-first by `updated_on`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `object_type` value used for promo-code audit records.
pub const PROMO_CODE_OBJECT_TYPE: &str = "promo_code";

/// One entry in the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectVersion {
  pub id:            Uuid,
  pub object_type:   String,
  pub object_id:     Uuid,
  pub object_tenant: Uuid,
  /// Serialized snapshot before the mutation; `None` for a creation.
  pub before_value:  Option<String>,
  /// Serialized snapshot after the mutation.
  pub after_value:   String,
  pub updated_on:    DateTime<Utc>,
  pub updated_by:    String,
}

/// Input for appending an audit record. The store stamps `id` and
/// `updated_on`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewObjectVersion {
  pub object_type:   String,
  pub object_id:     Uuid,
  pub object_tenant: Uuid,
  pub before_value:  Option<String>,
  pub after_value:   String,
  pub updated_by:    String,
}
