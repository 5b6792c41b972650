//! SQL schema for the Scrip SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// There is deliberately no foreign key from `object_versions` to
/// `promo_codes`: audit rows must stay valid regardless of what happens to
/// the source record.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS promo_codes (
    id              TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    code            TEXT NOT NULL,   -- redemption string; lookup key, not UNIQUE
    remaining_uses  INTEGER NOT NULL CHECK (remaining_uses >= 0),
    max_uses        INTEGER NOT NULL CHECK (max_uses >= 0),
    status          TEXT NOT NULL,   -- 'active' | 'inactive' | 'deleted'
    tenant_id       TEXT NOT NULL,
    is_deleted      INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    created_by      TEXT NOT NULL,
    updated_at      TEXT,
    updated_by      TEXT
);

-- Audit records are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS object_versions (
    id            TEXT PRIMARY KEY,
    object_type   TEXT NOT NULL,
    object_id     TEXT NOT NULL,
    object_tenant TEXT NOT NULL,
    before_value  TEXT,              -- JSON snapshot; NULL for creations
    after_value   TEXT NOT NULL,     -- JSON snapshot
    updated_on    TEXT NOT NULL,
    updated_by    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS promo_codes_code_idx      ON promo_codes(code);
CREATE INDEX IF NOT EXISTS promo_codes_active_idx    ON promo_codes(status, is_deleted);
CREATE INDEX IF NOT EXISTS object_versions_obj_idx   ON object_versions(object_type, object_tenant, object_id);
CREATE INDEX IF NOT EXISTS object_versions_objid_idx ON object_versions(object_id);

PRAGMA user_version = 1;
";
