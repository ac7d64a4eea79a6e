//! SQL schema for the guest profile store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision for later migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per guest identity; saves overwrite the whole row.
CREATE TABLE IF NOT EXISTS profiles (
    guest_id     TEXT PRIMARY KEY,   -- 'GID-' + 8 hex chars
    display_name TEXT NOT NULL,
    names_json   TEXT NOT NULL,      -- JSON array of name spellings
    profile_json TEXT NOT NULL,      -- full GuestProfile document
    total_visits INTEGER NOT NULL DEFAULT 0,
    last_updated TEXT                -- ISO 8601 date or NULL
);

CREATE INDEX IF NOT EXISTS profiles_name_idx ON profiles(display_name);

PRAGMA user_version = 1;
";
