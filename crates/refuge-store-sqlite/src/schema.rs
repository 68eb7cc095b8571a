//! SQL schema for the refuge SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- The primary key is the only uniqueness guard for survivor ids.
CREATE TABLE IF NOT EXISTS survivors (
    survivor_id     TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    age             INTEGER NOT NULL,
    latitude        REAL NOT NULL,
    longitude       REAL NOT NULL,
    resources       TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    reported_count  INTEGER NOT NULL DEFAULT 0,
    reported_by     TEXT NOT NULL DEFAULT '[]'    -- JSON array of reporter ids
);

-- Strictly append-only.
CREATE TABLE IF NOT EXISTS location_history (
    entry_id     TEXT PRIMARY KEY,
    survivor_id  TEXT NOT NULL REFERENCES survivors(survivor_id),
    latitude     REAL NOT NULL,
    longitude    REAL NOT NULL,
    recorded_at  TEXT NOT NULL   -- ISO 8601 UTC; server-assigned
);

-- Replaced wholesale on every catalog load; robot_id keeps feed order.
CREATE TABLE IF NOT EXISTS robots (
    robot_id           INTEGER PRIMARY KEY,
    model              TEXT NOT NULL,
    serial_number      TEXT NOT NULL,
    manufactured_date  TEXT NOT NULL,
    category           TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS survivors_reported_idx ON survivors(reported_count);
CREATE INDEX IF NOT EXISTS history_survivor_idx   ON location_history(survivor_id);

PRAGMA user_version = 1;
";
