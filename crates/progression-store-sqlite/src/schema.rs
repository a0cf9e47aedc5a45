//! SQL schema for the Progression SQLite event log.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS event_stream (
    stream_id   TEXT PRIMARY KEY,
    active      INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL
);

-- Rows are never deleted. Archival only clears `active` or moves `stream_id`.
CREATE TABLE IF NOT EXISTS event_log (
    sequence_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id     TEXT NOT NULL UNIQUE,
    stream_id    TEXT REFERENCES event_stream(stream_id),
    name         TEXT NOT NULL,
    payload      TEXT NOT NULL,   -- JSON document
    created_at   TEXT,            -- as supplied; may not parse
    active       INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS event_log_stream_idx ON event_log(stream_id);
CREATE INDEX IF NOT EXISTS event_log_name_idx   ON event_log(name);

PRAGMA user_version = 1;
";
