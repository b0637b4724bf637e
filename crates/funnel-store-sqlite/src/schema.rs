//! SQL schema for the Funnel SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS leads (
    lead_id    TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    email      TEXT NOT NULL,
    phone      TEXT,
    source     TEXT NOT NULL DEFAULT 'Website',
    message    TEXT,
    status     TEXT NOT NULL DEFAULT 'new',  -- 'new' | 'contacted' | 'converted' | 'lost'
    created_at TEXT NOT NULL,                -- ISO 8601 UTC; store-assigned
    updated_at TEXT NOT NULL
);

-- Notes are embedded in their lead: cascade delete, ordered by a per-lead
-- monotonic seq. seq values are never reassigned, so a delete cannot reorder
-- the remaining notes.
CREATE TABLE IF NOT EXISTS notes (
    note_id    TEXT PRIMARY KEY,
    lead_id    TEXT NOT NULL REFERENCES leads(lead_id) ON DELETE CASCADE,
    seq        INTEGER NOT NULL,
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (lead_id, seq)
);

CREATE INDEX IF NOT EXISTS notes_lead_idx    ON notes(lead_id);
CREATE INDEX IF NOT EXISTS leads_created_idx ON leads(created_at);

PRAGMA user_version = 1;
";
