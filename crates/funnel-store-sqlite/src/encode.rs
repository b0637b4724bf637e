//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Statuses are stored as their
//! lowercase discriminants. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use funnel_core::lead::{Lead, LeadStatus, Note};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── LeadStatus
// ───────────────────────────────────────────────────────────────

pub fn encode_status(status: LeadStatus) -> &'static str { status.as_str() }

pub fn decode_status(s: &str) -> Result<LeadStatus> {
  Ok(LeadStatus::parse(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `leads` row.
pub struct RawLead {
  pub lead_id:    String,
  pub name:       String,
  pub email:      String,
  pub phone:      Option<String>,
  pub source:     String,
  pub message:    Option<String>,
  pub status:     String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawLead {
  /// Columns in the order every `SELECT` against `leads` uses.
  pub const COLUMNS: &'static str =
    "lead_id, name, email, phone, source, message, status, created_at, updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      lead_id:    row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      phone:      row.get(3)?,
      source:     row.get(4)?,
      message:    row.get(5)?,
      status:     row.get(6)?,
      created_at: row.get(7)?,
      updated_at: row.get(8)?,
    })
  }

  pub fn into_lead(self, notes: Vec<Note>) -> Result<Lead> {
    Ok(Lead {
      lead_id:    decode_uuid(&self.lead_id)?,
      name:       self.name,
      email:      self.email,
      phone:      self.phone,
      source:     self.source,
      message:    self.message,
      status:     decode_status(&self.status)?,
      notes,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `notes` row (`seq` is never surfaced).
pub struct RawNote {
  pub note_id:    String,
  pub text:       String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawNote {
  /// Columns in the order every `SELECT` against `notes` uses.
  pub const COLUMNS: &'static str = "note_id, text, created_at, updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      note_id:    row.get(offset)?,
      text:       row.get(offset + 1)?,
      created_at: row.get(offset + 2)?,
      updated_at: row.get(offset + 3)?,
    })
  }

  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      note_id:    decode_uuid(&self.note_id)?,
      text:       self.text,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
