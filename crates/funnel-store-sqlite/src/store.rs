//! [`SqliteStore`] — the SQLite implementation of [`LeadStore`].
//!
//! Every mutation is an atomic scoped statement (or a single transaction), so
//! concurrent operations on the same lead interleave without losing writes —
//! there is no read-modify-write of a whole lead anywhere in this module.

use std::{collections::HashMap, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use funnel_core::{
  lead::{Lead, LeadStatus, NewLead},
  store::LeadStore,
};

use crate::{
  Error, Result,
  encode::{RawLead, RawNote, encode_dt, encode_status, encode_uuid},
  schema::SCHEMA,
};

/// Outcome of a note mutation, reported from inside the write transaction so
/// missing-lead and missing-note cases can be told apart without a second
/// round-trip.
enum NoteMutation {
  Applied,
  LeadMissing,
  NoteMissing,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Funnel lead store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
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

  /// Read one lead together with its notes, in note-insertion order.
  async fn fetch_lead(&self, id: Uuid) -> Result<Option<Lead>> {
    let id_str = encode_uuid(id);

    let raw: Option<(RawLead, Vec<RawNote>)> = self
      .conn
      .call(move |conn| {
        let lead = conn
          .query_row(
            &format!("SELECT {} FROM leads WHERE lead_id = ?1", RawLead::COLUMNS),
            rusqlite::params![id_str],
            RawLead::from_row,
          )
          .optional()?;

        let Some(lead) = lead else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM notes WHERE lead_id = ?1 ORDER BY seq",
          RawNote::COLUMNS
        ))?;
        let notes = stmt
          .query_map(rusqlite::params![lead.lead_id], |row| {
            RawNote::from_row(row, 0)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((lead, notes)))
      })
      .await?;

    let Some((raw_lead, raw_notes)) = raw else {
      return Ok(None);
    };

    let notes = raw_notes
      .into_iter()
      .map(RawNote::into_note)
      .collect::<Result<Vec<_>>>()?;
    Ok(Some(raw_lead.into_lead(notes)?))
  }

  /// `fetch_lead` for ids a mutation just touched; leads are never deleted,
  /// so the id still resolves.
  async fn fetch_known_lead(&self, id: Uuid) -> Result<Lead> {
    self.fetch_lead(id).await?.ok_or(Error::LeadNotFound(id))
  }
}

// ─── LeadStore impl ──────────────────────────────────────────────────────────

impl LeadStore for SqliteStore {
  type Error = Error;

  async fn create_lead(&self, input: NewLead) -> Result<Lead> {
    input.validate().map_err(Error::Core)?;

    let now = Utc::now();
    let lead = Lead {
      lead_id:    Uuid::new_v4(),
      name:       input.name.clone(),
      email:      input.email.clone(),
      phone:      input.phone.clone(),
      source:     input.source_or_default().to_owned(),
      message:    input.message.clone(),
      status:     LeadStatus::New,
      notes:      Vec::new(),
      created_at: now,
      updated_at: now,
    };

    let id_str     = encode_uuid(lead.lead_id);
    let status_str = encode_status(lead.status).to_owned();
    let at_str     = encode_dt(now);
    let name       = lead.name.clone();
    let email      = lead.email.clone();
    let phone      = lead.phone.clone();
    let source     = lead.source.clone();
    let message    = lead.message.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO leads (
             lead_id, name, email, phone, source, message, status,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            id_str, name, email, phone, source, message, status_str, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(lead)
  }

  async fn list_leads(&self) -> Result<Vec<Lead>> {
    let (raw_leads, raw_notes): (Vec<RawLead>, Vec<(String, RawNote)>) = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM leads ORDER BY created_at DESC",
          RawLead::COLUMNS
        ))?;
        let leads = stmt
          .query_map([], RawLead::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(&format!(
          "SELECT lead_id, {} FROM notes ORDER BY lead_id, seq",
          RawNote::COLUMNS
        ))?;
        let notes = stmt
          .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, RawNote::from_row(row, 1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((leads, notes))
      })
      .await?;

    // Group notes per lead; within a lead they are already in seq order.
    let mut by_lead: HashMap<String, Vec<RawNote>> = HashMap::new();
    for (lead_id, note) in raw_notes {
      by_lead.entry(lead_id).or_default().push(note);
    }

    raw_leads
      .into_iter()
      .map(|raw| {
        let notes = by_lead
          .remove(&raw.lead_id)
          .unwrap_or_default()
          .into_iter()
          .map(RawNote::into_note)
          .collect::<Result<Vec<_>>>()?;
        raw.into_lead(notes)
      })
      .collect()
  }

  async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>> {
    self.fetch_lead(id).await
  }

  async fn update_status(&self, id: Uuid, status: LeadStatus) -> Result<Lead> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status).to_owned();
    let at_str     = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE leads SET status = ?1, updated_at = ?2 WHERE lead_id = ?3",
          rusqlite::params![status_str, at_str, id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::LeadNotFound(id));
    }
    self.fetch_known_lead(id).await
  }

  async fn add_note(&self, id: Uuid, text: String) -> Result<Lead> {
    if text.trim().is_empty() {
      return Err(Error::Core(funnel_core::Error::EmptyField("text")));
    }

    let lead_id_str = encode_uuid(id);
    let note_id_str = encode_uuid(Uuid::new_v4());
    let at_str      = encode_dt(Utc::now());

    // The seq subselect runs inside the insert's own transaction, so two
    // concurrent appends both land, in some order, with distinct seqs.
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let touched = tx.execute(
          "UPDATE leads SET updated_at = ?1 WHERE lead_id = ?2",
          rusqlite::params![at_str, lead_id_str],
        )?;
        if touched == 0 {
          return Ok(false);
        }

        tx.execute(
          "INSERT INTO notes (note_id, lead_id, seq, text, created_at, updated_at)
           VALUES (
             ?1, ?2,
             (SELECT COALESCE(MAX(seq) + 1, 0) FROM notes WHERE lead_id = ?2),
             ?3, ?4, ?4
           )",
          rusqlite::params![note_id_str, lead_id_str, text, at_str],
        )?;

        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::LeadNotFound(id));
    }
    self.fetch_known_lead(id).await
  }

  async fn update_note(&self, id: Uuid, note_id: Uuid, text: String) -> Result<Lead> {
    if text.trim().is_empty() {
      return Err(Error::Core(funnel_core::Error::EmptyField("text")));
    }

    let lead_id_str = encode_uuid(id);
    let note_id_str = encode_uuid(note_id);
    let at_str      = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let changed = tx.execute(
          "UPDATE notes SET text = ?1, updated_at = ?2
           WHERE note_id = ?3 AND lead_id = ?4",
          rusqlite::params![text, at_str, note_id_str, lead_id_str],
        )?;
        if changed == 0 {
          let lead_exists: bool = tx
            .query_row(
              "SELECT 1 FROM leads WHERE lead_id = ?1",
              rusqlite::params![lead_id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          return Ok(if lead_exists {
            NoteMutation::NoteMissing
          } else {
            NoteMutation::LeadMissing
          });
        }

        tx.execute(
          "UPDATE leads SET updated_at = ?1 WHERE lead_id = ?2",
          rusqlite::params![at_str, lead_id_str],
        )?;

        tx.commit()?;
        Ok(NoteMutation::Applied)
      })
      .await?;

    match outcome {
      NoteMutation::Applied => self.fetch_known_lead(id).await,
      NoteMutation::LeadMissing => Err(Error::LeadNotFound(id)),
      NoteMutation::NoteMissing => Err(Error::NoteNotFound {
        lead_id: id,
        note_id,
      }),
    }
  }

  async fn delete_note(&self, id: Uuid, note_id: Uuid) -> Result<Lead> {
    let lead_id_str = encode_uuid(id);
    let note_id_str = encode_uuid(note_id);
    let at_str      = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // seq values of the surviving notes are left alone, so their
        // relative order is untouched.
        let deleted = tx.execute(
          "DELETE FROM notes WHERE note_id = ?1 AND lead_id = ?2",
          rusqlite::params![note_id_str, lead_id_str],
        )?;
        if deleted == 0 {
          let lead_exists: bool = tx
            .query_row(
              "SELECT 1 FROM leads WHERE lead_id = ?1",
              rusqlite::params![lead_id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          return Ok(if lead_exists {
            NoteMutation::NoteMissing
          } else {
            NoteMutation::LeadMissing
          });
        }

        tx.execute(
          "UPDATE leads SET updated_at = ?1 WHERE lead_id = ?2",
          rusqlite::params![at_str, lead_id_str],
        )?;

        tx.commit()?;
        Ok(NoteMutation::Applied)
      })
      .await?;

    match outcome {
      NoteMutation::Applied => self.fetch_known_lead(id).await,
      NoteMutation::LeadMissing => Err(Error::LeadNotFound(id)),
      NoteMutation::NoteMissing => Err(Error::NoteNotFound {
        lead_id: id,
        note_id,
      }),
    }
  }
}
