//! Error types for `funnel-core`.
//!
//! This enum is the error taxonomy for the whole workspace: storage backends
//! convert into it (`LeadStore::Error: Into<Error>`), and the HTTP layer maps
//! its variants onto status codes.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("lead not found: {0}")]
  LeadNotFound(Uuid),

  #[error("note not found: {note_id} on lead {lead_id}")]
  NoteNotFound { lead_id: Uuid, note_id: Uuid },

  #[error("required field is empty: {0}")]
  EmptyField(&'static str),

  #[error("unknown lead status: {0:?}")]
  UnknownStatus(String),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
