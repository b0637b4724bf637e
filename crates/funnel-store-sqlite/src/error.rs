//! Error type for `funnel-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] funnel_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("lead not found: {0}")]
  LeadNotFound(Uuid),

  #[error("note not found: {note_id} on lead {lead_id}")]
  NoteNotFound { lead_id: Uuid, note_id: Uuid },
}

/// Classification into the core taxonomy, required by
/// [`funnel_core::store::LeadStore`] so the HTTP layer can tell not-found
/// and validation failures apart from storage faults.
impl From<Error> for funnel_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      Error::LeadNotFound(id) => funnel_core::Error::LeadNotFound(id),
      Error::NoteNotFound { lead_id, note_id } => {
        funnel_core::Error::NoteNotFound { lead_id, note_id }
      }
      other @ (Error::Database(_) | Error::Uuid(_) | Error::DateParse(_)) => {
        funnel_core::Error::Storage(Box::new(other))
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
