//! The `LeadStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `funnel-store-sqlite`).
//! Higher layers (`funnel-api`, `funnel-cli`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::lead::{Lead, LeadStatus, NewLead};

/// Abstraction over a Funnel lead store backend.
///
/// Every mutation is atomic at the store level: concurrent operations on the
/// same lead may interleave, but none is ever lost, and each one bumps the
/// lead's `updated_at`. Mutating operations return the full lead as it stands
/// after the change.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait LeadStore: Send + Sync {
  /// Backend error; must classify into the core taxonomy so the HTTP layer
  /// can map not-found and validation failures to distinct status codes.
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Validate and persist a new lead.
  ///
  /// The stored lead always starts with `status = New`, no notes, and
  /// `source` defaulted when absent. Fails with `EmptyField` (and persists
  /// nothing) when `name` or `email` is blank.
  fn create_lead(
    &self,
    input: NewLead,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  /// All leads ordered by `created_at` descending (newest first), each with
  /// its notes in insertion order.
  fn list_leads(
    &self,
  ) -> impl Future<Output = Result<Vec<Lead>, Self::Error>> + Send + '_;

  /// Retrieve a single lead. Returns `None` if not found.
  fn get_lead(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Lead>, Self::Error>> + Send + '_;

  /// Replace the lead's status. Idempotent: re-applying the current status
  /// succeeds (`updated_at` still advances). Fails with `LeadNotFound` if
  /// `id` does not resolve.
  fn update_status(
    &self,
    id: Uuid,
    status: LeadStatus,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  /// Append a note at the end of the lead's note list.
  /// Fails with `LeadNotFound` / `EmptyField`.
  fn add_note(
    &self,
    id: Uuid,
    text: String,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  /// Replace the text of one note, refreshing its `updated_at`; the note
  /// list order is unchanged. Fails with `LeadNotFound` / `NoteNotFound` /
  /// `EmptyField`.
  fn update_note(
    &self,
    id: Uuid,
    note_id: Uuid,
    text: String,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  /// Remove one note, preserving the relative order of the remainder.
  /// Deleting an absent note fails with `NoteNotFound` and mutates nothing.
  fn delete_note(
    &self,
    id: Uuid,
    note_id: Uuid,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;
}
