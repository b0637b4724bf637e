//! Handlers for `/leads/:id/notes` endpoints. All bearer-gated.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/leads/:id/notes` | Body: `{"text":"..."}`; 201 + updated lead |
//! | `PATCH`  | `/leads/:id/notes/:note_id` | Body: `{"text":"..."}` |
//! | `DELETE` | `/leads/:id/notes/:note_id` | Returns the updated lead |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use funnel_core::{lead::Lead, store::LeadStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct NoteBody {
  /// Defaulted so an absent field reports as a 400 validation failure.
  #[serde(default)]
  pub text: String,
}

/// `POST /leads/:id/notes` — appends at the end of the lead's note list.
pub async fn create<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NoteBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
{
  let lead = state
    .store
    .add_note(id, body.text)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(lead)))
}

/// `PATCH /leads/:id/notes/:note_id` — replaces the note's text.
pub async fn update<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Path((id, note_id)): Path<(Uuid, Uuid)>,
  Json(body): Json<NoteBody>,
) -> Result<Json<Lead>, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
{
  let lead = state
    .store
    .update_note(id, note_id, body.text)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(lead))
}

/// `DELETE /leads/:id/notes/:note_id` — removes exactly one note.
pub async fn remove<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Path((id, note_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Lead>, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
{
  let lead = state
    .store
    .delete_note(id, note_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(lead))
}
