//! Handlers for `/leads` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `POST`  | `/leads` | Public (lead-capture form); body: [`NewLead`] |
//! | `GET`   | `/leads` | Bearer; all leads, newest first |
//! | `PATCH` | `/leads/:id/status` | Bearer; body: `{"status":"contacted"}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use funnel_core::{
  lead::{Lead, LeadStatus, NewLead},
  store::LeadStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /leads` — returns 201 + the stored [`Lead`].
///
/// Any `status` or `notes` field a client sends is ignored: [`NewLead`]
/// carries neither, so every created lead starts `new` with no notes.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewLead>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
{
  let lead = state
    .store
    .create_lead(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(lead)))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /leads` — all leads ordered by `created_at` descending.
pub async fn list<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Lead>>, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
{
  let leads = state
    .store
    .list_leads()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(leads))
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  /// Accepted as a string and parsed explicitly so an out-of-range value is
  /// a 400 validation failure; nothing unknown ever reaches the store.
  #[serde(default)]
  pub status: String,
}

/// `PATCH /leads/:id/status` — body: `{"status":"..."}`.
pub async fn update_status<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Lead>, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
{
  let status = LeadStatus::parse(&body.status).map_err(ApiError::from_store)?;
  let lead = state
    .store
    .update_status(id, status)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(lead))
}
