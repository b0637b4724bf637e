//! JSON REST API for Funnel.
//!
//! Exposes an axum [`Router`] backed by any [`funnel_core::store::LeadStore`].
//! Route policy: lead creation and login are public (the lead-capture form),
//! every other route requires a bearer token issued by `/auth/login`.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", funnel_api::api_router(state))
//! ```

pub mod auth;
pub mod error;
pub mod leads;
pub mod notes;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, patch, post},
};
use funnel_core::store::LeadStore;
use serde::Deserialize;

use auth::AuthConfig;
pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub admin_email:         String,
  pub admin_password_hash: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: LeadStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: LeadStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Auth
    .route("/auth/login", post(auth::login::<S>))
    // Leads
    .route("/leads", get(leads::list::<S>).post(leads::create::<S>))
    .route("/leads/{id}/status", patch(leads::update_status::<S>))
    // Notes
    .route("/leads/{id}/notes", post(notes::create::<S>))
    .route(
      "/leads/{id}/notes/{note_id}",
      patch(notes::update::<S>).delete(notes::remove::<S>),
    )
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::Utc;
  use funnel_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  const ADMIN_EMAIL: &str = "admin@funnel.test";

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState {
      store: Arc::new(store),
      auth:  Arc::new(AuthConfig::new(ADMIN_EMAIL.to_string(), hash)),
    }
  }

  fn bearer(state: &AppState<SqliteStore>) -> String {
    format!("Bearer {}", state.auth.signer.issue(ADMIN_EMAIL, Utc::now()))
  }

  async fn request(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = api_router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn create_lead(state: &AppState<SqliteStore>, name: &str, email: &str) -> Value {
    let (status, body) = request(
      state.clone(),
      "POST",
      "/leads",
      None,
      Some(json!({ "name": name, "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
  }

  // ── Login ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn login_issues_a_usable_token() {
    let state = make_state("secret").await;
    let (status, body) = request(
      state.clone(),
      "POST",
      "/auth/login",
      None,
      Some(json!({ "email": ADMIN_EMAIL, "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap().to_string();
    let (status, _) = request(
      state,
      "GET",
      "/leads",
      Some(&format!("Bearer {token}")),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
  }

  #[tokio::test]
  async fn login_with_wrong_password_is_401() {
    let state = make_state("secret").await;
    let (status, _) = request(
      state,
      "POST",
      "/auth/login",
      None,
      Some(json!({ "email": ADMIN_EMAIL, "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn login_with_unknown_email_is_401() {
    let state = make_state("secret").await;
    let (status, _) = request(
      state,
      "POST",
      "/auth/login",
      None,
      Some(json!({ "email": "intruder@funnel.test", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  // ── Create lead ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_lead_is_public_and_starts_new() {
    let state = make_state("secret").await;
    let (status, body) = request(
      state,
      "POST",
      "/leads",
      None,
      Some(json!({ "name": "Ann Lee", "email": "ann@x.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "new");
    assert_eq!(body["notes"], json!([]));
    assert_eq!(body["source"], "Website");
  }

  #[tokio::test]
  async fn create_lead_ignores_submitted_status_and_notes() {
    let state = make_state("secret").await;
    let (status, body) = request(
      state,
      "POST",
      "/leads",
      None,
      Some(json!({
        "name": "Ann Lee",
        "email": "ann@x.com",
        "status": "converted",
        "notes": [{ "text": "smuggled" }],
      })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "new");
    assert_eq!(body["notes"], json!([]));
  }

  #[tokio::test]
  async fn create_lead_missing_name_is_400() {
    let state = make_state("secret").await;
    let (status, body) = request(
      state.clone(),
      "POST",
      "/leads",
      None,
      Some(json!({ "email": "no-name@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));

    // Nothing was persisted.
    let auth = bearer(&state);
    let (_, listed) = request(state, "GET", "/leads", Some(&auth), None).await;
    assert_eq!(listed, json!([]));
  }

  // ── Auth gate ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn listing_without_token_is_401() {
    let state = make_state("secret").await;
    let mut builder = Request::builder().method("GET").uri("/leads");
    builder = builder.header(header::CONTENT_TYPE, "application/json");
    let resp = api_router(state)
      .oneshot(builder.body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn mutating_routes_reject_garbage_tokens() {
    let state = make_state("secret").await;
    let lead = create_lead(&state, "Ann Lee", "ann@x.com").await;
    let id = lead["lead_id"].as_str().unwrap().to_string();

    let (status, _) = request(
      state,
      "PATCH",
      &format!("/leads/{id}/status"),
      Some("Bearer forged-token"),
      Some(json!({ "status": "contacted" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  // ── Listing ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_returns_newest_first() {
    let state = make_state("secret").await;
    create_lead(&state, "First", "a@x.com").await;
    create_lead(&state, "Second", "b@x.com").await;
    create_lead(&state, "Third", "c@x.com").await;

    let auth = bearer(&state);
    let (status, body) = request(state, "GET", "/leads", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<_> = body
      .as_array()
      .unwrap()
      .iter()
      .map(|l| l["name"].as_str().unwrap())
      .collect();
    assert_eq!(names, ["Third", "Second", "First"]);
  }

  // ── Status ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_status_roundtrip() {
    let state = make_state("secret").await;
    let lead = create_lead(&state, "Ann Lee", "ann@x.com").await;
    let id = lead["lead_id"].as_str().unwrap().to_string();
    let auth = bearer(&state);

    let (status, body) = request(
      state,
      "PATCH",
      &format!("/leads/{id}/status"),
      Some(&auth),
      Some(json!({ "status": "contacted" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "contacted");
  }

  #[tokio::test]
  async fn update_status_unknown_value_is_400() {
    let state = make_state("secret").await;
    let lead = create_lead(&state, "Ann Lee", "ann@x.com").await;
    let id = lead["lead_id"].as_str().unwrap().to_string();
    let auth = bearer(&state);

    let (status, body) = request(
      state.clone(),
      "PATCH",
      &format!("/leads/{id}/status"),
      Some(&auth),
      Some(json!({ "status": "qualified" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("qualified"));

    // The stored status is untouched.
    let (_, listed) = request(state, "GET", "/leads", Some(&auth), None).await;
    assert_eq!(listed[0]["status"], "new");
  }

  #[tokio::test]
  async fn update_status_missing_lead_is_404() {
    let state = make_state("secret").await;
    let auth = bearer(&state);
    let (status, _) = request(
      state,
      "PATCH",
      &format!("/leads/{}/status", uuid::Uuid::new_v4()),
      Some(&auth),
      Some(json!({ "status": "lost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Notes ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn note_add_edit_delete_roundtrip() {
    let state = make_state("secret").await;
    let lead = create_lead(&state, "Ann Lee", "ann@x.com").await;
    let id = lead["lead_id"].as_str().unwrap().to_string();
    let auth = bearer(&state);

    let (status, body) = request(
      state.clone(),
      "POST",
      &format!("/leads/{id}/notes"),
      Some(&auth),
      Some(json!({ "text": "Called, left voicemail" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["notes"].as_array().unwrap().len(), 1);
    assert_eq!(body["notes"][0]["text"], "Called, left voicemail");

    let note_id = body["notes"][0]["note_id"].as_str().unwrap().to_string();

    let (status, body) = request(
      state.clone(),
      "PATCH",
      &format!("/leads/{id}/notes/{note_id}"),
      Some(&auth),
      Some(json!({ "text": "Spoke on the phone" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notes"][0]["text"], "Spoke on the phone");

    let (status, body) = request(
      state,
      "DELETE",
      &format!("/leads/{id}/notes/{note_id}"),
      Some(&auth),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notes"], json!([]));
  }

  #[tokio::test]
  async fn add_note_empty_text_is_400() {
    let state = make_state("secret").await;
    let lead = create_lead(&state, "Ann Lee", "ann@x.com").await;
    let id = lead["lead_id"].as_str().unwrap().to_string();
    let auth = bearer(&state);

    let (status, _) = request(
      state,
      "POST",
      &format!("/leads/{id}/notes"),
      Some(&auth),
      Some(json!({ "text": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn delete_nonexistent_note_is_404() {
    let state = make_state("secret").await;
    let lead = create_lead(&state, "Ann Lee", "ann@x.com").await;
    let id = lead["lead_id"].as_str().unwrap().to_string();
    let auth = bearer(&state);

    let (status, _) = request(
      state,
      "DELETE",
      &format!("/leads/{id}/notes/{}", uuid::Uuid::new_v4()),
      Some(&auth),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Full scenario ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn ann_lee_scenario() {
    let state = make_state("secret").await;
    let auth = bearer(&state);

    let lead = create_lead(&state, "Ann Lee", "ann@x.com").await;
    assert_eq!(lead["status"], "new");
    assert_eq!(lead["notes"], json!([]));
    let id = lead["lead_id"].as_str().unwrap().to_string();

    let (status, body) = request(
      state.clone(),
      "POST",
      &format!("/leads/{id}/notes"),
      Some(&auth),
      Some(json!({ "text": "Called, left voicemail" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["notes"].as_array().unwrap().len(), 1);
    let note_id = body["notes"][0]["note_id"].as_str().unwrap().to_string();

    let (status, body) = request(
      state.clone(),
      "PATCH",
      &format!("/leads/{id}/status"),
      Some(&auth),
      Some(json!({ "status": "contacted" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "contacted");

    let (status, body) = request(
      state,
      "DELETE",
      &format!("/leads/{id}/notes/{note_id}"),
      Some(&auth),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notes"].as_array().unwrap().len(), 0);
  }
}
