//! Async HTTP client wrapping the funnel JSON API.

use anyhow::{Context, Result, anyhow};
use funnel_core::lead::{Lead, LeadStatus, NewLead};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

/// Connection settings for the funnel API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
  token: String,
}

/// Async HTTP client for the funnel JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. Call
/// [`login`](Self::login) once before any of the protected operations.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
  token:  Option<String>,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      config,
      token: None,
    })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  // ── Auth ──────────────────────────────────────────────────────────────────

  /// `POST /api/auth/login` — stores the issued bearer token on success.
  pub async fn login(&mut self) -> Result<()> {
    let resp = self
      .client
      .post(self.url("/auth/login"))
      .json(&serde_json::json!({
        "email": self.config.email,
        "password": self.config.password,
      }))
      .send()
      .await
      .context("POST /auth/login failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST /auth/login → {}", resp.status()));
    }
    let body: TokenResponse = resp.json().await.context("deserialising token")?;
    self.token = Some(body.token);
    Ok(())
  }

  // ── Leads ─────────────────────────────────────────────────────────────────

  /// `GET /api/leads`
  pub async fn list_leads(&self) -> Result<Vec<Lead>> {
    let resp = self
      .auth(self.client.get(self.url("/leads")))
      .send()
      .await
      .context("GET /leads failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /leads → {}", resp.status()));
    }
    resp.json().await.context("deserialising leads")
  }

  /// `POST /api/leads` — the public lead-capture endpoint.
  pub async fn create_lead(&self, input: &NewLead) -> Result<Lead> {
    let resp = self
      .client
      .post(self.url("/leads"))
      .json(input)
      .send()
      .await
      .context("POST /leads failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST /leads → {}", resp.status()));
    }
    resp.json().await.context("deserialising created lead")
  }

  /// `PATCH /api/leads/:id/status`
  pub async fn update_status(&self, id: Uuid, status: LeadStatus) -> Result<Lead> {
    let resp = self
      .auth(self.client.patch(self.url(&format!("/leads/{id}/status"))))
      .json(&serde_json::json!({ "status": status }))
      .send()
      .await
      .context("PATCH /leads/:id/status failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("PATCH status → {}", resp.status()));
    }
    resp.json().await.context("deserialising updated lead")
  }

  // ── Notes ─────────────────────────────────────────────────────────────────

  /// `POST /api/leads/:id/notes`
  pub async fn add_note(&self, id: Uuid, text: &str) -> Result<Lead> {
    let resp = self
      .auth(self.client.post(self.url(&format!("/leads/{id}/notes"))))
      .json(&serde_json::json!({ "text": text }))
      .send()
      .await
      .context("POST note failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST note → {}", resp.status()));
    }
    resp.json().await.context("deserialising updated lead")
  }

  /// `PATCH /api/leads/:id/notes/:note_id`
  pub async fn update_note(&self, id: Uuid, note_id: Uuid, text: &str) -> Result<Lead> {
    let resp = self
      .auth(
        self
          .client
          .patch(self.url(&format!("/leads/{id}/notes/{note_id}"))),
      )
      .json(&serde_json::json!({ "text": text }))
      .send()
      .await
      .context("PATCH note failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("PATCH note → {}", resp.status()));
    }
    resp.json().await.context("deserialising updated lead")
  }

  /// `DELETE /api/leads/:id/notes/:note_id`
  pub async fn delete_note(&self, id: Uuid, note_id: Uuid) -> Result<Lead> {
    let resp = self
      .auth(
        self
          .client
          .delete(self.url(&format!("/leads/{id}/notes/{note_id}"))),
      )
      .send()
      .await
      .context("DELETE note failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("DELETE note → {}", resp.status()));
    }
    resp.json().await.context("deserialising updated lead")
  }
}
