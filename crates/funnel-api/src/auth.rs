//! Bearer-token auth: login handler, token issuance, and request extractor.
//!
//! The login endpoint verifies the configured admin credentials (argon2 PHC
//! hash) and issues an opaque signed token: `base64url(subject|expiry|mac)`
//! where the mac is a SHA-256 over a per-process random key. Restarting the
//! server therefore invalidates outstanding tokens.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, request::Parts},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{DateTime, Duration, Utc};
use rand_core::{OsRng, RngCore as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::{AppState, error::ApiError};
use funnel_core::store::LeadStore;

/// Tokens are accepted for 24 hours after issue.
const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

// ─── Token signer ─────────────────────────────────────────────────────────────

/// Issues and checks bearer tokens against a random per-process key.
pub struct TokenSigner {
  key: [u8; 32],
}

impl TokenSigner {
  /// Fresh signer with a random key.
  pub fn generate() -> Self {
    let mut key = [0u8; 32];
    OsRng.fill_bytes(&mut key);
    Self { key }
  }

  fn mac(&self, payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(self.key);
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
  }

  /// Issue a token for `subject`, expiring [`TOKEN_TTL_SECS`] after `now`.
  pub fn issue(&self, subject: &str, now: DateTime<Utc>) -> String {
    let expiry = (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp();
    let payload = format!("{subject}|{expiry}");
    let mac = self.mac(&payload);
    B64.encode(format!("{payload}|{mac}"))
  }

  /// Check a token against `now`; returns the subject when the mac matches
  /// and the token has not expired.
  pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
    let decoded = B64.decode(token).ok()?;
    let raw = std::str::from_utf8(&decoded).ok()?;

    let (payload, mac) = raw.rsplit_once('|')?;
    if self.mac(payload) != mac {
      return None;
    }

    let (subject, expiry) = payload.rsplit_once('|')?;
    let expiry: i64 = expiry.parse().ok()?;
    if now.timestamp() > expiry {
      return None;
    }

    Some(subject.to_owned())
  }
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Credentials accepted as valid for this server instance, plus the signer
/// shared by the login handler and the extractor.
pub struct AuthConfig {
  pub admin_email:   String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub signer:        TokenSigner,
}

impl AuthConfig {
  pub fn new(admin_email: String, password_hash: String) -> Self {
    Self {
      admin_email,
      password_hash,
      signer: TokenSigner::generate(),
    }
  }
}

// ─── Verification ────────────────────────────────────────────────────────────

/// Verify a bearer token directly from headers.
pub fn verify_bearer(headers: &HeaderMap, config: &AuthConfig) -> Result<(), ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let token = header_val
    .strip_prefix("Bearer ")
    .ok_or(ApiError::Unauthorized)?;

  config
    .signer
    .verify(token, Utc::now())
    .map(|_| ())
    .ok_or(ApiError::Unauthorized)
}

/// Zero-size marker: present in the handler means the request carried a
/// valid bearer token.
pub struct Authenticated;

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: LeadStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_bearer(&parts.headers, &state.auth)?;
    Ok(Authenticated)
  }
}

// ─── Login handler ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
  pub token: String,
}

/// `POST /auth/login` — body: `{"email":"...","password":"..."}`.
///
/// Fails closed with 401 on any mismatch; the response does not distinguish
/// an unknown email from a wrong password.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<TokenResponse>, ApiError>
where
  S: LeadStore + Clone + Send + Sync + 'static,
{
  if body.email != state.auth.admin_email {
    return Err(ApiError::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&state.auth.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(body.password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  let token = state.auth.signer.issue(&body.email, Utc::now());
  Ok(Json(TokenResponse { token }))
}
