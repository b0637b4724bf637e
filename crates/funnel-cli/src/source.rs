//! Where the dashboard's lead list comes from.
//!
//! One startup decision selects the remote API or the generated sample
//! dataset; the rest of the app never branches on reachability again.

use anyhow::Result;
use funnel_core::lead::Lead;

use crate::{client::ApiClient, sample};

/// Number of sample leads generated when falling back.
const SAMPLE_SIZE: usize = 200;

pub enum LeadSource {
  /// A live server: every list call is a fresh fetch.
  Remote(ApiClient),
  /// Generated demo data; read-only.
  Sample(Vec<Lead>),
}

impl LeadSource {
  /// Log in and probe the server once, falling back to sample data when the
  /// server is unreachable or has no leads yet. Returns the source and a
  /// human-readable line for the status bar.
  pub async fn connect(mut client: ApiClient) -> (Self, String) {
    if let Err(e) = client.login().await {
      tracing::warn!("login failed, using sample data: {e}");
      return (
        Self::Sample(sample::sample_leads(SAMPLE_SIZE)),
        format!("API unreachable ({e}); showing sample data"),
      );
    }

    match client.list_leads().await {
      Ok(leads) if leads.is_empty() => (
        Self::Sample(sample::sample_leads(SAMPLE_SIZE)),
        "No leads on the server yet; showing sample data".to_string(),
      ),
      Ok(_) => (Self::Remote(client), String::new()),
      Err(e) => {
        tracing::warn!("lead fetch failed, using sample data: {e}");
        (
          Self::Sample(sample::sample_leads(SAMPLE_SIZE)),
          format!("Lead fetch failed ({e}); showing sample data"),
        )
      }
    }
  }

  /// The current lead list, newest first.
  pub async fn list(&self) -> Result<Vec<Lead>> {
    match self {
      Self::Remote(client) => client.list_leads().await,
      Self::Sample(leads) => Ok(leads.clone()),
    }
  }

  /// The API client, when mutations are possible.
  pub fn client(&self) -> Option<&ApiClient> {
    match self {
      Self::Remote(client) => Some(client),
      Self::Sample(_) => None,
    }
  }
}
