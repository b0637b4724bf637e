//! Lead and note types — the primary entities of the Funnel store.
//!
//! A lead owns an ordered list of embedded notes. Status is a four-valued
//! funnel stage with no transition graph: any stage may follow any other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Channel label assigned to leads created without an explicit source.
pub const DEFAULT_SOURCE: &str = "Website";

// ─── Status ──────────────────────────────────────────────────────────────────

/// The funnel stage a lead occupies.
///
/// Deliberately a free-choice enumeration, not a workflow: `Converted` may
/// move back to `New`. Out-of-range values are unrepresentable; unknown
/// strings fail at the serde or decode boundary.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
  #[default]
  New,
  Contacted,
  Converted,
  Lost,
}

impl LeadStatus {
  /// All stages, in funnel order. Used by the stats module and the CLI
  /// status-filter cycle.
  pub const ALL: [LeadStatus; 4] = [
    LeadStatus::New,
    LeadStatus::Contacted,
    LeadStatus::Converted,
    LeadStatus::Lost,
  ];

  /// The lowercase string persisted in the `status` column.
  /// Must match the `rename_all = "lowercase"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::New => "new",
      Self::Contacted => "contacted",
      Self::Converted => "converted",
      Self::Lost => "lost",
    }
  }

  /// Inverse of [`as_str`](Self::as_str); rejects anything else.
  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "new" => Ok(Self::New),
      "contacted" => Ok(Self::Contacted),
      "converted" => Ok(Self::Converted),
      "lost" => Ok(Self::Lost),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }
}

impl std::fmt::Display for LeadStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Note ────────────────────────────────────────────────────────────────────

/// A timestamped free-text annotation owned by exactly one lead.
///
/// Notes are embedded: they are never addressable outside their lead, and
/// deleting a lead deletes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  pub note_id:    Uuid,
  pub text:       String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

// ─── Lead ────────────────────────────────────────────────────────────────────

/// A prospective client contact tracked through the funnel.
///
/// `message` is captured at creation and never mutated afterwards — no
/// operation touches it. `notes` is append-stable: new notes land at the
/// end, and edits/deletes never reorder the remainder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
  pub lead_id:    Uuid,
  pub name:       String,
  pub email:      String,
  pub phone:      Option<String>,
  pub source:     String,
  pub message:    Option<String>,
  pub status:     LeadStatus,
  pub notes:      Vec<Note>,
  /// Store-assigned; never changes after creation.
  pub created_at: DateTime<Utc>,
  /// Bumps on any mutation. Always `>= created_at`.
  pub updated_at: DateTime<Utc>,
}

// ─── NewLead ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::LeadStore::create_lead`].
///
/// Carries neither `status` nor `notes`: a created lead is always `New` with
/// an empty note list, regardless of what a caller sent over the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewLead {
  /// Defaulted rather than required at the serde layer so an absent field
  /// reports as a validation failure, not a deserialisation one.
  #[serde(default)]
  pub name:    String,
  #[serde(default)]
  pub email:   String,
  #[serde(default)]
  pub phone:   Option<String>,
  #[serde(default)]
  pub source:  Option<String>,
  #[serde(default)]
  pub message: Option<String>,
}

impl NewLead {
  pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      email: email.into(),
      ..Self::default()
    }
  }

  /// Reject missing required fields before anything is persisted.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::EmptyField("name"));
    }
    if self.email.trim().is_empty() {
      return Err(Error::EmptyField("email"));
    }
    Ok(())
  }

  /// The source label to persist: the caller's, or [`DEFAULT_SOURCE`].
  pub fn source_or_default(&self) -> &str {
    match self.source.as_deref() {
      Some(s) if !s.trim().is_empty() => s,
      _ => DEFAULT_SOURCE,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_roundtrips_through_strings() {
    for status in LeadStatus::ALL {
      assert_eq!(LeadStatus::parse(status.as_str()).unwrap(), status);
    }
  }

  #[test]
  fn status_rejects_unknown_values() {
    let err = LeadStatus::parse("qualified").unwrap_err();
    assert!(matches!(err, Error::UnknownStatus(s) if s == "qualified"));
  }

  #[test]
  fn status_serde_is_lowercase() {
    let json = serde_json::to_string(&LeadStatus::Contacted).unwrap();
    assert_eq!(json, "\"contacted\"");
    assert!(serde_json::from_str::<LeadStatus>("\"pending\"").is_err());
  }

  #[test]
  fn validate_requires_name_and_email() {
    assert!(NewLead::new("Ann Lee", "ann@x.com").validate().is_ok());

    let err = NewLead::new("", "no-name@x.com").validate().unwrap_err();
    assert!(matches!(err, Error::EmptyField("name")));

    let err = NewLead::new("Ann Lee", "   ").validate().unwrap_err();
    assert!(matches!(err, Error::EmptyField("email")));
  }

  #[test]
  fn source_defaults_to_website() {
    assert_eq!(NewLead::new("A", "a@x.com").source_or_default(), "Website");

    let lead = NewLead {
      source: Some("Referral".into()),
      ..NewLead::new("A", "a@x.com")
    };
    assert_eq!(lead.source_or_default(), "Referral");

    let blank = NewLead {
      source: Some("  ".into()),
      ..NewLead::new("A", "a@x.com")
    };
    assert_eq!(blank.source_or_default(), "Website");
  }
}
