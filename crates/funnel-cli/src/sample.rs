//! Generated fallback dataset, shown when the API is unreachable or empty.
//!
//! The shape mirrors a busy quarter of demo traffic: names drawn from two
//! fixed pools, ten channel labels, a heavily-converted status split, and
//! creation times scattered over the trailing 90 days.

use chrono::{Duration, Utc};
use funnel_core::lead::{Lead, LeadStatus};
use rand::Rng as _;
use uuid::Uuid;

const FIRST_NAMES: [&str; 50] = [
  "John", "Sarah", "Michael", "Emma", "David", "Lisa", "James", "Maria",
  "Robert", "Jennifer", "William", "Linda", "Richard", "Patricia", "Joseph",
  "Nancy", "Thomas", "Karen", "Charles", "Betty", "Daniel", "Helen",
  "Matthew", "Sandra", "Anthony", "Ashley", "Mark", "Donna", "Donald",
  "Carol", "Steven", "Michelle", "Paul", "Emily", "Andrew", "Amanda",
  "Joshua", "Melissa", "Kenneth", "Deborah", "Kevin", "Stephanie", "Brian",
  "Rebecca", "George", "Laura", "Edward", "Sharon", "Ronald", "Cynthia",
];

const LAST_NAMES: [&str; 47] = [
  "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller",
  "Davis", "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez",
  "Wilson", "Anderson", "Thomas", "Taylor", "Moore", "Jackson", "Martin",
  "Lee", "Thompson", "White", "Harris", "Clark", "Lewis", "Robinson",
  "Walker", "Young", "Allen", "King", "Wright", "Scott", "Torres", "Nguyen",
  "Hill", "Flores", "Green", "Adams", "Nelson", "Baker", "Hall", "Rivera",
  "Campbell", "Mitchell", "Carter", "Roberts",
];

pub const SOURCES: [&str; 10] = [
  "Website", "Referral", "LinkedIn", "Cold Call", "Email Campaign",
  "Facebook", "Instagram", "Twitter", "Google Ads", "Trade Show",
];

/// Generate `count` plausible leads, newest first.
pub fn sample_leads(count: usize) -> Vec<Lead> {
  let mut rng = rand::rng();
  let now = Utc::now();

  let mut leads: Vec<Lead> = (0..count)
    .map(|i| {
      let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
      let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];

      let status = match rng.random::<f64>() {
        r if r < 0.92 => LeadStatus::Converted,
        r if r < 0.97 => LeadStatus::Contacted,
        r if r < 0.99 => LeadStatus::New,
        _ => LeadStatus::Lost,
      };

      let created_at =
        now - Duration::seconds(rng.random_range(0..90 * 24 * 60 * 60));

      Lead {
        lead_id: Uuid::new_v4(),
        name: format!("{first} {last}"),
        email: format!(
          "{}.{}{i}@example.com",
          first.to_lowercase(),
          last.to_lowercase()
        ),
        phone: Some(format!(
          "+1 {}-{}-{}",
          rng.random_range(100..1000),
          rng.random_range(100..1000),
          rng.random_range(1000..10000)
        )),
        source: SOURCES[rng.random_range(0..SOURCES.len())].to_owned(),
        message: None,
        status,
        notes: Vec::new(),
        created_at,
        updated_at: created_at,
      }
    })
    .collect();

  leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  leads
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generates_requested_count_newest_first() {
    let leads = sample_leads(200);
    assert_eq!(leads.len(), 200);
    for pair in leads.windows(2) {
      assert!(pair[0].created_at >= pair[1].created_at);
    }
  }

  #[test]
  fn generated_leads_are_well_formed() {
    for lead in sample_leads(50) {
      assert!(!lead.name.is_empty());
      assert!(lead.email.contains('@'));
      assert!(SOURCES.contains(&lead.source.as_str()));
      assert!(lead.notes.is_empty());
      assert_eq!(lead.updated_at, lead.created_at);
    }
  }
}
