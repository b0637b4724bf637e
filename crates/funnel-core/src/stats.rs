//! Derived dashboard views — computed, never stored.
//!
//! Pure projections over a slice of leads: per-status counts, per-source
//! counts, the trailing 7-day creation timeline, and the conversion rate.
//! Safe to recompute unconditionally on every change; the dashboard does.

use chrono::{Duration, NaiveDate};

use crate::lead::{Lead, LeadStatus};

// ─── Status counts ───────────────────────────────────────────────────────────

/// How many leads sit in each funnel stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
  pub new:       usize,
  pub contacted: usize,
  pub converted: usize,
  pub lost:      usize,
}

impl StatusCounts {
  pub fn total(&self) -> usize {
    self.new + self.contacted + self.converted + self.lost
  }

  pub fn get(&self, status: LeadStatus) -> usize {
    match status {
      LeadStatus::New => self.new,
      LeadStatus::Contacted => self.contacted,
      LeadStatus::Converted => self.converted,
      LeadStatus::Lost => self.lost,
    }
  }
}

pub fn status_counts(leads: &[Lead]) -> StatusCounts {
  let mut counts = StatusCounts::default();
  for lead in leads {
    match lead.status {
      LeadStatus::New => counts.new += 1,
      LeadStatus::Contacted => counts.contacted += 1,
      LeadStatus::Converted => counts.converted += 1,
      LeadStatus::Lost => counts.lost += 1,
    }
  }
  counts
}

// ─── Conversion rate ─────────────────────────────────────────────────────────

/// Converted leads as a rounded percentage of all leads; `0` for an empty
/// slice (no division-by-zero path).
pub fn conversion_rate(leads: &[Lead]) -> u32 {
  if leads.is_empty() {
    return 0;
  }
  let converted = leads
    .iter()
    .filter(|l| l.status == LeadStatus::Converted)
    .count();
  ((converted as f64 / leads.len() as f64) * 100.0).round() as u32
}

// ─── Source counts ───────────────────────────────────────────────────────────

/// Leads per channel label, most common first. Labels with equal counts keep
/// their first-seen relative order.
pub fn source_counts(leads: &[Lead]) -> Vec<(String, usize)> {
  let mut counts: Vec<(String, usize)> = Vec::new();
  for lead in leads {
    match counts.iter_mut().find(|(s, _)| *s == lead.source) {
      Some((_, n)) => *n += 1,
      None => counts.push((lead.source.clone(), 1)),
    }
  }
  counts.sort_by(|a, b| b.1.cmp(&a.1));
  counts
}

// ─── Creation timeline ───────────────────────────────────────────────────────

/// One day of the trailing creation timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBucket {
  pub date:      NaiveDate,
  pub new:       usize,
  pub contacted: usize,
  pub converted: usize,
  pub total:     usize,
}

/// Leads created on each of the 7 days ending at `today`, oldest first.
///
/// `today` is a parameter rather than read from the clock so the projection
/// stays pure.
pub fn creation_timeline(leads: &[Lead], today: NaiveDate) -> Vec<DayBucket> {
  (0..7)
    .rev()
    .map(|back| {
      let date = today - Duration::days(back);
      let mut bucket = DayBucket {
        date,
        new: 0,
        contacted: 0,
        converted: 0,
        total: 0,
      };
      for lead in leads {
        if lead.created_at.date_naive() != date {
          continue;
        }
        bucket.total += 1;
        match lead.status {
          LeadStatus::New => bucket.new += 1,
          LeadStatus::Contacted => bucket.contacted += 1,
          LeadStatus::Converted => bucket.converted += 1,
          LeadStatus::Lost => {}
        }
      }
      bucket
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use uuid::Uuid;

  use super::*;

  fn lead(status: LeadStatus, source: &str, day: u32) -> Lead {
    let at = Utc.with_ymd_and_hms(2026, 8, day, 12, 0, 0).unwrap();
    Lead {
      lead_id: Uuid::new_v4(),
      name: "Test Lead".into(),
      email: "lead@example.com".into(),
      phone: None,
      source: source.into(),
      message: None,
      status,
      notes: Vec::new(),
      created_at: at,
      updated_at: at,
    }
  }

  #[test]
  fn conversion_rate_of_empty_slice_is_zero() {
    assert_eq!(conversion_rate(&[]), 0);
  }

  #[test]
  fn conversion_rate_rounds() {
    // 1 of 3 converted: 33.33…% rounds to 33.
    let leads = vec![
      lead(LeadStatus::Converted, "Website", 1),
      lead(LeadStatus::New, "Website", 1),
      lead(LeadStatus::Lost, "Website", 1),
    ];
    assert_eq!(conversion_rate(&leads), 33);

    // 2 of 3: 66.66…% rounds to 67.
    let leads = vec![
      lead(LeadStatus::Converted, "Website", 1),
      lead(LeadStatus::Converted, "Website", 1),
      lead(LeadStatus::New, "Website", 1),
    ];
    assert_eq!(conversion_rate(&leads), 67);
  }

  #[test]
  fn status_counts_cover_all_stages() {
    let leads = vec![
      lead(LeadStatus::New, "Website", 1),
      lead(LeadStatus::New, "Website", 1),
      lead(LeadStatus::Contacted, "Referral", 1),
      lead(LeadStatus::Converted, "Website", 1),
      lead(LeadStatus::Lost, "LinkedIn", 1),
    ];
    let counts = status_counts(&leads);
    assert_eq!(counts.new, 2);
    assert_eq!(counts.contacted, 1);
    assert_eq!(counts.converted, 1);
    assert_eq!(counts.lost, 1);
    assert_eq!(counts.total(), 5);
  }

  #[test]
  fn source_counts_sorted_descending() {
    let leads = vec![
      lead(LeadStatus::New, "Referral", 1),
      lead(LeadStatus::New, "Website", 1),
      lead(LeadStatus::New, "Referral", 1),
      lead(LeadStatus::New, "Referral", 1),
      lead(LeadStatus::New, "Website", 1),
      lead(LeadStatus::New, "Cold Call", 1),
    ];
    let counts = source_counts(&leads);
    assert_eq!(counts[0], ("Referral".to_string(), 3));
    assert_eq!(counts[1], ("Website".to_string(), 2));
    assert_eq!(counts[2], ("Cold Call".to_string(), 1));
  }

  #[test]
  fn timeline_buckets_trailing_week() {
    // Window is Aug 2..=Aug 8 inclusive, oldest first.
    let today = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
    let leads = vec![
      lead(LeadStatus::New, "Website", 8),       // today
      lead(LeadStatus::Converted, "Website", 8), // today
      lead(LeadStatus::Contacted, "Website", 5),
      lead(LeadStatus::Lost, "Website", 5),
      lead(LeadStatus::New, "Website", 1),       // before the window
    ];

    let timeline = creation_timeline(&leads, today);
    assert_eq!(timeline.len(), 7);
    assert_eq!(timeline[0].date, NaiveDate::from_ymd_opt(2026, 8, 2).unwrap());
    assert_eq!(timeline[6].date, today);

    // The Aug 1 lead falls outside the window entirely.
    assert_eq!(timeline.iter().map(|b| b.total).sum::<usize>(), 4);

    let day5 = &timeline[3];
    assert_eq!(day5.total, 2);
    assert_eq!(day5.contacted, 1);
    // lost leads count toward total but have no series of their own
    assert_eq!(day5.new + day5.contacted + day5.converted, 1);

    let today_bucket = &timeline[6];
    assert_eq!(today_bucket.total, 2);
    assert_eq!(today_bucket.new, 1);
    assert_eq!(today_bucket.converted, 1);
  }
}
