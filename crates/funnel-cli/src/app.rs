//! Application state machine and event dispatcher.
//!
//! The view-model holds the full lead list plus search/filter state; the
//! visible list is a pure projection recomputed every frame. Mutations
//! round-trip through the API and then refetch the whole list — the app
//! re-derives from the server instead of patching locally. The one
//! exception is add-lead, which optimistically prepends the created record
//! before the refetch lands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use funnel_core::lead::{Lead, LeadStatus, NewLead};
use uuid::Uuid;

use crate::source::LeadSource;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the lead list; right pane shows a hint.
  LeadList,
  /// Focus on the lead detail pane (status + notes).
  LeadDetail,
}

// ─── Input mode ───────────────────────────────────────────────────────────────

/// What the keyboard is currently typing into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
  None,
  /// Editing the search string in place.
  Search,
  /// Add-lead form, first field.
  NewLeadName,
  /// Add-lead form, second field; carries the captured name.
  NewLeadEmail { name: String },
  NewNote,
  EditNote { note_id: Uuid },
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// All leads from the active source, newest first.
  pub leads: Vec<Lead>,

  /// Case-insensitive substring matched against name, email, and phone.
  pub search: String,

  /// When set, only leads in this stage are shown.
  pub status_filter: Option<LeadStatus>,

  /// Active text-entry target.
  pub input_mode: InputMode,

  /// Buffer for add-lead / note entry (search edits `search` directly).
  pub input: String,

  /// Cursor position within the *filtered* lead list.
  pub list_cursor: usize,

  /// Cursor position within the selected lead's notes.
  pub note_cursor: usize,

  /// UUID of the currently-selected lead (detail pane).
  pub selected_lead_id: Option<Uuid>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Remote API or generated sample data; decided once at startup.
  pub source: LeadSource,
}

impl App {
  /// Create an [`App`] with an empty lead list.
  pub fn new(source: LeadSource) -> Self {
    Self {
      screen: Screen::LeadList,
      leads: Vec::new(),
      search: String::new(),
      status_filter: None,
      input_mode: InputMode::None,
      input: String::new(),
      list_cursor: 0,
      note_cursor: 0,
      selected_lead_id: None,
      status_msg: String::new(),
      source,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Replace the lead list from the active source.
  pub async fn refresh(&mut self) {
    match self.source.list().await {
      Ok(leads) => {
        self.leads = leads;
        self.clamp_cursors();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  fn clamp_cursors(&mut self) {
    let len = self.filtered_leads().len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
    let notes = self.selected_lead().map(|l| l.notes.len()).unwrap_or(0);
    self.note_cursor = self.note_cursor.min(notes.saturating_sub(1));
  }

  // ── Projections ───────────────────────────────────────────────────────────

  /// Leads matching the current search string and status filter — a pure
  /// projection, recomputed on every call.
  pub fn filtered_leads(&self) -> Vec<&Lead> {
    let query = self.search.to_lowercase();
    self
      .leads
      .iter()
      .filter(|lead| {
        query.is_empty()
          || lead.name.to_lowercase().contains(&query)
          || lead.email.to_lowercase().contains(&query)
          || lead
            .phone
            .as_deref()
            .is_some_and(|p| p.to_lowercase().contains(&query))
      })
      .filter(|lead| {
        self.status_filter.is_none_or(|status| lead.status == status)
      })
      .collect()
  }

  /// The lead under the list cursor in the filtered view, if any.
  pub fn cursor_lead(&self) -> Option<&Lead> {
    let list = self.filtered_leads();
    list.get(self.list_cursor).copied()
  }

  /// The lead shown in the detail pane, if any.
  pub fn selected_lead(&self) -> Option<&Lead> {
    let id = self.selected_lead_id?;
    self.leads.iter().find(|l| l.lead_id == id)
  }

  /// Optimistically put a just-created lead at the top of the local list.
  pub fn prepend_lead(&mut self, lead: Lead) {
    self.leads.insert(0, lead);
    self.list_cursor = 0;
  }

  /// Advance the status filter: all → new → contacted → converted → lost →
  /// all.
  pub fn cycle_status_filter(&mut self) {
    self.status_filter = match self.status_filter {
      None => Some(LeadStatus::New),
      Some(LeadStatus::New) => Some(LeadStatus::Contacted),
      Some(LeadStatus::Contacted) => Some(LeadStatus::Converted),
      Some(LeadStatus::Converted) => Some(LeadStatus::Lost),
      Some(LeadStatus::Lost) => None,
    };
    self.list_cursor = 0;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.input_mode != InputMode::None {
      self.handle_input_key(key).await;
      return Ok(true);
    }

    match self.screen {
      Screen::LeadList => self.handle_list_key(key).await,
      Screen::LeadDetail => self.handle_detail_key(key).await,
    }
  }

  async fn handle_input_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        if self.input_mode == InputMode::Search {
          self.search.clear();
          self.list_cursor = 0;
        }
        self.input_mode = InputMode::None;
        self.input.clear();
      }
      KeyCode::Enter => self.submit_input().await,
      KeyCode::Backspace => {
        if self.input_mode == InputMode::Search {
          self.search.pop();
          self.list_cursor = 0;
        } else {
          self.input.pop();
        }
      }
      KeyCode::Char(c) => {
        if self.input_mode == InputMode::Search {
          self.search.push(c);
          self.list_cursor = 0;
        } else {
          self.input.push(c);
        }
      }
      _ => {}
    }
  }

  async fn submit_input(&mut self) {
    match std::mem::replace(&mut self.input_mode, InputMode::None) {
      InputMode::None | InputMode::Search => {}

      InputMode::NewLeadName => {
        let name = std::mem::take(&mut self.input);
        if name.trim().is_empty() {
          self.status_msg = "Cancelled: name is required".into();
        } else {
          // Stay in the form; next field.
          self.input_mode = InputMode::NewLeadEmail { name };
        }
      }

      InputMode::NewLeadEmail { name } => {
        let email = std::mem::take(&mut self.input);
        self.submit_new_lead(name, email).await;
      }

      InputMode::NewNote => {
        let text = std::mem::take(&mut self.input);
        self.submit_new_note(text).await;
      }

      InputMode::EditNote { note_id } => {
        let text = std::mem::take(&mut self.input);
        self.submit_note_edit(note_id, text).await;
      }
    }
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_leads().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      // Open detail
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_lead().map(|l| l.lead_id) {
          self.selected_lead_id = Some(id);
          self.note_cursor = 0;
          self.screen = Screen::LeadDetail;
        }
      }

      // Search
      KeyCode::Char('/') => {
        self.input_mode = InputMode::Search;
        self.search.clear();
        self.list_cursor = 0;
      }

      // Status filter
      KeyCode::Char('f') => self.cycle_status_filter(),

      // Add lead
      KeyCode::Char('a') => {
        self.input_mode = InputMode::NewLeadName;
        self.input.clear();
      }

      // Reload
      KeyCode::Char('r') => self.refresh().await,

      _ => {}
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Back to list
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::LeadList;
        self.selected_lead_id = None;
        self.note_cursor = 0;
      }

      // Note navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let notes = self.selected_lead().map(|l| l.notes.len()).unwrap_or(0);
        if notes > 0 && self.note_cursor + 1 < notes {
          self.note_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.note_cursor = self.note_cursor.saturating_sub(1);
      }

      // Status hotkeys: 1 new, 2 contacted, 3 converted, 4 lost
      KeyCode::Char(c @ '1'..='4') => {
        let status = LeadStatus::ALL[(c as usize) - ('1' as usize)];
        self.set_status(status).await;
      }

      // Notes
      KeyCode::Char('n') => {
        self.input_mode = InputMode::NewNote;
        self.input.clear();
      }
      KeyCode::Char('e') => {
        let under_cursor = self
          .selected_lead()
          .and_then(|l| l.notes.get(self.note_cursor))
          .map(|n| (n.note_id, n.text.clone()));
        if let Some((note_id, text)) = under_cursor {
          self.input_mode = InputMode::EditNote { note_id };
          self.input = text;
        }
      }
      KeyCode::Char('d') => self.delete_note_under_cursor().await,

      // Reload
      KeyCode::Char('r') => self.refresh().await,

      _ => {}
    }
    Ok(true)
  }

  // ── Mutations — round-trip then refetch ───────────────────────────────────

  async fn submit_new_lead(&mut self, name: String, email: String) {
    let Some(client) = self.source.client().cloned() else {
      self.status_msg = "Sample data is read-only".into();
      return;
    };
    let input = NewLead::new(name, email);
    match client.create_lead(&input).await {
      Ok(lead) => {
        self.prepend_lead(lead);
        self.refresh().await;
        self.status_msg = "Lead added".into();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn set_status(&mut self, status: LeadStatus) {
    let Some(id) = self.selected_lead_id else { return };
    let Some(client) = self.source.client().cloned() else {
      self.status_msg = "Sample data is read-only".into();
      return;
    };
    match client.update_status(id, status).await {
      Ok(_) => {
        self.refresh().await;
        self.status_msg = format!("Status set to {status}");
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn submit_new_note(&mut self, text: String) {
    let Some(id) = self.selected_lead_id else { return };
    let Some(client) = self.source.client().cloned() else {
      self.status_msg = "Sample data is read-only".into();
      return;
    };
    match client.add_note(id, &text).await {
      Ok(_) => {
        self.refresh().await;
        self.status_msg = "Note added".into();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn submit_note_edit(&mut self, note_id: Uuid, text: String) {
    let Some(id) = self.selected_lead_id else { return };
    let Some(client) = self.source.client().cloned() else {
      self.status_msg = "Sample data is read-only".into();
      return;
    };
    match client.update_note(id, note_id, &text).await {
      Ok(_) => {
        self.refresh().await;
        self.status_msg = "Note updated".into();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn delete_note_under_cursor(&mut self) {
    let Some(id) = self.selected_lead_id else { return };
    let Some(note_id) = self
      .selected_lead()
      .and_then(|l| l.notes.get(self.note_cursor))
      .map(|n| n.note_id)
    else {
      return;
    };
    let Some(client) = self.source.client().cloned() else {
      self.status_msg = "Sample data is read-only".into();
      return;
    };
    match client.delete_note(id, note_id).await {
      Ok(_) => {
        self.refresh().await;
        self.status_msg = "Note deleted".into();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  fn lead(name: &str, email: &str, phone: Option<&str>, status: LeadStatus) -> Lead {
    let at = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
    Lead {
      lead_id: Uuid::new_v4(),
      name: name.into(),
      email: email.into(),
      phone: phone.map(Into::into),
      source: "Website".into(),
      message: None,
      status,
      notes: Vec::new(),
      created_at: at,
      updated_at: at,
    }
  }

  fn app_with(leads: Vec<Lead>) -> App {
    let mut app = App::new(LeadSource::Sample(Vec::new()));
    app.leads = leads;
    app
  }

  #[test]
  fn search_matches_name_email_and_phone() {
    let mut app = app_with(vec![
      lead("Ann Lee", "ann@x.com", Some("+1 555-0101"), LeadStatus::New),
      lead("Bob Ray", "bob@y.com", None, LeadStatus::New),
    ]);

    app.search = "ann".into();
    assert_eq!(app.filtered_leads().len(), 1);
    assert_eq!(app.filtered_leads()[0].name, "Ann Lee");

    // Case-insensitive, matches email too.
    app.search = "Y.COM".into();
    assert_eq!(app.filtered_leads()[0].name, "Bob Ray");

    app.search = "555-01".into();
    assert_eq!(app.filtered_leads()[0].name, "Ann Lee");

    app.search = "nobody".into();
    assert!(app.filtered_leads().is_empty());
  }

  #[test]
  fn status_filter_composes_with_search() {
    let mut app = app_with(vec![
      lead("Ann Lee", "ann@x.com", None, LeadStatus::Converted),
      lead("Ann Ray", "annray@x.com", None, LeadStatus::New),
      lead("Bob Ray", "bob@x.com", None, LeadStatus::Converted),
    ]);

    app.search = "ann".into();
    app.status_filter = Some(LeadStatus::Converted);
    let filtered = app.filtered_leads();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Ann Lee");
  }

  #[test]
  fn filtering_is_a_pure_projection() {
    let mut app = app_with(vec![
      lead("Ann Lee", "ann@x.com", None, LeadStatus::New),
      lead("Bob Ray", "bob@x.com", None, LeadStatus::Lost),
    ]);

    app.search = "ann".into();
    let _ = app.filtered_leads();
    let _ = app.filtered_leads();
    assert_eq!(app.leads.len(), 2);
  }

  #[test]
  fn cycle_status_filter_wraps_around() {
    let mut app = app_with(Vec::new());
    assert_eq!(app.status_filter, None);
    app.cycle_status_filter();
    assert_eq!(app.status_filter, Some(LeadStatus::New));
    for _ in 0..3 {
      app.cycle_status_filter();
    }
    assert_eq!(app.status_filter, Some(LeadStatus::Lost));
    app.cycle_status_filter();
    assert_eq!(app.status_filter, None);
  }

  #[test]
  fn prepend_lead_goes_first() {
    let mut app = app_with(vec![lead("Old", "old@x.com", None, LeadStatus::New)]);
    app.list_cursor = 1;

    app.prepend_lead(lead("Fresh", "fresh@x.com", None, LeadStatus::New));
    assert_eq!(app.leads[0].name, "Fresh");
    assert_eq!(app.leads.len(), 2);
    assert_eq!(app.list_cursor, 0);
  }
}
