//! TUI rendering — orchestrates all panes.

pub mod lead_detail;
pub mod lead_list;

use chrono::{Local, Utc};
use funnel_core::{lead::LeadStatus, stats};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, InputMode, Screen};

/// Badge colour for a funnel stage, shared by all panes.
pub fn status_color(status: LeadStatus) -> Color {
  match status {
    LeadStatus::New => Color::Green,
    LeadStatus::Contacted => Color::Blue,
    LeadStatus::Converted => Color::Magenta,
    LeadStatus::Lost => Color::Red,
  }
}

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, stats strip, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(2), // stats strip
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  draw_stats(f, rows[1], app);
  draw_body(f, rows[2], app);
  draw_status(f, rows[3], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " funnel  [/] search  [f] filter  [a] add  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::DarkGray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.len() as u16;
  let right_width = right.content.len() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Stats strip ─────────────────────────────────────────────────────────────

/// Two-line dashboard summary: per-status counts + conversion rate, and the
/// trailing 7-day creation series.
fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
  let counts = stats::status_counts(&app.leads);
  let rate = stats::conversion_rate(&app.leads);

  let mut spans: Vec<Span> = vec![Span::raw(" ")];
  for status in LeadStatus::ALL {
    spans.push(Span::styled(
      "● ",
      Style::default().fg(status_color(status)),
    ));
    spans.push(Span::raw(format!("{} {}   ", status, counts.get(status))));
  }
  spans.push(Span::styled(
    format!("conversion {rate}%"),
    Style::default()
      .fg(Color::Magenta)
      .add_modifier(Modifier::BOLD),
  ));
  let counts_line = Line::from(spans);

  let timeline = stats::creation_timeline(&app.leads, Utc::now().date_naive());
  let series: Vec<String> =
    timeline.iter().map(|day| day.total.to_string()).collect();
  let timeline_line = Line::from(vec![
    Span::styled(" last 7 days ", Style::default().fg(Color::DarkGray)),
    Span::raw(series.join(" ")),
    Span::styled("  new leads/day", Style::default().fg(Color::DarkGray)),
  ]);

  f.render_widget(Paragraph::new(vec![counts_line, timeline_line]), area);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  // Split into left list pane (35%) and right detail pane (65%).
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
    .split(area);

  lead_list::draw(f, cols[0], app);

  if app.selected_lead_id.is_some() {
    lead_detail::draw(f, cols[1], app);
  } else {
    draw_empty_detail(f, cols[1]);
  }
}

fn draw_empty_detail(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(Line::from(vec![Span::styled(
      "Select a lead and press Enter.",
      Style::default().fg(Color::DarkGray),
    )])),
    inner,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  // Text-entry modes take over the whole bar as a prompt.
  let prompt = match &app.input_mode {
    InputMode::Search => Some(format!("/{}", app.search)),
    InputMode::NewLeadName => Some(format!("New lead — name: {}", app.input)),
    InputMode::NewLeadEmail { .. } => {
      Some(format!("New lead — email: {}", app.input))
    }
    InputMode::NewNote => Some(format!("New note: {}", app.input)),
    InputMode::EditNote { .. } => Some(format!("Edit note: {}", app.input)),
    InputMode::None => None,
  };

  if let Some(prompt) = prompt {
    let line = Line::from(vec![
      Span::styled(
        " INPUT ",
        Style::default()
          .fg(Color::Black)
          .bg(Color::Yellow)
          .add_modifier(Modifier::BOLD),
      ),
      Span::raw(format!("  {prompt}")),
    ]);
    f.render_widget(
      Paragraph::new(line).style(Style::default().bg(Color::Black)),
      area,
    );
    return;
  }

  let (mode_label, hints) = match app.screen {
    Screen::LeadList => (
      "LEADS",
      "↑↓/jk navigate  / search  f filter  a add  Enter detail  r reload  q quit",
    ),
    Screen::LeadDetail => (
      "DETAIL",
      "↑↓/jk notes  1-4 status  n note  e edit  d delete  Esc back  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
