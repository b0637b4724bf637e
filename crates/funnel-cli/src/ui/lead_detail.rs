//! Lead detail pane — right panel: contact fields, status, notes.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::{app::App, ui::status_color};

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(lead) = app.selected_lead() else {
    return;
  };

  let block = Block::default()
    .title(format!(" {} ", lead.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let inner = block.inner(area);
  f.render_widget(block, area);

  let label = Style::default().fg(Color::DarkGray);
  let mut lines: Vec<Line> = vec![
    Line::from(vec![
      Span::styled("status   ", label),
      Span::styled(
        lead.status.to_string(),
        Style::default()
          .fg(status_color(lead.status))
          .add_modifier(Modifier::BOLD),
      ),
      Span::styled("   (1 new  2 contacted  3 converted  4 lost)", label),
    ]),
    Line::from(vec![
      Span::styled("email    ", label),
      Span::raw(lead.email.clone()),
    ]),
  ];

  if let Some(phone) = &lead.phone {
    lines.push(Line::from(vec![
      Span::styled("phone    ", label),
      Span::raw(phone.clone()),
    ]));
  }

  lines.push(Line::from(vec![
    Span::styled("source   ", label),
    Span::raw(lead.source.clone()),
  ]));

  if let Some(message) = &lead.message {
    lines.push(Line::from(vec![
      Span::styled("message  ", label),
      Span::raw(message.clone()),
    ]));
  }

  lines.push(Line::from(vec![
    Span::styled("created  ", label),
    Span::raw(lead.created_at.format("%Y-%m-%d %H:%M").to_string()),
  ]));

  // Notes section.
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    format!("Notes ({})", lead.notes.len()),
    Style::default().add_modifier(Modifier::BOLD),
  )));

  if lead.notes.is_empty() {
    lines.push(Line::from(Span::styled(
      "No notes yet — press n to add one.",
      label,
    )));
  }

  for (i, note) in lead.notes.iter().enumerate() {
    let is_cursor = i == app.note_cursor;
    let style = if is_cursor {
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default()
    };
    lines.push(Line::from(vec![
      Span::styled(
        format!("{} ", note.created_at.format("%Y-%m-%d %H:%M")),
        if is_cursor { style } else { label },
      ),
      Span::styled(note.text.clone(), style),
    ]));
  }

  f.render_widget(Paragraph::new(lines), inner);
}
