//! Lead list pane — left panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem},
};

use crate::{app::App, ui::status_color};

/// Render the lead list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_leads();
  let total = app.leads.len();

  // Title with counts plus the active status filter, if any.
  let mut title = if filtered.len() == total {
    format!(" Leads ({total}) ")
  } else {
    format!(" Leads ({}/{total}) ", filtered.len())
  };
  if let Some(status) = app.status_filter {
    title.push_str(&format!("[{status}] "));
  }

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = filtered
    .iter()
    .enumerate()
    .map(|(i, lead)| {
      let is_cursor = i == app.list_cursor;

      let style = if is_cursor {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };

      let badge_style = if is_cursor {
        style
      } else {
        Style::default().fg(status_color(lead.status))
      };

      ListItem::new(Line::from(vec![
        Span::styled("● ", badge_style),
        Span::styled(lead.name.clone(), style),
        Span::styled(
          format!("  {}", lead.email),
          if is_cursor {
            style
          } else {
            Style::default().fg(Color::DarkGray)
          },
        ),
      ]))
    })
    .collect();

  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(List::new(items), inner);
}
