mod text;
mod views;

use crate::app::{App, LoadPhase, Mode, Tone};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Min(1),    // Card list
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  match app.phase() {
    LoadPhase::Failed { message } => views::directory::draw_error_card(frame, chunks[0], message),
    phase => views::directory::draw_user_list(
      frame,
      chunks[0],
      app.visible_records(),
      app.selected(),
      app.search_query(),
      matches!(phase, LoadPhase::Idle | LoadPhase::Loading),
    ),
  }

  draw_status_bar(frame, chunks[1], app);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let (content, style) = if let Some(flash) = app.flash_text() {
    (format!(" {}", flash), Style::default().fg(Color::Yellow))
  } else if *app.mode() == Mode::Search {
    (
      format!(" /{}", app.search_query()),
      Style::default().fg(Color::Cyan),
    )
  } else if app.status_text().is_empty() {
    (
      " r:reload  /:search  y:copy email  m:map  j/k:nav  q:quit".to_string(),
      Style::default().fg(Color::DarkGray),
    )
  } else {
    let color = match app.status_tone() {
      Tone::Info => Color::White,
      Tone::Busy => Color::Yellow,
      Tone::Good => Color::Green,
      Tone::Bad => Color::Red,
    };
    (format!(" {}", app.status_text()), Style::default().fg(color))
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}
