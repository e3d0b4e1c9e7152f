use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::directory::types::Record;
use crate::ui::text::sanitize;

/// Number of placeholder rows shown while a load is in flight.
const SKELETON_ROWS: usize = 6;

/// Draw the card list: skeletons while loading, an explicit placeholder for
/// an empty list, otherwise one card per record in input order.
pub fn draw_user_list(
  frame: &mut Frame,
  area: Rect,
  users: &[Record],
  selected: usize,
  query: &str,
  loading: bool,
) {
  let title = if loading {
    " Users (loading...) ".to_string()
  } else if query.trim().is_empty() {
    format!(" Users ({}) ", users.len())
  } else {
    format!(" Users ({}) /{} ", users.len(), query.trim())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if loading {
    draw_skeletons(frame, area, block);
    return;
  }

  if users.is_empty() {
    let paragraph = Paragraph::new("No users found.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = users.iter().map(user_card).collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected));

  frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the inline error card shown when a load fails with no cached data.
pub fn draw_error_card(frame: &mut Frame, area: Rect, message: &str) {
  let block = Block::default()
    .title(" Users ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));

  let text = Text::from(vec![
    Line::raw(""),
    Line::from(Span::styled(
      format!(" {}", sanitize(message)),
      Style::default().fg(Color::Red),
    )),
  ]);

  let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
  frame.render_widget(paragraph, area);
}

/// One card: name, email, postal address.
fn user_card(user: &Record) -> ListItem<'static> {
  let name = sanitize(&user.name).into_owned();
  let email = sanitize(&user.email).into_owned();
  let formatted = user.address.formatted();
  let address = sanitize(&formatted).into_owned();

  let lines = vec![
    Line::from(Span::styled(
      name,
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    )),
    Line::from(vec![
      Span::styled("  email    ", Style::default().fg(Color::DarkGray)),
      Span::styled(email, Style::default().fg(Color::Cyan)),
    ]),
    Line::from(vec![
      Span::styled("  address  ", Style::default().fg(Color::DarkGray)),
      Span::raw(address),
    ]),
    Line::raw(""),
  ];

  ListItem::new(Text::from(lines))
}

fn draw_skeletons(frame: &mut Frame, area: Rect, block: Block) {
  let style = Style::default().fg(Color::DarkGray);
  let items: Vec<ListItem> = (0..SKELETON_ROWS)
    .map(|_| {
      ListItem::new(Text::from(vec![
        Line::from(Span::styled("░".repeat(32), style)),
        Line::from(Span::styled("░".repeat(20), style)),
        Line::raw(""),
      ]))
    })
    .collect();

  frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::directory::types::Address;
  use ratatui::backend::TestBackend;
  use ratatui::Terminal;

  fn record(name: &str, email: &str) -> Record {
    Record {
      id: 0,
      name: name.to_string(),
      email: email.to_string(),
      address: Address::default(),
    }
  }

  fn render(users: &[Record], loading: bool) -> String {
    let backend = TestBackend::new(60, 30);
    let mut terminal = Terminal::new(backend).expect("Failed to create test terminal");
    terminal
      .draw(|frame| draw_user_list(frame, frame.area(), users, 0, "", loading))
      .expect("Failed to draw");

    let buffer = terminal.backend().buffer();
    buffer.content.iter().map(|cell| cell.symbol()).collect()
  }

  #[test]
  fn test_empty_list_renders_single_placeholder() {
    let rendered = render(&[], false);
    assert_eq!(rendered.matches("No users found.").count(), 1);
  }

  #[test]
  fn test_cards_render_in_input_order() {
    let users = vec![
      record("Alice", "alice@example.com"),
      record("Bob", "bob@example.com"),
    ];
    let rendered = render(&users, false);

    let alice = rendered.find("Alice").expect("Alice not rendered");
    let bob = rendered.find("Bob").expect("Bob not rendered");
    assert!(alice < bob);
    assert!(rendered.contains("alice@example.com"));
    assert_eq!(rendered.matches("No users found.").count(), 0);
  }

  #[test]
  fn test_loading_renders_skeletons_not_records() {
    let users = vec![record("Alice", "alice@example.com")];
    let rendered = render(&users, true);

    assert!(rendered.contains("loading..."));
    assert!(rendered.contains("░░░░"));
    assert!(!rendered.contains("Alice"));
  }

  #[test]
  fn test_error_card_shows_message() {
    let backend = TestBackend::new(60, 10);
    let mut terminal = Terminal::new(backend).expect("Failed to create test terminal");
    terminal
      .draw(|frame| draw_error_card(frame, frame.area(), "HTTP 500 Internal Server Error"))
      .expect("Failed to draw");

    let buffer = terminal.backend().buffer();
    let out: String = buffer.content.iter().map(|cell| cell.symbol()).collect();
    assert!(out.contains("HTTP 500"));
  }
}
