//! The record pane: a table on wide terminals, a card list on narrow ones.

use chrono::Local;
use prodesk_core::{
  display::{Detail, RecordView},
  record::{Record, Table as StoreTable},
};
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span, Text},
  widgets::{Cell, List, ListItem, ListState, Row, Table, TableState},
};

use crate::app::App;

fn views(app: &App, records: &[&Record]) -> Vec<RecordView> {
  records
    .iter()
    .map(|record| RecordView::new(record, app.date_style, &Local))
    .collect()
}

fn cursor_style() -> Style {
  Style::default()
    .bg(Color::Blue)
    .fg(Color::White)
    .add_modifier(Modifier::BOLD)
}

fn caption() -> Style { Style::default().fg(Color::DarkGray) }

// ─── Table ────────────────────────────────────────────────────────────────────

pub fn draw_table(f: &mut Frame, area: Rect, app: &App, records: &[&Record]) {
  let applicants = app.review.table() == StoreTable::Applicants;

  let mut header = vec!["DATE", "NAME", "CONTACT"];
  let mut widths = vec![
    Constraint::Length(12),
    Constraint::Length(24),
    Constraint::Length(40),
  ];
  if applicants {
    header.extend(["POSITION", "RESUME"]);
    widths.extend([Constraint::Length(22), Constraint::Min(10)]);
  } else {
    header.push("MESSAGE");
    widths.push(Constraint::Min(10));
  }

  let rows = views(app, records).into_iter().map(|view| {
    let mut cells = vec![
      Cell::from(view.date),
      Cell::from(view.name),
      Cell::from(format!("{} · {}", view.email, view.phone)),
    ];
    match view.detail {
      Detail::Applicant { position, cv_url } => {
        cells.push(Cell::from(position));
        cells.push(Cell::from(cv_url));
      }
      Detail::Inquiry { message } => cells.push(Cell::from(message)),
    }
    Row::new(cells)
  });

  let table = Table::new(rows, widths)
    .header(
      Row::new(header).style(caption().add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(cursor_style());

  let mut state = TableState::default().with_selected(Some(app.cursor));
  f.render_stateful_widget(table, area, &mut state);
}

// ─── Cards ────────────────────────────────────────────────────────────────────

fn card(view: RecordView) -> ListItem<'static> {
  let mut lines = vec![Line::from(vec![
    Span::styled(view.name, Style::default().add_modifier(Modifier::BOLD)),
    Span::styled(format!("  {}", view.date), caption()),
  ])];

  let detail = match view.detail {
    Detail::Applicant { position, cv_url } => {
      lines.push(Line::from(Span::styled(position, Style::default().fg(Color::Cyan))));
      Line::from(vec![Span::styled("Resume: ", caption()), Span::raw(cv_url)])
    }
    Detail::Inquiry { message } => Line::from(vec![
      Span::styled("Message: ", caption()),
      Span::styled(format!("\"{message}\""), Style::default().add_modifier(Modifier::ITALIC)),
    ]),
  };

  lines.push(Line::from(vec![Span::styled("Email: ", caption()), Span::raw(view.email)]));
  lines.push(Line::from(vec![Span::styled("Phone: ", caption()), Span::raw(view.phone)]));
  lines.push(detail);
  lines.push(Line::from(""));
  ListItem::new(Text::from(lines))
}

pub fn draw_cards(f: &mut Frame, area: Rect, app: &App, records: &[&Record]) {
  let items: Vec<ListItem> = views(app, records).into_iter().map(card).collect();

  let mut state = ListState::default();
  state.select(Some(app.cursor));

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(cursor_style())
      .highlight_symbol("▌"),
    area,
    &mut state,
  );
}
