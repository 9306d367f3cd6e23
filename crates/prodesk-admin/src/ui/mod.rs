//! TUI rendering: header with tabs, the record pane, and a status bar.

mod records;

use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};
use prodesk_core::{display::Viewport, record::Table, review::Screen};
use strum::IntoEnumIterator as _;

use crate::app::App;

/// Terminal width from which rows are drawn as a table instead of cards.
pub const TABLE_MIN_WIDTH: u16 = 100;

// ─── Root draw ────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Length(18), Constraint::Min(0)])
    .split(area);

  let title = Paragraph::new(Span::styled(
    " ADMIN DASHBOARD ",
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
  ))
  .style(Style::default().bg(Color::DarkGray));
  f.render_widget(title, cols[0]);

  let selected = Table::iter()
    .position(|table| table == app.review.table())
    .unwrap_or_default();
  let tabs = Tabs::new(
    Table::iter()
      .enumerate()
      .map(|(i, table)| Line::from(format!("{} {}", i + 1, table.label().to_uppercase())))
      .collect::<Vec<_>>(),
  )
  .select(selected)
  .style(Style::default().fg(Color::Gray).bg(Color::DarkGray))
  .highlight_style(
    Style::default()
      .fg(Color::Black)
      .bg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  f.render_widget(tabs, cols[1]);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let records = app.visible_records();
  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" {} ({}/{}) ", app.review.table().label(), records.len(), app.review.rows().len())
  } else {
    format!(" {} ({}) ", app.review.table().label(), app.review.rows().len())
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  match app.review.screen() {
    Screen::Loading => draw_notice(f, inner, "Syncing Data...", Color::Gray),
    Screen::Failed(message) => {
      let error = Paragraph::new(format!("Error: {message}"))
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true });
      f.render_widget(error, inner);
    }
    Screen::Empty => draw_notice(f, inner, "No Records Found", Color::Gray),
    Screen::Rows(_) if records.is_empty() => {
      draw_notice(f, inner, "No Records Found", Color::Gray)
    }
    Screen::Rows(_) => match Viewport::for_width(area.width, TABLE_MIN_WIDTH) {
      Viewport::Wide => records::draw_table(f, inner, app, &records),
      Viewport::Narrow => records::draw_cards(f, inner, app, &records),
    },
  }
}

fn draw_notice(f: &mut Frame, area: Rect, text: &str, color: Color) {
  let top = area.y + area.height / 2;
  let line = Rect { y: top, height: 1.min(area.height), ..area };
  f.render_widget(
    Paragraph::new(text)
      .alignment(Alignment::Center)
      .style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
    line,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = if app.filter_active {
    ("SEARCH", "Type to filter  Esc cancel  Enter done".to_string())
  } else if !app.filter.is_empty() {
    ("FILTER", format!("/{}  Esc clear  / new filter  q quit", app.filter))
  } else {
    ("NORMAL", "Tab/1/2 switch  r refresh  ↑↓/jk move  / filter  q quit".to_string())
  };
  let hints = if app.filter_active {
    format!("/{}_  {hints}", app.filter)
  } else {
    hints
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {hints}"),
    Style::default().fg(Color::DarkGray),
  );

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
