//! Application state machine and key dispatcher.
//!
//! The review state lives in [`ReviewFlow`]; this layer adds the cursor and
//! the name filter, and tells the event loop when to start a fetch. Fetch
//! results come back through [`App::apply`] tagged with their ticket.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use prodesk_core::{
  display::DateStyle,
  record::{Record, Table},
  review::{FetchTicket, ReviewFlow},
};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
  Continue,
  /// Start the fetch for this ticket.
  Fetch(FetchTicket),
  Quit,
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App {
  pub review: ReviewFlow,

  /// Current fuzzy-filter string over record names.
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* rows.
  pub cursor: usize,

  pub date_style: DateStyle,
}

impl App {
  /// Open on `table`. The returned ticket is the initial fetch.
  pub fn new(table: Table, date_style: DateStyle) -> (Self, FetchTicket) {
    let (review, ticket) = ReviewFlow::new(table);
    let app = Self {
      review,
      filter: String::new(),
      filter_active: false,
      cursor: 0,
      date_style,
    };
    (app, ticket)
  }

  /// Hand a finished fetch to the review state. Stale results are dropped.
  pub fn apply(&mut self, ticket: FetchTicket, result: Result<Vec<Record>, String>) {
    if self.review.complete(ticket, result) {
      self.clamp_cursor();
    }
  }

  // ── Filtered rows ─────────────────────────────────────────────────────────

  /// Rows whose name matches the current filter, in fetched order.
  pub fn visible_records(&self) -> Vec<&Record> {
    let rows = self.review.rows();
    if self.filter.is_empty() {
      return rows.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    rows
      .iter()
      .filter(|record| matcher.fuzzy_match(record.name(), &self.filter).is_some())
      .collect()
  }

  fn clamp_cursor(&mut self) {
    let len = self.visible_records().len();
    self.cursor = self.cursor.min(len.saturating_sub(1));
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  fn select_tab(&mut self, table: Table) -> Control {
    match self.review.select(table) {
      Some(ticket) => {
        self.cursor = 0;
        Control::Fetch(ticket)
      }
      None => Control::Continue,
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  pub fn handle_key(&mut self, key: KeyEvent) -> Control {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Control::Quit;
    }

    if self.filter_active {
      self.handle_filter_key(key);
      return Control::Continue;
    }

    match key.code {
      KeyCode::Char('q') => Control::Quit,

      KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
        self.select_tab(self.review.table().toggled())
      }
      KeyCode::Char('1') => self.select_tab(Table::Applicants),
      KeyCode::Char('2') => self.select_tab(Table::Contacts),

      KeyCode::Char('r') => {
        self.cursor = 0;
        Control::Fetch(self.review.refresh())
      }

      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.visible_records().len() {
          self.cursor += 1;
        }
        Control::Continue
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
        Control::Continue
      }

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.cursor = 0;
        Control::Continue
      }
      KeyCode::Esc => {
        self.filter.clear();
        self.cursor = 0;
        Control::Continue
      }

      _ => Control::Continue,
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
      }
      KeyCode::Enter => self.filter_active = false,
      KeyCode::Backspace => {
        self.filter.pop();
      }
      KeyCode::Char(c) => self.filter.push(c),
      _ => {}
    }
    self.cursor = 0;
  }
}
