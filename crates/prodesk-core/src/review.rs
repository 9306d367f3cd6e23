//! Review Flow: the admin's two-tab view over `applicants` and `contacts`.
//!
//! Every tab transition issues exactly one fetch of the whole table, newest
//! first, and puts the view into a loading state until that fetch resolves.
//! Fetches are tagged with a [`FetchTicket`]; a completion is applied only if
//! its ticket is still the latest one issued, so a slow response for a tab
//! the operator already left can never overwrite the current view.

use thiserror::Error;

use crate::{
  record::{Record, Table},
  store::{Backend, SelectQuery},
};

// ─── Fetch ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("{0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("unexpected row shape: {0}")]
  Decode(#[from] crate::Error),
}

/// Fetch every row of `table`, all columns, ordered by `created_at`
/// descending.
pub async fn fetch<B: Backend>(
  backend: &B,
  table: Table,
) -> Result<Vec<Record>, FetchError> {
  let query = SelectQuery::newest_first(table);
  let rows = backend
    .select(&query)
    .await
    .map_err(|e| FetchError::Store(Box::new(e)))?;
  Ok(table.decode_rows(rows)?)
}

// ─── State ───────────────────────────────────────────────────────────────────

/// Identifies one issued fetch. Hand it back to [`ReviewFlow::complete`]
/// together with the fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
  table: Table,
  seq:   u64,
}

impl FetchTicket {
  /// The table this fetch must read.
  pub fn table(&self) -> Table { self.table }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
  Loading,
  Loaded(Vec<Record>),
  Failed(String),
}

/// What the dashboard should draw right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen<'a> {
  Loading,
  /// The fetch failed; the message is shown in place of the rows.
  Failed(&'a str),
  /// The fetch succeeded with zero rows.
  Empty,
  Rows(&'a [Record]),
}

/// Explicit, per-dashboard review state: the selected table and what is
/// known about its rows.
#[derive(Debug, Clone)]
pub struct ReviewFlow {
  table: Table,
  seq:   u64,
  phase: Phase,
}

impl ReviewFlow {
  /// Enter the initial tab. The returned ticket is the first fetch to run.
  pub fn new(table: Table) -> (Self, FetchTicket) {
    let flow = Self {
      table,
      seq: 0,
      phase: Phase::Loading,
    };
    let ticket = flow.ticket();
    (flow, ticket)
  }

  pub fn table(&self) -> Table { self.table }

  pub fn is_loading(&self) -> bool { self.phase == Phase::Loading }

  /// Switch tabs. Returns `None` when `table` is already selected, since
  /// that is not a transition and issues no fetch.
  pub fn select(&mut self, table: Table) -> Option<FetchTicket> {
    if table == self.table {
      return None;
    }
    self.table = table;
    Some(self.reissue())
  }

  /// Re-fetch the current tab.
  pub fn refresh(&mut self) -> FetchTicket { self.reissue() }

  /// Apply the result of the fetch identified by `ticket`. Returns `false`
  /// and leaves the state untouched if a newer fetch has been issued since.
  ///
  /// A failure replaces the rows with an error state: whatever rows were on
  /// screen may belong to the other tab.
  pub fn complete<E: std::fmt::Display>(
    &mut self,
    ticket: FetchTicket,
    result: Result<Vec<Record>, E>,
  ) -> bool {
    if ticket != self.ticket() {
      tracing::debug!(?ticket, current = ?self.ticket(), "discarding stale fetch");
      return false;
    }
    self.phase = match result {
      Ok(rows) => Phase::Loaded(rows),
      Err(e) => {
        tracing::error!(table = %self.table, error = %e, "error fetching rows");
        Phase::Failed(e.to_string())
      }
    };
    true
  }

  pub fn screen(&self) -> Screen<'_> {
    match &self.phase {
      Phase::Loading => Screen::Loading,
      Phase::Failed(message) => Screen::Failed(message),
      Phase::Loaded(rows) if rows.is_empty() => Screen::Empty,
      Phase::Loaded(rows) => Screen::Rows(rows),
    }
  }

  /// Rows currently shown; empty while loading or after a failure.
  pub fn rows(&self) -> &[Record] {
    match &self.phase {
      Phase::Loaded(rows) => rows,
      _ => &[],
    }
  }

  fn ticket(&self) -> FetchTicket {
    FetchTicket {
      table: self.table,
      seq:   self.seq,
    }
  }

  fn reissue(&mut self) -> FetchTicket {
    self.seq += 1;
    self.phase = Phase::Loading;
    self.ticket()
  }
}
