//! `GET /admin`: the HTML review dashboard.

use askama::Template;
use axum::{
  extract::{Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use prodesk_core::{
  display::{DateStyle, Detail, RecordView, record_views},
  record::Table,
  review::{self, ReviewFlow, Screen},
  store::Backend,
};
use serde::Deserialize;
use strum::IntoEnumIterator as _;

use crate::{AppState, auth::Authenticated, error::Error};

/// Forces one presentation. Without it the page carries both and a media
/// query picks by viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
  Table,
  Cards,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
  #[serde(default)]
  pub tab:    Table,
  pub layout: Option<Layout>,
}

pub struct TabLink {
  pub label:  &'static str,
  pub href:   String,
  pub active: bool,
}

/// A record flattened for the template; fields not shown for the current
/// table are left empty.
pub struct Row {
  pub date:     String,
  pub name:     String,
  pub email:    String,
  pub phone:    String,
  pub position: String,
  pub cv_url:   String,
  pub message:  String,
}

impl From<RecordView> for Row {
  fn from(view: RecordView) -> Self {
    let (position, cv_url, message) = match view.detail {
      Detail::Applicant { position, cv_url } => (position, cv_url, String::new()),
      Detail::Inquiry { message } => (String::new(), String::new(), message),
    };
    Self {
      date: view.date,
      name: view.name,
      email: view.email,
      phone: view.phone,
      position,
      cv_url,
      message,
    }
  }
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminPage {
  pub tabs:          Vec<TabLink>,
  pub is_applicants: bool,
  pub error:         Option<String>,
  pub rows:          Vec<Row>,
  pub show_table:    bool,
  pub show_cards:    bool,
  pub responsive:    bool,
}

fn tab_links(current: Table, layout: Option<Layout>) -> Vec<TabLink> {
  let suffix = match layout {
    Some(Layout::Table) => "&layout=table",
    Some(Layout::Cards) => "&layout=cards",
    None => "",
  };
  Table::iter()
    .map(|table| TabLink {
      label:  table.label(),
      href:   format!("/admin?tab={}{suffix}", table.name()),
      active: table == current,
    })
    .collect()
}

pub async fn dashboard<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Query(query): Query<DashboardQuery>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: Backend + Clone + 'static,
{
  let style = headers
    .get(header::ACCEPT_LANGUAGE)
    .and_then(|v| v.to_str().ok())
    .map(DateStyle::from_accept_language)
    .unwrap_or_default();

  // One request is one tab transition: a single fetch, applied at once.
  let (mut flow, ticket) = ReviewFlow::new(query.tab);
  let result = review::fetch(state.store.as_ref(), ticket.table()).await;
  flow.complete(ticket, result);

  let (status, error, rows) = match flow.screen() {
    Screen::Failed(message) => {
      (StatusCode::BAD_GATEWAY, Some(message.to_string()), Vec::new())
    }
    Screen::Rows(records) => {
      let rows = record_views(records, style, &Utc)
        .into_iter()
        .map(Row::from)
        .collect();
      (StatusCode::OK, None, rows)
    }
    Screen::Empty | Screen::Loading => (StatusCode::OK, None, Vec::new()),
  };

  let page = AdminPage {
    tabs: tab_links(query.tab, query.layout),
    is_applicants: query.tab == Table::Applicants,
    error,
    rows,
    show_table: query.layout != Some(Layout::Cards),
    show_cards: query.layout != Some(Layout::Table),
    responsive: query.layout.is_none(),
  };
  Ok((status, Html(page.render()?)).into_response())
}
