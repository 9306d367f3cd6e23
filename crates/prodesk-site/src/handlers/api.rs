//! `GET /api/{table}`: JSON rows for the terminal dashboard.

use std::str::FromStr as _;

use axum::{
  Json,
  extract::{Path, State},
};
use prodesk_core::{
  record::{Record, Table},
  review,
  store::Backend,
};

use crate::{AppState, auth::Authenticated, error::Error};

/// Every row of `table`, newest first.
pub async fn list<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Path(table): Path<String>,
) -> Result<Json<Vec<Record>>, Error>
where
  S: Backend + Clone + 'static,
{
  let table = Table::from_str(&table).map_err(|_| Error::NotFound)?;
  let records = review::fetch(state.store.as_ref(), table).await?;
  tracing::debug!(%table, count = records.len(), "listed rows");
  Ok(Json(records))
}
