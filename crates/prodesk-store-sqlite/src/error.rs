//! Error type for `prodesk-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// Mirrors the hosted API rejecting a column it does not know.
  #[error("column {column:?} does not exist on table {table:?}")]
  UnknownColumn { table: &'static str, column: String },

  #[error("invalid public base url {url:?}: {reason}")]
  InvalidBaseUrl { url: String, reason: String },

  #[error("rows must be JSON objects")]
  InvalidRow,

  #[error("The resource already exists: {bucket}/{key}")]
  BlobExists { bucket: String, key: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
