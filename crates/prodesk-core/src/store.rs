//! The `Backend` trait and supporting query types.
//!
//! The trait is the whole surface the site needs from its hosted database and
//! object storage: insert rows, select rows, upload a blob, resolve a blob's
//! public URL. It is implemented by `prodesk-store-sqlite` and
//! `prodesk-supabase`; the flows in this crate depend only on the trait.

use std::future::Future;

use bytes::Bytes;

use crate::record::Table;

// ─── Query type ──────────────────────────────────────────────────────────────

/// Sort direction for [`SelectQuery::order_by`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
  pub column:    String,
  pub ascending: bool,
}

/// Parameters for [`Backend::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
  pub table:    Table,
  /// Comma-separated column list, or `*` for all columns.
  pub columns:  String,
  pub order_by: Option<Order>,
}

impl SelectQuery {
  /// All rows, all columns, most recently created first.
  pub fn newest_first(table: Table) -> Self {
    Self {
      table,
      columns: "*".to_string(),
      order_by: Some(Order {
        column:    "created_at".to_string(),
        ascending: false,
      }),
    }
  }
}

// ─── Blob ────────────────────────────────────────────────────────────────────

/// An uploaded file body and its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
  pub bytes:        Bytes,
  pub content_type: String,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the hosted table + blob store.
///
/// Every failing call carries the backend's own message in `Self::Error`'s
/// `Display`, which is what ends up in front of the user.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait Backend: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert `rows` (JSON objects) into `table`. The store assigns `id` and
  /// `created_at`.
  fn insert(
    &self,
    table: Table,
    rows: Vec<serde_json::Value>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Fetch rows as JSON objects.
  fn select<'a>(
    &'a self,
    query: &'a SelectQuery,
  ) -> impl Future<Output = Result<Vec<serde_json::Value>, Self::Error>> + Send + 'a;

  /// Store `blob` under `key` in `bucket`. Fails if the key already exists.
  fn upload_blob<'a>(
    &'a self,
    bucket: &'a str,
    key: &'a str,
    blob: Blob,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// The public URL of `key` in `bucket`. A pure function of its inputs; it
  /// does not check that the blob exists.
  fn public_url(&self, bucket: &str, key: &str) -> String;
}
