//! [`SqliteStore`], the SQLite implementation of [`Backend`].

use std::path::Path;

use bytes::Bytes;
use chrono::Utc;
use rusqlite::OptionalExtension as _;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use url::Url;

use prodesk_core::{
  record::Table,
  store::{Backend, Blob, SelectQuery},
};

use crate::{
  encode::{encode_dt, json_to_sql, sql_to_json},
  schema::{all_columns, writable_columns, SCHEMA},
  Error, Result,
};

/// Where [`SqliteStore::public_url`] points when no base URL is configured.
const DEFAULT_PUBLIC_BASE: &str = "http://localhost:8080";

fn parse_base(base: &str) -> Result<Url> {
  let invalid = |reason: String| Error::InvalidBaseUrl {
    url: base.to_owned(),
    reason,
  };
  let url = Url::parse(base.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
  if url.cannot_be_a_base() {
    return Err(invalid("not a base url".into()));
  }
  Ok(url)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Prodesk store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:        tokio_rusqlite::Connection,
  public_base: Url,
}

/// A blob as read back from the `blobs` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
  pub bytes:        Bytes,
  pub content_type: String,
  /// Lowercase SHA-256 hex of `bytes`.
  pub content_hash: String,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  /// Set the origin that public blob URLs are built on. The site serves
  /// blobs under `{base}/files/{bucket}/{key}`.
  pub fn with_public_base_url(mut self, base: &str) -> Result<Self> {
    self.public_base = parse_base(base)?;
    Ok(self)
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self {
      conn,
      public_base: parse_base(DEFAULT_PUBLIC_BASE)?,
    })
  }

  /// Read back a blob written by [`Backend::upload_blob`].
  pub async fn fetch_blob(&self, bucket: &str, key: &str) -> Result<Option<StoredBlob>> {
    let bucket = bucket.to_owned();
    let key = key.to_owned();

    let row = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT data, content_type, content_hash FROM blobs
             WHERE bucket = ?1 AND key = ?2",
            rusqlite::params![bucket, key],
            |r| {
              Ok((
                r.get::<_, Vec<u8>>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
              ))
            },
          )
          .optional()?;
        Ok(row)
      })
      .await?;

    Ok(row.map(|(data, content_type, content_hash)| StoredBlob {
      bytes: Bytes::from(data),
      content_type,
      content_hash,
    }))
  }
}

// ─── Row checks ──────────────────────────────────────────────────────────────

fn check_column(table: Table, column: &str, allowed: &[&str]) -> Result<()> {
  if allowed.contains(&column) {
    Ok(())
  } else {
    Err(Error::UnknownColumn {
      table:  table.name(),
      column: column.to_string(),
    })
  }
}

/// Resolve a PostgREST-style column list (`*` or `a,b,c`) against `table`.
fn select_list(table: Table, columns: &str) -> Result<String> {
  let columns = columns.trim();
  if columns == "*" {
    return Ok(all_columns(table).join(", "));
  }
  let names: Vec<&str> = columns.split(',').map(str::trim).collect();
  for name in &names {
    check_column(table, name, all_columns(table))?;
  }
  Ok(names.join(", "))
}

/// One prepared `INSERT` per row: the SQL text and its bound values.
fn insert_statement(
  table: Table,
  row: &Map<String, Value>,
  created_at: &str,
) -> Result<(String, Vec<rusqlite::types::Value>)> {
  let mut columns = Vec::with_capacity(row.len() + 1);
  let mut values = Vec::with_capacity(row.len() + 1);
  for (column, value) in row {
    check_column(table, column, writable_columns(table))?;
    columns.push(column.as_str());
    values.push(json_to_sql(value)?);
  }
  columns.push("created_at");
  values.push(rusqlite::types::Value::Text(created_at.to_string()));

  let placeholders = (1..=values.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  let sql = format!(
    "INSERT INTO {} ({}) VALUES ({placeholders})",
    table.name(),
    columns.join(", ")
  );
  Ok((sql, values))
}

// ─── Backend impl ────────────────────────────────────────────────────────────

impl Backend for SqliteStore {
  type Error = Error;

  async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<()> {
    let created_at = encode_dt(Utc::now());
    let statements = rows
      .iter()
      .map(|row| match row {
        Value::Object(map) => insert_statement(table, map, &created_at),
        _ => Err(Error::InvalidRow),
      })
      .collect::<Result<Vec<_>>>()?;

    let count = statements.len();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for (sql, values) in &statements {
          tx.execute(sql, rusqlite::params_from_iter(values))?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    tracing::debug!(table = %table, count, "inserted rows");
    Ok(())
  }

  async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>> {
    let table = query.table;
    let mut sql = format!(
      "SELECT {} FROM {}",
      select_list(table, &query.columns)?,
      table.name()
    );
    if let Some(order) = &query.order_by {
      check_column(table, &order.column, all_columns(table))?;
      let dir = if order.ascending { "ASC" } else { "DESC" };
      // Rows inserted in the same microsecond fall back to insertion order.
      sql.push_str(&format!(" ORDER BY {} {dir}, id {dir}", order.column));
    }

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let names: Vec<String> =
          stmt.column_names().into_iter().map(str::to_owned).collect();
        let rows = stmt
          .query_map([], |r| {
            let mut object = Map::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
              object.insert(name.clone(), sql_to_json(r.get_ref(i)?));
            }
            Ok(Value::Object(object))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn upload_blob(&self, bucket: &str, key: &str, blob: Blob) -> Result<()> {
    let hash = hex::encode(Sha256::digest(&blob.bytes));
    let created_at = encode_dt(Utc::now());
    let size = blob.bytes.len();
    let (b, k) = (bucket.to_owned(), key.to_owned());

    let inserted = self
      .conn
      .call(move |conn| {
        let outcome = conn.execute(
          "INSERT INTO blobs (bucket, key, content_type, content_hash, data, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![b, k, blob.content_type, hash, blob.bytes.as_ref(), created_at],
        );
        match outcome {
          Ok(_) => Ok(true),
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
          {
            Ok(false)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(Error::BlobExists {
        bucket: bucket.to_owned(),
        key:    key.to_owned(),
      });
    }
    tracing::debug!(%bucket, %key, size, "stored blob");
    Ok(())
  }

  /// Segments are percent-encoded, so keys holding `#` or `?` still resolve.
  fn public_url(&self, bucket: &str, key: &str) -> String {
    let mut url = self.public_base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(["files", bucket, key]);
    }
    url.into()
  }
}
