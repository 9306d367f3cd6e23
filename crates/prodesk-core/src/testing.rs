//! An in-memory [`Backend`] that records every call, for flow tests.

use std::sync::Mutex;

use serde_json::Value;

use crate::{
  record::Table,
  store::{Backend, Blob, SelectQuery},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
  Insert {
    table: Table,
    rows:  Vec<Value>,
  },
  Select(SelectQuery),
  Upload {
    bucket:       String,
    key:          String,
    content_type: String,
  },
  PublicUrl {
    bucket: String,
    key:    String,
  },
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(pub String);

#[derive(Default)]
pub struct RecordingBackend {
  calls:         Mutex<Vec<Call>>,
  blobs:         Mutex<Vec<String>>,
  rows:          Mutex<Vec<(Table, Value)>>,
  upload_error:  Option<String>,
  insert_error:  Option<String>,
  select_error:  Option<String>,
}

impl RecordingBackend {
  pub fn fail_upload(mut self, message: &str) -> Self {
    self.upload_error = Some(message.to_string());
    self
  }

  pub fn fail_insert(mut self, message: &str) -> Self {
    self.insert_error = Some(message.to_string());
    self
  }

  pub fn fail_select(mut self, message: &str) -> Self {
    self.select_error = Some(message.to_string());
    self
  }

  /// Seed a row without recording a call.
  pub fn with_row(self, table: Table, row: Value) -> Self {
    self.rows.lock().unwrap().push((table, row));
    self
  }

  pub fn calls(&self) -> Vec<Call> { self.calls.lock().unwrap().clone() }

  pub fn blob_keys(&self) -> Vec<String> { self.blobs.lock().unwrap().clone() }

  fn record(&self, call: Call) { self.calls.lock().unwrap().push(call); }
}

impl Backend for RecordingBackend {
  type Error = FakeError;

  async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<(), FakeError> {
    self.record(Call::Insert {
      table,
      rows: rows.clone(),
    });
    if let Some(message) = &self.insert_error {
      return Err(FakeError(message.clone()));
    }
    let mut stored = self.rows.lock().unwrap();
    stored.extend(rows.into_iter().map(|row| (table, row)));
    Ok(())
  }

  async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, FakeError> {
    self.record(Call::Select(query.clone()));
    if let Some(message) = &self.select_error {
      return Err(FakeError(message.clone()));
    }
    let mut rows: Vec<Value> = self
      .rows
      .lock()
      .unwrap()
      .iter()
      .filter(|(table, _)| *table == query.table)
      .map(|(_, row)| row.clone())
      .collect();
    if let Some(order) = &query.order_by {
      rows.sort_by(|a, b| {
        let a = a[&order.column].as_str().unwrap_or_default();
        let b = b[&order.column].as_str().unwrap_or_default();
        if order.ascending { a.cmp(b) } else { b.cmp(a) }
      });
    }
    Ok(rows)
  }

  async fn upload_blob(
    &self,
    bucket: &str,
    key: &str,
    blob: Blob,
  ) -> Result<(), FakeError> {
    self.record(Call::Upload {
      bucket:       bucket.to_string(),
      key:          key.to_string(),
      content_type: blob.content_type,
    });
    if let Some(message) = &self.upload_error {
      return Err(FakeError(message.clone()));
    }
    self.blobs.lock().unwrap().push(key.to_string());
    Ok(())
  }

  fn public_url(&self, bucket: &str, key: &str) -> String {
    self.record(Call::PublicUrl {
      bucket: bucket.to_string(),
      key:    key.to_string(),
    });
    format!("https://store.test/public/{bucket}/{key}")
  }
}
