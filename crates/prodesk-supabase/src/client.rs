//! [`SupabaseStore`]: reqwest client for the REST and Storage endpoints.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;

use prodesk_core::{
  record::Table,
  store::{Backend, Blob, SelectQuery},
};

use crate::{Error, Result};

/// Connection settings for a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
  /// Project origin, e.g. `https://abcd.supabase.co`.
  pub url:     String,
  /// The anon (public) key. Sent as both `apikey` and bearer token.
  pub api_key: String,
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SupabaseStore {
  client:  Client,
  base:    Url,
  api_key: String,
}

impl SupabaseStore {
  pub fn new(config: SupabaseConfig) -> Result<Self> {
    let base = Url::parse(config.url.trim_end_matches('/')).map_err(|e| {
      Error::InvalidUrl {
        url:    config.url.clone(),
        reason: e.to_string(),
      }
    })?;
    if base.cannot_be_a_base() {
      return Err(Error::InvalidUrl {
        url:    config.url,
        reason: "not a base url".into(),
      });
    }
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      client,
      base,
      api_key: config.api_key,
    })
  }

  /// `base` joined with percent-encoded path segments.
  fn endpoint(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    req
      .header("apikey", &self.api_key)
      .bearer_auth(&self.api_key)
  }
}

/// PostgREST `order` parameter, e.g. `created_at.desc`.
fn order_param(query: &SelectQuery) -> Option<String> {
  query.order_by.as_ref().map(|order| {
    let dir = if order.ascending { "asc" } else { "desc" };
    format!("{}.{dir}", order.column)
  })
}

impl Backend for SupabaseStore {
  type Error = Error;

  /// `POST /rest/v1/{table}`
  async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<()> {
    let resp = self
      .auth(self.client.post(self.endpoint(&["rest", "v1", table.name()])))
      .header("Prefer", "return=minimal")
      .json(&rows)
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::from_response(resp).await);
    }
    tracing::debug!(table = %table, count = rows.len(), "inserted rows");
    Ok(())
  }

  /// `GET /rest/v1/{table}?select=…&order=…`
  async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>> {
    let mut params = vec![("select", query.columns.clone())];
    params.extend(order_param(query).map(|order| ("order", order)));

    let resp = self
      .auth(self.client.get(self.endpoint(&["rest", "v1", query.table.name()])))
      .query(&params)
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::from_response(resp).await);
    }
    Ok(resp.json().await?)
  }

  /// `POST /storage/v1/object/{bucket}/{key}`, never overwriting.
  async fn upload_blob(&self, bucket: &str, key: &str, blob: Blob) -> Result<()> {
    let size = blob.bytes.len();
    let resp = self
      .auth(
        self
          .client
          .post(self.endpoint(&["storage", "v1", "object", bucket, key])),
      )
      .header(reqwest::header::CONTENT_TYPE, blob.content_type)
      .header(reqwest::header::CACHE_CONTROL, "max-age=3600")
      .header("x-upsert", "false")
      .body(blob.bytes)
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::from_response(resp).await);
    }
    tracing::debug!(%bucket, %key, size, "uploaded blob");
    Ok(())
  }

  fn public_url(&self, bucket: &str, key: &str) -> String {
    self
      .endpoint(&["storage", "v1", "object", "public", bucket, key])
      .to_string()
  }
}
