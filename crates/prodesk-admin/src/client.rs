//! Async HTTP client wrapping the site's admin JSON API.

use anyhow::{Context, Result, anyhow};
use prodesk_core::record::{Record, Table};
use reqwest::Client;
use std::time::Duration;

/// Connection settings for the admin API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// `GET /api/{table}`: every row, newest first.
  pub async fn fetch(&self, table: Table) -> Result<Vec<Record>> {
    let path = format!("/{}", table.name());
    let resp = self
      .auth(self.client.get(self.url(&path)))
      .send()
      .await
      .with_context(|| format!("GET /api{path} failed"))?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(if body.trim().is_empty() {
        anyhow!("GET /api{path} → {status}")
      } else {
        anyhow!("GET /api{path} → {status}: {}", body.trim())
      });
    }

    let rows: Vec<serde_json::Value> = resp
      .json()
      .await
      .with_context(|| format!("deserialising {}", table.name()))?;
    table
      .decode_rows(rows)
      .with_context(|| format!("decoding {} rows", table.name()))
  }
}
