//! `GET /files/{bucket}/{*key}`: resume downloads for the SQLite backend.

use axum::{
  extract::{Path, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use prodesk_store_sqlite::SqliteStore;

use crate::{AppState, error::Error};

/// Strong ETag from the stored SHA-256.
fn etag(content_hash: &str) -> String { format!("\"{content_hash}\"") }

fn matches_if_none_match(headers: &HeaderMap, etag: &str) -> bool {
  headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|value| {
      value
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate == etag)
    })
}

pub async fn serve(
  State(state): State<AppState<SqliteStore>>,
  Path((bucket, key)): Path<(String, String)>,
  headers: HeaderMap,
) -> Result<Response, Error> {
  let blob = state
    .store
    .fetch_blob(&bucket, &key)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound)?;

  let etag = etag(&blob.content_hash);
  if matches_if_none_match(&headers, &etag) {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
  }

  Ok(
    (
      [
        (header::CONTENT_TYPE, blob.content_type),
        (header::ETAG, etag),
        (header::CACHE_CONTROL, "max-age=3600".to_string()),
      ],
      blob.bytes,
    )
      .into_response(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  #[test]
  fn if_none_match_lists() {
    let mut headers = HeaderMap::new();
    assert!(!matches_if_none_match(&headers, "\"abc\""));

    headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"x\", \"abc\""));
    assert!(matches_if_none_match(&headers, "\"abc\""));
    assert!(!matches_if_none_match(&headers, "\"def\""));

    headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("*"));
    assert!(matches_if_none_match(&headers, "\"def\""));
  }
}
