//! Error type for `prodesk-supabase`.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid project url {url:?}: {reason}")]
  InvalidUrl { url: String, reason: String },

  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  /// The service answered with a non-success status. `message` is the
  /// service's own explanation and is what users get to see.
  #[error("{message}")]
  Api { status: u16, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error body shapes returned by PostgREST and Storage.
#[derive(Deserialize)]
struct ErrorBody {
  message: Option<String>,
  error:   Option<String>,
  msg:     Option<String>,
}

impl Error {
  /// Build an [`Error::Api`] from a failed response, preferring the
  /// `message` field of a JSON body over the raw text.
  pub(crate) async fn from_response(resp: reqwest::Response) -> Self {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
      .ok()
      .and_then(|body| body.message.or(body.error).or(body.msg))
      .filter(|m| !m.is_empty())
      .unwrap_or_else(|| {
        if text.trim().is_empty() {
          status.to_string()
        } else {
          text.trim().to_string()
        }
      });
    Self::Api {
      status: status.as_u16(),
      message,
    }
  }
}
