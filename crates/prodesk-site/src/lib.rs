//! HTTP surface for Prodesk careers and applicant review.
//!
//! Exposes an axum [`Router`] serving the public careers page, the
//! Basic-auth admin dashboard and its JSON API, backed by any [`Backend`].

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  response::Redirect,
  routing::get,
};
use prodesk_core::{
  store::Backend,
  submission::{DEFAULT_MAX_RESUME_BYTES, DEFAULT_RESUME_BUCKET, SubmissionConfig},
};
use prodesk_store_sqlite::SqliteStore;
use serde::Deserialize;

use auth::AuthConfig;
use handlers::{admin, api, careers, files};

/// Room for the text fields and multipart framing around the resume.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime site configuration, deserialised from `config.toml` and
/// `PRODESK_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct SiteConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  /// Public origin of this site; SQLite blob URLs are built on it.
  pub base_url:            String,
  pub admin_username:      String,
  pub admin_password_hash: String,
  #[serde(default = "default_bucket")]
  pub resume_bucket:       String,
  #[serde(default = "default_max_upload")]
  pub max_upload_bytes:    usize,
  pub backend:             BackendConfig,
}

/// Which store backs the site.
#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
  Sqlite { store_path: PathBuf },
  Supabase { url: String, api_key: String },
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_bucket() -> String { DEFAULT_RESUME_BUCKET.to_string() }
fn default_max_upload() -> usize { DEFAULT_MAX_RESUME_BYTES }

impl SiteConfig {
  pub fn submission(&self) -> SubmissionConfig {
    SubmissionConfig {
      bucket:           self.resume_bucket.clone(),
      max_resume_bytes: self.max_upload_bytes,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: Backend> {
  pub store:  Arc<S>,
  pub config: Arc<SiteConfig>,
  pub auth:   Arc<AuthConfig>,
}

impl<S: Backend> AppState<S> {
  pub fn new(store: S, config: SiteConfig) -> Self {
    Self {
      store:  Arc::new(store),
      auth:   Arc::new(AuthConfig {
        username:      config.admin_username.clone(),
        password_hash: config.admin_password_hash.clone(),
      }),
      config: Arc::new(config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the site [`Router`] for any backend.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: Backend + Clone + 'static,
{
  let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;
  Router::new()
    .route("/",             get(|| async { Redirect::to("/careers") }))
    .route("/careers",      get(careers::show).post(careers::submit::<S>))
    .route("/admin",        get(admin::dashboard::<S>))
    .route("/api/{table}",  get(api::list::<S>))
    .layer(DefaultBodyLimit::max(body_limit))
    .with_state(state)
}

/// [`router`] plus the `/files/` route that serves blobs kept in SQLite.
pub fn sqlite_router(state: AppState<SqliteStore>) -> Router {
  let files = Router::new()
    .route("/files/{bucket}/{*key}", get(files::serve))
    .with_state(state.clone());
  router(state).merge(files)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use prodesk_core::record::Table;

  const BOUNDARY: &str = "prodesk-test-boundary";

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory()
      .await
      .unwrap()
      .with_public_base_url("http://localhost:8080")
      .unwrap();
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState::new(store, SiteConfig {
      host:                "127.0.0.1".to_string(),
      port:                8080,
      base_url:            "http://localhost:8080".to_string(),
      admin_username:      "hr".to_string(),
      admin_password_hash: hash,
      resume_bucket:       "resumes".to_string(),
      max_upload_bytes:    1024,
      backend:             BackendConfig::Sqlite {
        store_path: PathBuf::from(":memory:"),
      },
    })
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  /// A `multipart/form-data` body with text fields and an optional `cv`
  /// file part `(file name, content type, bytes)`.
  fn multipart(fields: &[(&str, &str)], cv: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
      body.extend_from_slice(
        format!(
          "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .as_bytes(),
      );
    }
    if let Some((file_name, content_type, bytes)) = cv {
      body.extend_from_slice(
        format!(
          "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"cv\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
      );
      body.extend_from_slice(bytes);
      body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
  }

  fn jane() -> Vec<(&'static str, &'static str)> {
    vec![
      ("name", "Jane Doe"),
      ("email", "jane@x.com"),
      ("phone", "+1 555-123-4567"),
      ("position", "Software Engineer"),
      ("linkedin", ""),
    ]
  }

  async fn post_form(state: AppState<SqliteStore>, body: Vec<u8>) -> axum::response::Response {
    let req = Request::builder()
      .method("POST")
      .uri("/careers")
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
      )
      .body(Body::from(body))
      .unwrap();
    sqlite_router(state).oneshot(req).await.unwrap()
  }

  async fn get(
    state:   AppState<SqliteStore>,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::empty()).unwrap();
    sqlite_router(state).oneshot(req).await.unwrap()
  }

  async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  async fn applicants(state: &AppState<SqliteStore>) -> Vec<Value> {
    let auth = auth_header("hr", "secret");
    let resp = get(state.clone(), "/api/applicants", vec![
      (header::AUTHORIZATION, auth.as_str()),
    ])
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    serde_json::from_str(&body_text(resp).await).unwrap()
  }

  // ── Careers ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn root_redirects_to_careers() {
    let state = make_state("secret").await;
    let resp  = get(state, "/", vec![]).await;
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers()[header::LOCATION], "/careers");
  }

  #[tokio::test]
  async fn careers_page_lists_positions() {
    let state = make_state("secret").await;
    let resp  = get(state, "/careers", vec![]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Submit Application"));
    for position in ["Software Engineer", "Mobile Developer", "Data Scientist", "Business Development", "Internship"] {
      assert!(html.contains(position), "missing {position}");
    }
  }

  #[tokio::test]
  async fn submit_button_goes_busy_on_submit() {
    let state = make_state("secret").await;
    let html  = body_text(get(state, "/careers", vec![]).await).await;
    assert!(html.contains("onsubmit="));
    assert!(html.contains("b.disabled = true"));
    assert!(html.contains("Submitting..."));
  }

  #[tokio::test]
  async fn valid_application_is_stored_and_downloadable() {
    let state = make_state("secret").await;
    let body  = multipart(&jane(), Some(("cv.pdf", "application/pdf", b"%PDF-1.7")));
    let resp  = post_form(state.clone(), body).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Application Received!"));

    let rows = applicants(&state).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], json!("Jane Doe"));
    assert_eq!(rows[0]["position"], json!("Software Engineer"));
    assert_eq!(rows[0]["linkedin"], Value::Null);

    let cv_url = rows[0]["cv_url"].as_str().unwrap();
    let path = cv_url.strip_prefix("http://localhost:8080").unwrap();
    assert!(path.starts_with("/files/resumes/"), "{path}");
    assert!(path.ends_with("_Jane_Doe.pdf"), "{path}");

    let resp = get(state.clone(), path, vec![]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
    let etag = resp.headers()[header::ETAG].to_str().unwrap().to_string();
    assert_eq!(body_text(resp).await, "%PDF-1.7");

    let resp = get(state, path, vec![(header::IF_NONE_MATCH, etag.as_str())]).await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
  }

  #[tokio::test]
  async fn resume_url_survives_reserved_characters_in_name() {
    let state = make_state("secret").await;
    let mut fields = jane();
    fields[0] = ("name", "Jane #1?");
    let body = multipart(&fields, Some(("cv.pdf", "application/pdf", b"%PDF-1.7")));
    let resp = post_form(state.clone(), body).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let rows = applicants(&state).await;
    let cv_url = rows[0]["cv_url"].as_str().unwrap();
    let path = cv_url.strip_prefix("http://localhost:8080").unwrap();
    assert!(path.ends_with("_Jane_%231%3F.pdf"), "{path}");

    let resp = get(state, path, vec![]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "%PDF-1.7");
  }

  #[tokio::test]
  async fn invalid_phone_rerenders_with_values() {
    let state = make_state("secret").await;
    let mut fields = jane();
    fields[2] = ("phone", "12345");
    let body = multipart(&fields, Some(("cv.pdf", "application/pdf", b"%PDF")));

    let resp = post_form(state.clone(), body).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(resp).await;
    assert!(html.contains("Please enter a valid phone number (at least 10 digits)."));
    assert!(html.contains("value=\"Jane Doe\""));
    assert!(applicants(&state).await.is_empty());
  }

  #[tokio::test]
  async fn empty_file_part_counts_as_missing() {
    let state = make_state("secret").await;
    let body  = multipart(&jane(), Some(("", "application/octet-stream", b"")));
    let resp  = post_form(state.clone(), body).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("Please upload your CV"));
    assert!(applicants(&state).await.is_empty());
  }

  #[tokio::test]
  async fn oversized_resume_is_rejected() {
    let state = make_state("secret").await;
    let big   = vec![b'x'; 2048];
    let body  = multipart(&jane(), Some(("cv.pdf", "application/pdf", &big)));
    let resp  = post_form(state.clone(), body).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(applicants(&state).await.is_empty());
  }

  #[tokio::test]
  async fn unsupported_extension_is_rejected() {
    let state = make_state("secret").await;
    let body  = multipart(&jane(), Some(("cv.txt", "text/plain", b"hello")));
    let resp  = post_form(state, body).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  }

  // ── Admin ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_requires_auth() {
    let state = make_state("secret").await;
    let resp  = get(state, "/admin", vec![]).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn api_requires_auth() {
    let state = make_state("secret").await;
    let auth  = auth_header("hr", "nope");
    let resp  = get(state, "/api/contacts", vec![(header::AUTHORIZATION, auth.as_str())]).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn empty_inquiries_tab() {
    let state = make_state("secret").await;
    let auth  = auth_header("hr", "secret");
    let resp  = get(state, "/admin?tab=contacts", vec![(header::AUTHORIZATION, auth.as_str())]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("No Records Found"));
    assert!(html.contains("Inquiries"));
  }

  #[tokio::test]
  async fn inquiries_render_messages() {
    let state = make_state("secret").await;
    state
      .store
      .insert(Table::Contacts, vec![json!({
        "name": "Ada", "email": "ada@x.com", "phone": "0123456789",
        "message": "Do you hire remotely?",
      })])
      .await
      .unwrap();

    let auth = auth_header("hr", "secret");
    let resp = get(state, "/admin?tab=contacts&layout=cards", vec![
      (header::AUTHORIZATION, auth.as_str()),
      (header::ACCEPT_LANGUAGE, "de-DE,de;q=0.9"),
    ])
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Do you hire remotely?"));
    assert!(!html.contains("<table"));
  }

  #[tokio::test]
  async fn applicants_table_links_resume() {
    let state = make_state("secret").await;
    let body  = multipart(&jane(), Some(("cv.docx", "application/octet-stream", b"PK")));
    assert_eq!(post_form(state.clone(), body).await.status(), StatusCode::OK);

    let auth = auth_header("hr", "secret");
    let resp = get(state, "/admin?layout=table", vec![(header::AUTHORIZATION, auth.as_str())]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("<table"));
    assert!(html.contains("Download Resume"));
    assert!(html.contains("Jane Doe"));
  }

  #[tokio::test]
  async fn unknown_api_table_is_404() {
    let state = make_state("secret").await;
    let auth  = auth_header("hr", "secret");
    let resp  = get(state, "/api/users", vec![(header::AUTHORIZATION, auth.as_str())]).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn missing_blob_is_404() {
    let state = make_state("secret").await;
    let resp  = get(state, "/files/resumes/nope.pdf", vec![]).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
