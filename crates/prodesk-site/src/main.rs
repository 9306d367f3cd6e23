//! prodesk-site server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered with
//! `PRODESK_*` environment variables, opens the configured backend, and
//! serves the careers page and admin dashboard over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `admin_password_hash`:
//!
//! ```
//! cargo run -p prodesk-site -- --hash-password
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use prodesk_site::{AppState, BackendConfig, SiteConfig};
use prodesk_store_sqlite::SqliteStore;
use prodesk_supabase::{SupabaseConfig, SupabaseStore};
use rand_core::OsRng;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Prodesk careers site")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  // `PRODESK_PORT`, `PRODESK_BACKEND__KIND`, `PRODESK_BACKEND__API_KEY`, …
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("PRODESK")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let site_cfg: SiteConfig = settings
    .try_deserialize()
    .context("failed to deserialise SiteConfig")?;

  let app = match site_cfg.backend.clone() {
    BackendConfig::Sqlite { store_path } => {
      let store_path = expand_tilde(&store_path);
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?
        .with_public_base_url(&site_cfg.base_url)
        .context("invalid base_url")?;
      tracing::info!(path = ?store_path, "using sqlite backend");
      prodesk_site::sqlite_router(AppState::new(store, site_cfg.clone()))
    }
    BackendConfig::Supabase { url, api_key } => {
      tracing::info!(%url, "using supabase backend");
      let store = SupabaseStore::new(SupabaseConfig { url, api_key })
        .context("failed to build supabase client")?;
      prodesk_site::router(AppState::new(store, site_cfg.clone()))
    }
  };
  let app = app.layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", site_cfg.host, site_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
