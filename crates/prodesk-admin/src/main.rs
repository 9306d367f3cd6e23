//! `prodesk-admin`: terminal dashboard for careers applications and
//! contact inquiries.
//!
//! # Usage
//!
//! ```
//! prodesk-admin --url http://localhost:8080 --user hr --password secret
//! prodesk-admin --config ~/.config/prodesk/admin.toml
//! ```

mod app;
mod client;
mod ui;

use std::{io, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use app::{App, Control};
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use prodesk_core::{
  display::DateStyle,
  record::{Record, Table},
  review::FetchTicket,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "prodesk-admin", about = "Terminal dashboard for Prodesk applicants and inquiries")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the prodesk site (default: http://localhost:8080).
  #[arg(long, env = "PRODESK_URL")]
  url: Option<String>,

  /// Admin username.
  #[arg(long, env = "PRODESK_USER")]
  user: Option<String>,

  /// Admin password (plaintext).
  #[arg(long, env = "PRODESK_PASSWORD")]
  password: Option<String>,

  /// Tab to open on.
  #[arg(long, default_value = "applicants")]
  tab: Table,

  /// Append logs to this file. The terminal itself never receives logs.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

/// Date order from the POSIX locale variables, most specific first.
fn date_style_from_env() -> DateStyle {
  ["LC_ALL", "LC_TIME", "LANG"]
    .into_iter()
    .filter_map(|var| std::env::var(var).ok())
    .find(|value| !value.is_empty())
    .map(|value| DateStyle::from_locale(&value))
    .unwrap_or_default()
}

fn init_logging(path: &PathBuf) -> Result<()> {
  let file = std::fs::OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Arc::new(file))
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

type Completion = (FetchTicket, Result<Vec<Record>, String>);

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(path) = &args.log_file {
    init_logging(path)?;
  }

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };

  let client = Arc::new(ApiClient::new(api_config)?);
  let (mut app, first) = App::new(args.tab, date_style_from_env());
  let (tx, rx) = mpsc::unbounded_channel();
  spawn_fetch(&client, &tx, first);

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app, &client, &tx, rx).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

/// Run the fetch for `ticket` in the background; its result arrives on the
/// channel tagged with the same ticket.
fn spawn_fetch(
  client: &Arc<ApiClient>,
  tx: &mpsc::UnboundedSender<Completion>,
  ticket: FetchTicket,
) {
  let client = Arc::clone(client);
  let tx = tx.clone();
  tokio::spawn(async move {
    let result = client
      .fetch(ticket.table())
      .await
      .map_err(|e| format!("{e:#}"));
    // The receiver is gone only once the UI has exited.
    let _ = tx.send((ticket, result));
  });
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  client: &Arc<ApiClient>,
  tx: &mpsc::UnboundedSender<Completion>,
  mut rx: mpsc::UnboundedReceiver<Completion>,
) -> Result<()> {
  loop {
    while let Ok((ticket, result)) = rx.try_recv() {
      app.apply(ticket, result);
    }

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      match app.handle_key(key) {
        Control::Continue => {}
        Control::Fetch(ticket) => spawn_fetch(client, tx, ticket),
        Control::Quit => break,
      }
    }
  }

  Ok(())
}
