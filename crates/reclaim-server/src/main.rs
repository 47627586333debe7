//! Reclaim server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the board API under `/api` with
//! uploaded photos under `/uploads`.
//!
//! # Password hash generation
//!
//! To generate an argon2 PHC string for seeding accounts by hand:
//!
//! ```
//! cargo run -p reclaim-server --bin server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{Router, routing::get};
use clap::Parser;
use rand_core::OsRng;
use reclaim_api::{AppState, LocalMediaStore};
use reclaim_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Reclaim lost-and-found server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

/// Deserialised from `config.toml`, overridable via `RECLAIM_*` env vars.
#[derive(Clone, Debug, Deserialize)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:        String,
  #[serde(default = "default_port")]
  port:        u16,
  #[serde(default = "default_store_path")]
  store_path:  PathBuf,
  #[serde(default = "default_uploads_dir")]
  uploads_dir: PathBuf,
}

fn default_host() -> String {
  "0.0.0.0".to_string()
}
fn default_port() -> u16 {
  8080
}
fn default_store_path() -> PathBuf {
  PathBuf::from("reclaim.db")
}
fn default_uploads_dir() -> PathBuf {
  PathBuf::from("uploads")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("RECLAIM"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in filesystem paths.
  let store_path = expand_tilde(&server_cfg.store_path);
  let uploads_dir = expand_tilde(&server_cfg.uploads_dir);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let state = AppState {
    store: Arc::new(store),
    media: Arc::new(LocalMediaStore::new(uploads_dir.clone(), "/uploads")),
  };

  let app = Router::new()
    .route("/", get(|| async { "reclaim API running" }))
    .nest("/api", reclaim_api::api_router(state))
    .nest_service("/uploads", ServeDir::new(uploads_dir))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
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
