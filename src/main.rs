//! BibleLit Core · adaptive reading quiz
//!
//! - Axum HTTP server with signed-cookie sessions
//! - SQLite storage (pooled), schema + content seeded once at startup
//! - Score-driven difficulty, badges and level progression
//!
//! Important env variables:
//!   PORT              : u16 (default 5000)
//!   DATABASE_PATH     : SQLite file (default "biblelit.db")
//!   DB_POOL_SIZE      : max pooled connections (default 4)
//!   SESSION_KEY       : base64, >= 64 bytes; ephemeral key when unset
//!   QUIZ_CONFIG_PATH  : path to TOML config (start level, progress rules, content)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod config;
mod seeds;
mod db;
mod store;
mod logic;
mod session;
mod state;
mod protocol;
mod views;
mod routes;

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Settings;
use crate::db::DbPool;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let settings = Settings::from_env();
  let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));

  // Storage failures here are fatal: nothing can be served without the tables.
  let db = DbPool::open(&settings.database_path, settings.pool_size)?;
  let state = AppState::initialize(db, settings)?;

  let app = build_router(state);

  let listener = TcpListener::bind(addr).await?;
  info!(target: "biblelit", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "biblelit", error = %e, "failed to listen for shutdown signal");
  }
  info!(target: "biblelit", "shutdown requested");
}
