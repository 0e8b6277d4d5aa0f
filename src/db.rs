//! SQLite connection pool, schema migration and idempotent content seeding.
//!
//! Connections are checked out per unit of work and returned to the pool when
//! the guard drops, on success or failure alike.

use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection};
use tracing::{debug, info, instrument};

use crate::domain::ContentItem;
use crate::error::AppError;

pub type DbConn = PooledConnection<SqliteConnectionManager>;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
  id       INTEGER PRIMARY KEY,
  username TEXT NOT NULL UNIQUE,
  level    INTEGER NOT NULL,
  score    INTEGER NOT NULL,
  badges   TEXT NOT NULL DEFAULT ''
);
CREATE TABLE IF NOT EXISTS content (
  id          INTEGER PRIMARY KEY,
  level       INTEGER NOT NULL,
  area        TEXT NOT NULL,
  question    TEXT NOT NULL,
  options     TEXT NOT NULL,
  answer      TEXT NOT NULL,
  hint        TEXT NOT NULL,
  instruction TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS content_level_area ON content (level, area);
";

#[derive(Clone)]
pub struct DbPool {
  inner: Pool<SqliteConnectionManager>,
}

impl DbPool {
  /// Open (or create) a database file with up to `max_size` connections.
  pub fn open(path: &str, max_size: u32) -> Result<Self, AppError> {
    let manager = SqliteConnectionManager::file(path)
      .with_init(|c| c.execute_batch("PRAGMA busy_timeout = 5000;"));
    let inner = Pool::builder()
      .max_size(max_size)
      .connection_timeout(Duration::from_secs(30))
      .build(manager)?;
    info!(target: "biblelit", %path, max_size, "SQLite pool ready");
    Ok(Self { inner })
  }

  /// Single-connection in-memory database that lives as long as the pool.
  pub fn in_memory() -> Result<Self, AppError> {
    let inner = Pool::builder()
      .max_size(1)
      .max_lifetime(None)
      .idle_timeout(None)
      .build(SqliteConnectionManager::memory())?;
    Ok(Self { inner })
  }

  pub fn get(&self) -> Result<DbConn, AppError> {
    Ok(self.inner.get()?)
  }
}

/// Create tables if absent. Safe to run on every start.
#[instrument(level = "debug", skip_all)]
pub fn migrate(conn: &Connection) -> Result<(), AppError> {
  conn.execute_batch(SCHEMA)?;
  debug!(target: "biblelit", "schema migrated");
  Ok(())
}

/// Insert items whose id is not present yet. Existing rows are left untouched.
/// Returns how many rows were inserted.
#[instrument(level = "debug", skip_all, fields(items = items.len()))]
pub fn seed_content(conn: &mut Connection, items: &[ContentItem]) -> Result<usize, AppError> {
  let tx = conn.transaction()?;
  let mut inserted = 0;
  {
    let mut stmt = tx.prepare(
      "INSERT OR IGNORE INTO content (id, level, area, question, options, answer, hint, instruction)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    for it in items {
      let options = serde_json::to_string(&it.options)?;
      inserted += stmt.execute(params![
        it.id,
        it.level,
        it.area,
        it.question,
        options,
        it.answer,
        it.hint,
        it.instruction,
      ])?;
    }
  }
  tx.commit()?;
  info!(target: "biblelit", offered = items.len(), inserted, "content seeded");
  Ok(inserted)
}
