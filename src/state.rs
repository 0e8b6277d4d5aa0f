//! Application state: connection pool, session signing key and quiz settings.
//!
//! Storage work is blocking, so `with_conn` moves each unit of work onto the
//! blocking pool and checks a connection out for exactly that closure.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use tracing::{info, instrument};

use crate::config::Settings;
use crate::db::{migrate, seed_content, DbPool};
use crate::error::AppError;
use crate::session::signing_key;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub key: Key,
    pub settings: Arc<Settings>,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

impl AppState {
    /// Migrate the schema, seed content once, and assemble shared state.
    #[instrument(level = "info", skip_all)]
    pub fn initialize(db: DbPool, settings: Settings) -> Result<Self, AppError> {
        {
            let mut conn = db.get()?;
            migrate(&conn)?;
            let inserted = seed_content(&mut conn, &settings.content)?;
            info!(target: "biblelit", inserted, offered = settings.content.len(), start_level = settings.start_level, "Startup content inventory");
        }
        let key = signing_key(settings.session_key.as_deref());
        Ok(Self {
            db,
            key,
            settings: Arc::new(settings),
        })
    }

    /// Run `f` with a pooled connection on the blocking thread pool.
    pub async fn with_conn<T, F>(&self, f: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, AppError> + Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = db.get()?;
            f(&mut *conn)
        })
        .await?
    }
}
