//! SQLite connection pool wrapper.
//!
//! [`SqlitePoolManager`] creates one pool per database file; the file (and its directory) is
//! created if it does not exist.

use std::path::Path;

use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use tracing::info;

#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    pub async fn new(database_path: &str) -> Result<Self, sqlx::Error> {
        info!(database_path = %database_path, "Initializing SQLite pool");

        if let Some(dir) = Path::new(database_path).parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .create_if_missing(true)
            .filename(database_path);

        let pool = SqlitePool::connect_with(options).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
