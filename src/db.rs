//! SQLite connection pool and schema management.
//!
//! Every command opens the pool through [`connect`], which also applies any
//! pending migrations, so a fresh database file is usable straight away.

use std::{str::FromStr, time::Duration};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Tables dropped by [`reset`], children before parents.
const TABLES: [&str; 5] = [
    "todo_categories",
    "categories",
    "todos",
    "users",
    "_sqlx_migrations",
];

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite URL, e.g. `sqlite://todo.db` or `sqlite::memory:`
    pub url: String,

    pub max_connections: u32,

    /// Seconds to wait for a connection before giving up
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://todo.db".to_string(),
            max_connections: 1,
            connect_timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// A private in-memory database. It lives as long as the pool's single
    /// connection, so `max_connections` must stay at 1.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::from_url("sqlite::memory:")
    }
}

/// Opens the pool and brings the schema up to date.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    debug!(url = %config.url, max_connections = config.max_connections, "opening database");

    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    debug!("migrations applied");
    Ok(())
}

/// Drops every table, migration history included, and recreates the schema.
pub async fn reset(pool: &SqlitePool) -> Result<()> {
    warn!("dropping all tables");

    for table in TABLES {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(pool)
            .await?;
    }

    run_migrations(pool).await?;
    info!("schema recreated");
    Ok(())
}
