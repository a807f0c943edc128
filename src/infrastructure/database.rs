//! Connection pools and migrations.
//!
//! The backend is chosen from the `DATABASE_URL` scheme:
//!
//! - `postgres://` / `postgresql://` - PostgreSQL
//! - `sqlite:` - SQLite file, or `sqlite::memory:` for a private in-memory database

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{PgPool, SqlitePool};

use crate::domain::repositories::MappingRepository;
use crate::infrastructure::persistence::{PgMappingRepository, SqliteMappingRepository};

static POSTGRES_MIGRATOR: Migrator = sqlx::migrate!("./migrations/postgres");
static SQLITE_MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");

/// Pool sizing and timeouts.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// A connected pool for one of the supported backends.
#[derive(Debug, Clone)]
pub enum Database {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl Database {
    /// Connects to the database named by `database_url`.
    ///
    /// # Errors
    ///
    /// Returns an error for unsupported schemes or failed connections.
    pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<Self> {
        if is_postgres_url(database_url) {
            let pool = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .acquire_timeout(settings.connect_timeout)
                .idle_timeout(Some(settings.idle_timeout))
                .max_lifetime(Some(settings.max_lifetime))
                .connect(database_url)
                .await
                .context("Failed to connect to PostgreSQL")?;

            return Ok(Self::Postgres(pool));
        }

        if is_sqlite_url(database_url) {
            let pool = if is_in_memory_sqlite(database_url) {
                connect_sqlite_in_memory().await?
            } else {
                connect_sqlite_file(database_url, settings).await?
            };

            return Ok(Self::Sqlite(pool));
        }

        anyhow::bail!("Unsupported database URL scheme: {database_url}")
    }

    /// Applies pending migrations for the connected backend.
    pub async fn migrate(&self) -> Result<()> {
        let result = match self {
            Self::Postgres(pool) => POSTGRES_MIGRATOR.run(pool).await,
            Self::Sqlite(pool) => SQLITE_MIGRATOR.run(pool).await,
        };
        result.context("Failed to run database migrations")?;

        tracing::info!(backend = self.backend_name(), "Database migrations applied");
        Ok(())
    }

    /// Builds the mapping repository for this backend.
    pub fn mapping_repository(&self) -> Arc<dyn MappingRepository> {
        match self {
            Self::Postgres(pool) => Arc::new(PgMappingRepository::new(Arc::new(pool.clone()))),
            Self::Sqlite(pool) => Arc::new(SqliteMappingRepository::new(Arc::new(pool.clone()))),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Sqlite(_) => "sqlite",
        }
    }
}

pub fn is_postgres_url(url: &str) -> bool {
    url.starts_with("postgres://") || url.starts_with("postgresql://")
}

pub fn is_sqlite_url(url: &str) -> bool {
    url.starts_with("sqlite:")
}

fn is_in_memory_sqlite(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Opens a private in-memory SQLite database with the schema applied.
///
/// The pool holds exactly one connection that never expires: every new
/// connection to `:memory:` would see an empty database.
pub async fn connect_sqlite_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .context("Invalid in-memory SQLite options")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("Failed to open in-memory SQLite database")?;

    SQLITE_MIGRATOR
        .run(&pool)
        .await
        .context("Failed to migrate in-memory SQLite database")?;

    Ok(pool)
}

async fn connect_sqlite_file(database_url: &str, settings: PoolSettings) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid SQLite URL: {database_url}"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.connect_timeout)
        .idle_timeout(Some(settings.idle_timeout))
        .max_lifetime(Some(settings.max_lifetime))
        .connect_with(options)
        .await
        .context("Failed to open SQLite database")
}
