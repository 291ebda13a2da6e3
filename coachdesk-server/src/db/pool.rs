//! Opening the coachdesk database
//!
//! `serve` and `migrate` both go through [`connect`], which sizes the pool
//! and brings the coaching schema up to date before handing the pool out.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::migrations;

/// Pool size used when nothing else is configured.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How a database connection is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Create missing tables and indexes after connecting.
    pub run_migrations: bool,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            run_migrations: true,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

impl PoolSettings {
    /// Settings for a one-shot schema run: a single connection is enough.
    pub fn for_migrations() -> Self {
        Self {
            max_connections: 1,
            ..Self::default()
        }
    }
}

/// Connect to Postgres and, unless disabled, create the coaching tables.
///
/// ```ignore
/// let pool = connect(&database_url, &PoolSettings::default()).await?;
/// let store = PgStore::new(pool);
/// ```
pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(
        max_connections = settings.max_connections,
        run_migrations = settings.run_migrations,
        "connecting to postgres"
    );

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections.max(1))
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await?;

    if settings.run_migrations {
        migrations::run(&pool).await?;
    } else {
        tracing::info!("skipping schema migrations");
    }

    Ok(pool)
}
