//! HTTP server command
//!
//! Runs the coachdesk API against PostgreSQL, or against an in-memory store
//! with `--in-memory`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use coachdesk_server::db::pool::DEFAULT_MAX_CONNECTIONS;
use coachdesk_server::db::{connect, MemoryStore, PgStore, PoolSettings, Store};
use coachdesk_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "COACHDESK_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Do not apply the schema on startup
    #[arg(long)]
    pub skip_migrations: bool,

    /// Keep everything in memory instead of PostgreSQL (data is lost on exit).
    /// Any database URL is ignored.
    #[arg(long)]
    pub in_memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store = open_store(&args).await?;

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    tracing::info!("Starting coachdesk server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(store, config).await.context("Server error")?;

    Ok(())
}

async fn open_store(args: &ServeArgs) -> Result<Arc<dyn Store>> {
    if args.in_memory {
        tracing::warn!("Using in-memory store; data will not survive a restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let database_url = args
        .database_url
        .as_deref()
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

    let pool = connect(database_url, &args.pool_settings())
        .await
        .context("Failed to open database")?;

    Ok(Arc::new(PgStore::new(pool)))
}

impl ServeArgs {
    fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            run_migrations: !self.skip_migrations,
            ..PoolSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_migrations_reaches_pool_settings() {
        let args = ServeArgs::try_parse_from(["serve", "--skip-migrations", "--max-connections", "12"])
            .unwrap();
        let settings = args.pool_settings();
        assert_eq!(settings.max_connections, 12);
        assert!(!settings.run_migrations);

        let args = ServeArgs::try_parse_from(["serve"]).unwrap();
        assert!(args.pool_settings().run_migrations);
    }
}
