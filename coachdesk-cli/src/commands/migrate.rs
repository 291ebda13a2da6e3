//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use coachdesk_server::db::{connect, PoolSettings};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}

/// Apply the schema and exit
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = connect(&args.database_url, &PoolSettings::for_migrations())
        .await
        .context("Failed to apply database schema")?;

    tracing::info!("Database schema is up to date");
    pool.close().await;
    Ok(())
}
