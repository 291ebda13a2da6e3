//! coachdesk CLI - runs the coaching team API
//!
//! Subcommands:
//! - `serve`: HTTP API backed by PostgreSQL (or memory with `--in-memory`)
//! - `migrate`: apply the database schema and exit

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "coachdesk",
    author,
    version,
    about = "Team members, teams and feedback for coaching staff"
)]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Apply the database schema and exit
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let _telemetry = tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .map_err(|err| eprintln!("logging disabled: {err:#}"))
    .ok();

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::Migrate(args) => commands::run_migrate(args).await,
    };

    result
}
