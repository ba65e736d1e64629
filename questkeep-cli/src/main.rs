//! questkeep CLI - serves the quest and game-profile API
//!
//! - `serve`: run the HTTP API (PostgreSQL or `--in-memory`)
//! - `migrate`: bootstrap the database schema and exit

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "questkeep",
    author,
    version,
    about = "REST backend for users, avatars, items and quests"
)]
struct Cli {
    /// Default log level to debug (RUST_LOG overrides)
    #[arg(long, global = true)]
    debug: bool,

    /// TOML config file with [server] and [database] sections
    #[arg(long, short = 'c', global = true, env = "QUESTKEEP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create or upgrade the database schema, then exit
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may already be set.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config_path).await?,
        Commands::Migrate(args) => commands::run_migrate(args, config_path).await?,
    }

    Ok(())
}
