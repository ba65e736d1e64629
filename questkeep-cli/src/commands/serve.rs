//! HTTP server command

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use questkeep_server::db::{create_pool_with_options, migrations};
use questkeep_server::{run_server, AppState};

use crate::config::{Overrides, Settings};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:8000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config file and environment)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Serve from an in-process store instead of PostgreSQL (data is lost on exit)
    #[arg(long, conflicts_with = "database_url")]
    pub in_memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let settings = Settings::load(
        config_path,
        Overrides {
            bind: args.bind,
            database_url: args.database_url,
            cors_permissive: args.cors_permissive,
        },
    )
    .context("Failed to load configuration")?;

    let state = if args.in_memory {
        tracing::warn!("Using in-memory store; nothing will be persisted");
        AppState::in_memory()
    } else {
        let database_url = settings.require_database_url()?;
        let pool = create_pool_with_options(database_url, settings.max_connections)
            .await
            .context("Failed to create database pool")?;
        migrations::run(&pool)
            .await
            .context("Failed to bootstrap database schema")?;
        AppState::postgres(pool)
    };

    tracing::info!("Starting questkeep server on {}", settings.server.bind_addr);

    // Blocks until shutdown
    run_server(state, settings.server)
        .await
        .context("Server error")?;

    Ok(())
}
