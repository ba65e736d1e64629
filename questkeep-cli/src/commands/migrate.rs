//! Schema bootstrap command

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use questkeep_server::db::{create_pool, migrations};

use crate::config::{Overrides, Settings};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config file and environment)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Create any missing tables, indexes and enum values
pub async fn run_migrate(args: MigrateArgs, config_path: Option<&Path>) -> Result<()> {
    let settings = Settings::load(
        config_path,
        Overrides {
            database_url: args.database_url,
            ..Overrides::default()
        },
    )
    .context("Failed to load configuration")?;

    let pool = create_pool(settings.require_database_url()?)
        .await
        .context("Failed to create database pool")?;
    migrations::run(&pool)
        .await
        .context("Failed to bootstrap database schema")?;

    tracing::info!("Database schema is up to date");
    Ok(())
}
