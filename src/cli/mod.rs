//! CLI module for the account directory
//!
//! Provides subcommands:
//! - `serve`: run the HTTP API (default)
//! - `migrate`: apply or revert PostgreSQL migrations

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Account directory - registration, login and account lifecycle over HTTP
#[derive(Parser)]
#[command(name = "account-directory")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server (default)
    Serve,

    /// Apply or revert PostgreSQL migrations
    Migrate(migrate::MigrateArgs),
}

/// Load `.env`, configuration and logging shared by every subcommand
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
