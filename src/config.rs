use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "feedboard")]
#[command(about = "Collect, triage and track product feedback across projects")]
pub struct Cli {
    /// SQLite database file; created and migrated on first use
    #[arg(long, env = "FEEDBOARD_DATABASE", value_name = "PATH", default_value = "feedboard.db")]
    pub database: PathBuf,

    /// Log filter, e.g. `info` or `feedboard=debug,sqlx=warn`
    #[arg(long, env = "FEEDBOARD_LOG", value_name = "FILTER", default_value = "info")]
    pub log_level: String,
}

/// Installs the global `fmt` subscriber filtered by `filter`.
pub fn init_tracing(filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| anyhow::anyhow!("Invalid log filter {:?}: {}", filter, e))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
}
