//! Vizdash server binary
//!
//! Serves the dashboard API over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;
use vizdash_server::{config::DashboardConfig, init_tracing, start_server};

#[derive(Parser)]
#[command(name = "vizdash-server")]
#[command(about = "Data visualization dashboard API server", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, env = "VIZDASH_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, defaulted) = match &cli.config {
        Some(path) => {
            let config = DashboardConfig::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?;
            (config, false)
        }
        None => (DashboardConfig::default_local_config(), true),
    };

    init_tracing(&config.log_filter);
    if defaulted {
        warn!("No config file specified, using local defaults");
    }

    start_server(config).await?;
    Ok(())
}
