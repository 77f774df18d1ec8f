//! FlavorForge health service CLI

use std::path::PathBuf;

use clap::Parser;
use flavorforge_health::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "flavorforge-health")]
#[command(about = "Liveness and status endpoint for the FlavorForge backend")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, port={:?}, log_level={:?}",
        args.config,
        args.port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!(
        "Starting health service (version {}, manifest check: {})",
        config.health.version,
        config.health.manifest_url.as_deref().unwrap_or("disabled")
    );

    flavorforge_health::run(config).await?;

    Ok(())
}
