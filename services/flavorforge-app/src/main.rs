//! FlavorForge client CLI

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use flavorforge_app::{load_config, Config, Credentials, RunOptions, Tab};
use tracing::Level;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TabArg {
    All,
    Mine,
}

impl From<TabArg> for Tab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::All => Tab::AllRecipes,
            TabArg::Mine => Tab::MyRecipes,
        }
    }
}

#[derive(Parser)]
#[command(name = "flavorforge")]
#[command(about = "Check the FlavorForge backend, sign in and list recipes")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Manifest backend URL (overrides config file)
    #[arg(short, long)]
    backend_url: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    /// Email to sign in with
    #[arg(long, requires = "password", conflicts_with = "demo")]
    email: Option<String>,

    /// Password to sign in with
    #[arg(long, requires = "email")]
    password: Option<String>,

    /// Sign in with the demo account
    #[arg(long)]
    demo: bool,

    /// Recipe list to show
    #[arg(short, long, value_enum, default_value = "all")]
    tab: TabArg,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, backend_url={:?}, tab={:?}",
        args.config,
        args.backend_url,
        args.tab
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(backend_url) = args.backend_url {
        config.backend_url = backend_url;
    }

    let credentials = match (args.email, args.password) {
        (Some(email), Some(password)) => Some(Credentials { email, password }),
        _ if args.demo => Some(Credentials::demo()),
        _ => None,
    };

    let options = RunOptions {
        credentials,
        tab: args.tab.into(),
    };

    flavorforge_app::run(config, options).await?;

    Ok(())
}
