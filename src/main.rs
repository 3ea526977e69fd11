//! Eiga API server
//!
//! Loads configuration, sets up logging and serves until SIGINT/SIGTERM.

#![allow(missing_docs)]

use clap::Parser;
use eiga_api::{Api, Config, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "eiga-api", version, about = "JSON REST API for a movie catalogue")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "EIGA_CONFIG", default_value = "config/eiga.yaml")]
    config: PathBuf,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the environment (development|staging|production)
    #[arg(short, long)]
    env: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, env = "EIGA_LOG_JSON", default_value_t = false)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .compact()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

async fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if cli.config.exists() {
        Config::from_file(&cli.config).await?
    } else {
        warn!(path = ?cli.config, "Configuration file not found, using environment only");
        Config::from_env()?
    };

    if let Some(port) = cli.port {
        config.api.server.port = port;
    }
    if let Some(env) = &cli.env {
        config.api.server.environment = env.clone();
    }
    config.validate()?;

    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Ok(path) = dotenv {
        info!(path = ?path, "Loaded environment file");
    }

    let config = match load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match Api::new(config).run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
