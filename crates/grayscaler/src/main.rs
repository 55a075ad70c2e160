//! Grayscaler - HTTP service converting uploaded image pairs to grayscale.
//!
//! # Usage
//!
//! ```bash
//! # Run the service on the default port
//! grayscaler serve
//!
//! # Override the output directory
//! OUTPUT_FOLDER=/srv/static/output grayscaler serve --port 9000
//!
//! # View configuration
//! grayscaler config show
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use grayscaler_core::Config;

mod cli;
mod logging;

/// Grayscaler - converts uploaded image pairs to grayscale PNGs.
#[derive(Parser, Debug)]
#[command(name = "grayscaler")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file path (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "GRAYSCALER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve(cli::serve::ServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Grayscaler v{}", grayscaler_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, &config, config_path).await,
    }
}

/// Resolve the configuration before logging is up.
///
/// An explicitly passed file that fails to load is fatal. A missing explicit
/// file yields defaults so `config init` can create it. A broken file at the
/// default location only warns and falls back to defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    match explicit {
        Some(path) if path.exists() => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        Some(_) => Ok(Config::default()),
        None => match Config::load() {
            Ok(config) => Ok(config),
            Err(e) => {
                // Logging isn't initialized yet, so use eprintln.
                eprintln!(
                    "Warning: Failed to load config from {}: {e}\n  \
                     Using default configuration.",
                    Config::default_path().display()
                );
                Ok(Config::default())
            }
        },
    }
}
