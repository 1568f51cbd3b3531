//! mongo-ping - check that the configured document database answers a ping.

use clap::Parser;
use netsec_probe::{ConfigOverrides, ProbeConfig, ProbeOutcome, ping, preview};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the probe.
#[derive(Parser, Debug)]
#[command(name = "mongo-ping")]
#[command(about = "Check connectivity to the netsec MongoDB deployment")]
#[command(version)]
struct Args {
    /// Connection string (overrides MONGO_DB_URL / MONGODB_URL_KEY)
    #[arg(long)]
    url: Option<String>,

    /// Database to run the ping against
    #[arg(long)]
    database: Option<String>,

    /// Connect and server selection timeout, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Configuration file (defaults to ./netsec_probe.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenvy::dotenv() {
        debug!(error = %e, "No .env file loaded");
    }

    let mut config = match &args.config {
        Some(path) => ProbeConfig::from_file(path)?,
        None => ProbeConfig::load()?,
    };
    config.apply_overrides(ConfigOverrides {
        connection_string: args.url,
        database: args.database,
        timeout_seconds: args.timeout,
    });
    debug!(?config.database, timeout_seconds = config.timeout_seconds, "Configuration loaded");

    match config.connection_string.as_deref() {
        Some(url) => println!("Testing connection with: {}", preview(url)),
        None => warn!("No connection string configured"),
    }

    let outcome = ProbeOutcome::from(ping(&config).await);
    println!("{}", outcome);

    if let ProbeOutcome::Failed(e) = &outcome {
        debug!(error = %e, "Probe failed");
    }
    Ok(ExitCode::from(outcome.exit_status()))
}
