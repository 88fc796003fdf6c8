//! GSO carrier command-line client.
//!
//! Run with: `gso-carrier --config gso.yaml rates --origin 90210 --destination 94105 --weight 2.5`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gso_carrier::{GsoCarrier, GsoConfig, Package};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Golden State Overnight rate and tracking lookups.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long, default_value = "gso.yaml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quote every GSO service for a set of packages
    Rates {
        /// Origin postal code
        #[arg(long)]
        origin: String,

        /// Destination postal code
        #[arg(long)]
        destination: String,

        /// Package weight in pounds (repeat for multiple packages)
        #[arg(short, long = "weight", required = true)]
        weights: Vec<f64>,
    },
    /// Show the tracking history of a shipment
    Track {
        /// GSO tracking number
        tracking_number: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = args.log_level.parse().unwrap_or(Level::WARN);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    // Load configuration
    let config: GsoConfig = if args.config.exists() {
        let content = tokio::fs::read_to_string(&args.config)
            .await
            .context("Failed to read config file")?;
        serde_yaml::from_str(&content).context("Failed to parse config file")?
    } else {
        info!("Config file not found, using defaults");
        GsoConfig::default()
    };

    info!(endpoint = %config.endpoint, timeout_secs = config.timeout_secs, "Configuration loaded");

    let carrier = GsoCarrier::from_config(config).context("Failed to create carrier")?;

    let output = match args.command {
        Command::Rates {
            origin,
            destination,
            weights,
        } => {
            let packages: Vec<Package> = weights.into_iter().map(Package::new).collect();
            let rates = carrier
                .find_rates(origin, destination, &packages)
                .await
                .context("Rate lookup failed")?;
            serde_json::to_string_pretty(&rates)?
        }
        Command::Track { tracking_number } => {
            let tracking = carrier
                .find_tracking_info(&tracking_number)
                .await
                .context("Tracking lookup failed")?;
            serde_json::to_string_pretty(&tracking)?
        }
    };

    println!("{output}");
    Ok(())
}
