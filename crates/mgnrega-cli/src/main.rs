//! MGNREGA dashboard - command line front end.
//!
//! Prints three fiscal years of MGNREGA figures for one Bihar district,
//! falling back to cached snapshots when the data portal is unreachable.

mod format;
mod render;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use mgnrega_core::districts::suggest;
use mgnrega_core::{Config, Dashboard, GeocodeClient};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file prefix inside `--log-dir`
const LOG_FILE_PREFIX: &str = "mgnrega.log";

#[derive(Parser, Debug)]
#[command(name = "mgnrega", version, about = "Bihar MGNREGA district dashboard")]
struct Cli {
    /// District to show. Falls back to --lat/--lon, then the saved default.
    district: Option<String>,

    /// Latitude used to look up the district
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude used to look up the district
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Print the merged result as JSON
    #[arg(long)]
    json: bool,

    /// List districts starting with PREFIX and exit
    #[arg(long, value_name = "PREFIX")]
    suggest: Option<String>,

    /// Write logs to daily files in DIR instead of stderr
    #[arg(long, value_name = "DIR", env = "MGNREGA_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Snapshot directory
    #[arg(long, value_name = "DIR", env = "MGNREGA_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Remember the resolved district as the default
    #[arg(long)]
    save_default: bool,
}

/// Initialize the tracing subscriber. `RUST_LOG` controls the level.
fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .with(filter)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            Ok(None)
        }
    }
}

async fn resolve_district(cli: &Cli, config: &Config) -> Result<String> {
    if let Some(district) = cli.district.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        return Ok(district.to_string());
    }

    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        let geocoder = GeocodeClient::new(config.request_timeout())?;
        match geocoder.locate_district(lat, lon).await {
            Ok(Some(district)) => {
                info!(lat, lon, district, "Location resolved");
                return Ok(district.to_string());
            }
            Ok(None) => warn!(lat, lon, "Location is not in a known Bihar district"),
            Err(e) => warn!(lat, lon, "Reverse geocoding failed: {}", e),
        }
    }

    if let Some(district) = config.default_district.as_deref().filter(|d| !d.trim().is_empty()) {
        return Ok(district.trim().to_string());
    }

    bail!("No district given. Pass a district name, --lat/--lon, or save a default with --save-default")
}

/// The config as read from disk with `district` as the new default.
/// Refuses when the file could not be read, so a broken file is never
/// replaced by defaults.
fn with_default_district(file_config: Option<Config>, district: &str) -> Result<Config> {
    let Some(mut config) = file_config else {
        bail!("Config file could not be read; not overwriting it");
    };
    config.default_district = Some(district.to_string());
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.as_deref())?;

    if let Some(prefix) = cli.suggest.as_deref() {
        for name in suggest(prefix) {
            println!("{}", name);
        }
        return Ok(());
    }

    let file_config = match Config::load() {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to load config, using defaults: {:#}", e);
            None
        }
    };
    let mut config = file_config.clone().unwrap_or_default();
    if let Some(dir) = cli.cache_dir.clone() {
        config.cache_dir = Some(dir);
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout_secs = Some(secs);
    }

    let district = resolve_district(&cli, &config).await?;
    info!(district = %district, "Loading dashboard");

    let dashboard = Dashboard::from_config(&config)?;
    let result = dashboard.fetch_three_years(&district).await?;
    if result.is_empty() {
        warn!(district = %district, "No records for any fiscal year");
    }

    if cli.save_default {
        if let Err(e) = with_default_district(file_config, &district).and_then(|c| c.save()) {
            warn!("Failed to save default district: {:#}", e);
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::render_dashboard(&district, &result));
    }

    Ok(())
}
