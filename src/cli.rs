//! Command-line interface components.

use crate::config::ApiConfig;
use crate::constants::DEFAULT_LOG_LEVEL;
use crate::error::{ClimateError, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "climate_api")]
#[command(about = "Serve read-only precipitation and temperature queries over a climate dataset")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory holding hawaii_stations.csv and hawaii_measurements.csv
    #[arg(long, env = "CLIMATE_API_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// SQLite database holding both the station and measurement tables
    #[arg(long, env = "CLIMATE_API_DATABASE", value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Stations table (CSV or Parquet), overrides --data-dir and --database
    #[arg(long, env = "CLIMATE_API_STATIONS", value_name = "FILE")]
    pub stations: Option<PathBuf>,

    /// Measurements table (CSV or Parquet), overrides --data-dir and --database
    #[arg(long, env = "CLIMATE_API_MEASUREMENTS", value_name = "FILE")]
    pub measurements: Option<PathBuf>,

    /// Address for the HTTP listener
    #[arg(short, long, env = "CLIMATE_API_BIND", value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    /// Seconds to let in-flight requests finish after Ctrl+C
    #[arg(long, env = "CLIMATE_API_SHUTDOWN_GRACE", value_name = "SECS")]
    pub shutdown_grace: Option<u64>,

    /// Enable verbose logging (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Log level derived from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => DEFAULT_LOG_LEVEL,
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Layer the flags over the default configuration
    pub fn to_config(&self) -> ApiConfig {
        let mut config = ApiConfig::default();

        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(database) = &self.database {
            config = config.with_database(database);
        }
        if let Some(path) = &self.stations {
            config = config.with_stations_path(path.clone());
        }
        if let Some(path) = &self.measurements {
            config = config.with_measurements_path(path.clone());
        }
        if let Some(addr) = self.bind {
            config = config.with_bind_address(addr);
        }
        if let Some(secs) = self.shutdown_grace {
            config = config.with_shutdown_grace_secs(secs);
        }

        config
    }
}

/// Initialise the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("climate_api={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .map_err(|e| ClimateError::configuration(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| ClimateError::configuration(e.to_string()))?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}
