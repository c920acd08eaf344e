//! Configuration management and validation.
//!
//! Provides the server and data source settings, their defaults, and the
//! checks that must pass before the store is loaded.

use crate::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_DATA_DIR, DEFAULT_MEASUREMENTS_FILE,
    DEFAULT_SHUTDOWN_GRACE_SECS, DEFAULT_STATIONS_FILE,
};
use crate::error::{ClimateError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Locations of the two source tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Stations table (CSV or Parquet)
    pub stations_path: PathBuf,

    /// Measurements table (CSV or Parquet)
    pub measurements_path: PathBuf,
}

impl DataSourceConfig {
    /// Resolve the default table file names inside a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            stations_path: data_dir.join(DEFAULT_STATIONS_FILE),
            measurements_path: data_dir.join(DEFAULT_MEASUREMENTS_FILE),
        }
    }

    /// Read both tables from one SQLite database file
    pub fn sqlite(database: &Path) -> Self {
        Self {
            stations_path: database.to_path_buf(),
            measurements_path: database.to_path_buf(),
        }
    }
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self::in_dir(Path::new(DEFAULT_DATA_DIR))
    }
}

/// Global configuration for the climate API server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address the HTTP listener binds to
    pub bind_address: SocketAddr,

    /// Source tables loaded at startup
    pub data: DataSourceConfig,

    /// Seconds in-flight requests are given to finish after shutdown is requested
    pub shutdown_grace_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 5000))),
            data: DataSourceConfig::default(),
            shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE_SECS,
        }
    }
}

impl ApiConfig {
    /// Create configuration with a custom bind address
    pub fn with_bind_address(mut self, bind_address: SocketAddr) -> Self {
        self.bind_address = bind_address;
        self
    }

    /// Create configuration reading both tables from a data directory
    pub fn with_data_dir(mut self, data_dir: &Path) -> Self {
        self.data = DataSourceConfig::in_dir(data_dir);
        self
    }

    /// Create configuration reading both tables from a SQLite database
    pub fn with_database(mut self, database: &Path) -> Self {
        self.data = DataSourceConfig::sqlite(database);
        self
    }

    /// Override the stations table location
    pub fn with_stations_path(mut self, path: PathBuf) -> Self {
        self.data.stations_path = path;
        self
    }

    /// Override the measurements table location
    pub fn with_measurements_path(mut self, path: PathBuf) -> Self {
        self.data.measurements_path = path;
        self
    }

    /// Set the graceful shutdown window
    pub fn with_shutdown_grace_secs(mut self, secs: u64) -> Self {
        self.shutdown_grace_secs = secs;
        self
    }

    /// Check that both source tables exist and have a supported extension
    pub fn validate(&self) -> Result<()> {
        for path in [&self.data.stations_path, &self.data.measurements_path] {
            if !path.exists() {
                return Err(ClimateError::DataSourceNotFound { path: path.clone() });
            }
            if !is_supported_table(path) {
                return Err(ClimateError::UnsupportedFormat { path: path.clone() });
            }
        }

        if self.data.stations_path == self.data.measurements_path
            && !is_sqlite(&self.data.stations_path)
        {
            return Err(ClimateError::configuration(format!(
                "stations and measurements cannot be read from the same file: {}",
                self.data.stations_path.display()
            )));
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}

/// Lowercased file extension, if any
pub(crate) fn table_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Whether the loader knows how to read a table at this path
pub fn is_supported_table(path: &Path) -> bool {
    matches!(
        table_extension(path).as_deref(),
        Some("csv") | Some("parquet") | Some("sqlite") | Some("db")
    )
}

/// Whether the path names a SQLite database holding both tables
pub fn is_sqlite(path: &Path) -> bool {
    matches!(table_extension(path).as_deref(), Some("sqlite") | Some("db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:5000");
        assert_eq!(
            config.data.stations_path,
            PathBuf::from("Resources/hawaii_stations.csv")
        );
        assert_eq!(
            config.data.measurements_path,
            PathBuf::from("Resources/hawaii_measurements.csv")
        );
        assert_eq!(config.shutdown_grace_secs, 30);
    }

    #[test]
    fn test_builder_overrides() {
        let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        let config = ApiConfig::default()
            .with_bind_address(addr)
            .with_data_dir(Path::new("/data"))
            .with_measurements_path(PathBuf::from("/other/obs.parquet"))
            .with_shutdown_grace_secs(5);

        assert_eq!(config.bind_address, addr);
        assert_eq!(
            config.data.stations_path,
            PathBuf::from("/data/hawaii_stations.csv")
        );
        assert_eq!(
            config.data.measurements_path,
            PathBuf::from("/other/obs.parquet")
        );
        assert_eq!(config.shutdown_grace_secs, 5);
    }

    #[test]
    fn test_validate_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = ApiConfig::default().with_data_dir(temp_dir.path());

        match config.validate() {
            Err(ClimateError::DataSourceNotFound { path }) => {
                assert!(path.ends_with("hawaii_stations.csv"));
            }
            other => panic!("expected DataSourceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let stations = temp_dir.path().join("stations.xlsx");
        let measurements = temp_dir.path().join("measurements.csv");
        fs::write(&stations, "").unwrap();
        fs::write(&measurements, "").unwrap();

        let config = ApiConfig::default()
            .with_stations_path(stations)
            .with_measurements_path(measurements);

        assert!(matches!(
            config.validate(),
            Err(ClimateError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_validate_same_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let table = temp_dir.path().join("everything.csv");
        fs::write(&table, "").unwrap();

        let config = ApiConfig::default()
            .with_stations_path(table.clone())
            .with_measurements_path(table);

        assert!(matches!(
            config.validate(),
            Err(ClimateError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_ok() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(DEFAULT_STATIONS_FILE), "").unwrap();
        fs::write(temp_dir.path().join(DEFAULT_MEASUREMENTS_FILE), "").unwrap();

        let config = ApiConfig::default().with_data_dir(temp_dir.path());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_supported_tables() {
        assert!(is_supported_table(Path::new("a/b.csv")));
        assert!(is_supported_table(Path::new("a/b.PARQUET")));
        assert!(is_supported_table(Path::new("Resources/hawaii.sqlite")));
        assert!(!is_supported_table(Path::new("a/b.xlsx")));
        assert!(!is_supported_table(Path::new("a/b")));
        assert!(is_sqlite(Path::new("a/b.DB")));
        assert!(!is_sqlite(Path::new("a/b.csv")));
    }

    #[test]
    fn test_validate_single_sqlite_database() {
        let temp_dir = TempDir::new().unwrap();
        let database = temp_dir.path().join("hawaii.sqlite");
        fs::write(&database, "").unwrap();

        let config = ApiConfig::default().with_database(&database);
        assert_eq!(config.data.stations_path, database);
        assert_eq!(config.data.measurements_path, database);
        assert!(config.validate().is_ok());
    }
}
