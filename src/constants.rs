//! Application constants for the climate API
//!
//! Route paths, source table column names, and default locations used
//! throughout the crate.

// =============================================================================
// HTTP Routes
// =============================================================================

pub const PRECIPITATION_ROUTE: &str = "/api/v1.0/precipitation";
pub const STATIONS_ROUTE: &str = "/api/v1.0/stations";
pub const TOBS_ROUTE: &str = "/api/v1.0/tobs";
pub const START_ROUTE: &str = "/api/v1.0/{start}";
pub const START_END_ROUTE: &str = "/api/v1.0/{start}/{end}";
pub const HEALTH_ROUTE: &str = "/health";

/// Human-readable route listing served at `/`
pub const ROUTE_LISTING: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/<start>",
    "/api/v1.0/<start>/<end>",
];

// =============================================================================
// Query Semantics
// =============================================================================

/// Size of the temperature observation window ending at the latest date
pub const TOBS_WINDOW_DAYS: u64 = 365;

/// Format accepted for start/end path parameters and emitted in responses
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Source Tables
// =============================================================================

pub const STATIONS_TABLE: &str = "stations";
pub const MEASUREMENTS_TABLE: &str = "measurements";

/// Table names inside a SQLite database file
pub mod sqlite_tables {
    pub const STATIONS: &str = "station";
    pub const MEASUREMENTS: &str = "measurement";
}

/// Column names in the stations table
pub mod station_columns {
    pub const ID: &str = "station";
    pub const NAME: &str = "name";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const ELEVATION: &str = "elevation";
}

/// Column names in the measurements table
pub mod measurement_columns {
    pub const STATION: &str = "station";
    pub const DATE: &str = "date";
    pub const PRECIPITATION: &str = "prcp";
    pub const TEMPERATURE: &str = "tobs";
}

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_DATA_DIR: &str = "Resources";
pub const DEFAULT_STATIONS_FILE: &str = "hawaii_stations.csv";
pub const DEFAULT_MEASUREMENTS_FILE: &str = "hawaii_measurements.csv";
pub const DEFAULT_DATABASE_FILE: &str = "hawaii.sqlite";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

/// Default log level when neither `--verbose` nor `--quiet` is given
pub const DEFAULT_LOG_LEVEL: &str = "info";
