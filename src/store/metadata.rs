//! Store loading statistics
//!
//! Tracks what was read from the source tables so startup can report it.

use std::time::Duration;

/// Statistics about the store loading process
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Number of station rows read from the source table
    pub station_rows: usize,

    /// Number of stations kept after dropping duplicate ids
    pub stations_loaded: usize,

    /// Number of duplicate station rows dropped
    pub duplicate_stations: usize,

    /// Number of measurements loaded
    pub measurements_loaded: usize,

    /// Number of measurements with no precipitation value
    pub missing_precipitation: usize,

    /// Number of measurements referring to a station id with no station record
    pub orphan_measurements: usize,

    /// Time taken to read and convert both tables
    pub load_duration: Duration,
}

impl LoadStats {
    /// Percentage of measurements without a precipitation value
    pub fn missing_precipitation_rate(&self) -> f64 {
        if self.measurements_loaded == 0 {
            0.0
        } else {
            (self.missing_precipitation as f64 / self.measurements_loaded as f64) * 100.0
        }
    }

    /// Check whether anything in the source looked off
    pub fn has_warnings(&self) -> bool {
        self.duplicate_stations > 0 || self.orphan_measurements > 0
    }

    /// Get a summary string of the loading process
    pub fn summary(&self) -> String {
        format!(
            "Loaded {} stations and {} measurements ({:.1}% without precipitation) in {:.2}s",
            self.stations_loaded,
            self.measurements_loaded,
            self.missing_precipitation_rate(),
            self.load_duration.as_secs_f64()
        )
    }
}
