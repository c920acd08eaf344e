//! Core data structures for the climate observation store.
//!
//! Defines the typed station and measurement records loaded at startup
//! and the small value types the store hands back to the query layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weather station metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Unique station code (e.g. "USC00519281")
    pub id: String,

    /// Human-readable station name
    pub name: String,

    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,

    /// Elevation above sea level
    pub elevation: f64,
}

impl Station {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        elevation: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude,
            longitude,
            elevation,
        }
    }

    /// Validate station data for valid ranges, returning the first problem found
    pub fn validate(&self) -> Option<String> {
        if self.id.trim().is_empty() {
            return Some("station identifier cannot be empty".to_string());
        }

        if !(-90.0..=90.0).contains(&self.latitude) {
            return Some(format!(
                "invalid latitude {}: must be between -90 and 90 degrees",
                self.latitude
            ));
        }

        if !(-180.0..=180.0).contains(&self.longitude) {
            return Some(format!(
                "invalid longitude {}: must be between -180 and 180 degrees",
                self.longitude
            ));
        }

        None
    }
}

/// One daily observation for a station.
///
/// `station` is a plain reference to [`Station::id`]; measurements for
/// unknown stations are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub station: String,
    pub date: NaiveDate,
    /// Precipitation amount, absent on days nothing was recorded
    pub precipitation: Option<f64>,
    /// Temperature observation
    pub temperature: f64,
}

impl Measurement {
    pub fn new(
        station: impl Into<String>,
        date: NaiveDate,
        precipitation: Option<f64>,
        temperature: f64,
    ) -> Self {
        Self {
            station: station.into(),
            date,
            precipitation,
            temperature,
        }
    }
}

/// Min/max/mean of temperature over a filtered set of measurements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Earliest and latest measurement dates in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateSpan {
    /// Number of calendar days covered, inclusive of both ends
    pub fn days(&self) -> i64 {
        (self.last - self.first).num_days() + 1
    }
}
