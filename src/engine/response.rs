//! Response payload shapes
//!
//! Field names match the JSON the API has always served, including the
//! capitalised keys and the spaces in the temperature summary.

use crate::models::{Station, TemperatureStats};
use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One element of the precipitation listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationEntry {
    pub date: NaiveDate,
    pub precipitation: Option<f64>,
}

/// Station attributes nested under the station id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationDetails {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Elevation")]
    pub elevation: f64,
}

/// A station serialised as a single-key object: `{"<id>": {...details}}`
#[derive(Debug, Clone, PartialEq)]
pub struct StationEntry {
    pub id: String,
    pub details: StationDetails,
}

impl From<&Station> for StationEntry {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id.clone(),
            details: StationDetails {
                name: station.name.clone(),
                latitude: station.latitude,
                longitude: station.longitude,
                elevation: station.elevation,
            },
        }
    }
}

impl Serialize for StationEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.id, &self.details)?;
        map.end()
    }
}

/// One temperature observation for the most active station
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TobsEntry {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
}

/// Temperature aggregate over a date range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureSummary {
    #[serde(rename = "Minimum Temperature")]
    pub minimum: f64,
    #[serde(rename = "Maximum Temperature")]
    pub maximum: f64,
    #[serde(rename = "Average Temperature")]
    pub average: f64,
}

impl From<TemperatureStats> for TemperatureSummary {
    fn from(stats: TemperatureStats) -> Self {
        Self {
            minimum: stats.min,
            maximum: stats.max,
            average: stats.avg,
        }
    }
}

/// Store status served on the health route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub stations: usize,
    pub measurements: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}
