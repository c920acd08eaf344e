//! Read-only observation store
//!
//! Holds the station and measurement tables in memory for the lifetime of
//! the process. The store is populated once before the HTTP listener starts
//! and is never mutated afterwards, so it is shared between request handlers
//! behind a plain `Arc` with no locking.

use crate::models::{Measurement, Station};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::warn;

pub mod loader;
pub mod metadata;
pub mod query;

#[cfg(test)]
pub mod tests;

pub use metadata::LoadStats;

/// In-memory station and measurement tables
#[derive(Debug, Clone, Default)]
pub struct ObservationStore {
    /// Stations in load order
    pub(crate) stations: Vec<Station>,

    /// Station id -> position in `stations`
    pub(crate) station_index: HashMap<String, usize>,

    /// Measurements in load order
    pub(crate) measurements: Vec<Measurement>,
}

impl ObservationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-typed records.
    ///
    /// Duplicate station ids keep the first occurrence.
    pub fn from_records(stations: Vec<Station>, measurements: Vec<Measurement>) -> Self {
        Self::from_records_counting_duplicates(stations, measurements).0
    }

    pub(crate) fn from_records_counting_duplicates(
        stations: Vec<Station>,
        measurements: Vec<Measurement>,
    ) -> (Self, usize) {
        let mut store = Self {
            stations: Vec::with_capacity(stations.len()),
            station_index: HashMap::with_capacity(stations.len()),
            measurements,
        };
        let mut duplicates = 0;

        for station in stations {
            match store.station_index.entry(station.id.clone()) {
                Entry::Vacant(e) => {
                    e.insert(store.stations.len());
                    store.stations.push(station);
                }
                Entry::Occupied(_) => {
                    warn!(
                        "Duplicate station found: id = {}, name = '{}', keeping existing",
                        station.id, station.name
                    );
                    duplicates += 1;
                }
            }
        }

        (store, duplicates)
    }

    /// Look up a station by id
    pub fn station(&self, id: &str) -> Option<&Station> {
        self.station_index.get(id).map(|&i| &self.stations[i])
    }

    /// Check if a station exists in the store
    pub fn contains_station(&self, id: &str) -> bool {
        self.station_index.contains_key(id)
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn measurement_count(&self) -> usize {
        self.measurements.len()
    }

    /// True when there are no measurements (stations alone do not count)
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Number of measurements whose station id has no station record
    pub fn orphan_measurement_count(&self) -> usize {
        self.measurements
            .iter()
            .filter(|m| !self.contains_station(&m.station))
            .count()
    }
}
