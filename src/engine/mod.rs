//! Query engine
//!
//! One stateless operation per API route. Each takes the shared store by
//! reference, composes its read primitives, and returns a response payload
//! ready for JSON serialisation.

use crate::constants::{DATE_FORMAT, TOBS_WINDOW_DAYS};
use crate::error::{ClimateError, Result};
use crate::store::ObservationStore;
use chrono::{Days, NaiveDate};
use tracing::debug;

pub mod response;


pub use response::{
    HealthReport, PrecipitationEntry, StationDetails, StationEntry, TemperatureSummary, TobsEntry,
};

/// Every measurement's precipitation, each paired with the latest date in
/// the dataset rather than its own date.
///
/// No date window is applied; the output has exactly one entry per
/// measurement, in load order.
///
/// # Errors
/// * Returns `ClimateError::EmptyDataset` if the store has no measurements
pub fn precipitation(store: &ObservationStore) -> Result<Vec<PrecipitationEntry>> {
    let latest = store.max_date()?;

    Ok(store
        .all_measurements()
        .map(|(_, _, precipitation)| PrecipitationEntry {
            date: latest,
            precipitation,
        })
        .collect())
}

/// Every station as a single-key object, in load order
pub fn stations(store: &ObservationStore) -> Vec<StationEntry> {
    store.all_stations().iter().map(StationEntry::from).collect()
}

/// Temperature observations for the most active station over the year
/// ending at the latest date in the dataset, newest first.
///
/// # Errors
/// * Returns `ClimateError::EmptyDataset` if the store has no measurements
pub fn tobs(store: &ObservationStore) -> Result<Vec<TobsEntry>> {
    let (station, count) = store
        .most_active_station()
        .ok_or(ClimateError::EmptyDataset)?;
    let latest = store.max_date()?;
    let cutoff = latest
        .checked_sub_days(Days::new(TOBS_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MIN);

    debug!(
        "Most active station {} ({} measurements), window {} to {}",
        station, count, cutoff, latest
    );

    Ok(store
        .filter_by_station_and_date_range(station, Some(cutoff), None)
        .into_iter()
        .map(|(date, temperature)| TobsEntry { date, temperature })
        .collect())
}

/// Min/max/average temperature from `start` (and up to `end`, if given),
/// both inclusive.
///
/// Returns a single-element list, or an empty list when no measurement
/// falls in the range.
///
/// # Errors
/// * Returns `ClimateError::MalformedDateParameter` if either bound is not `YYYY-MM-DD`
pub fn temperature_summary(
    store: &ObservationStore,
    start: &str,
    end: Option<&str>,
) -> Result<Vec<TemperatureSummary>> {
    let from = parse_date_param(start)?;
    let to = end.map(parse_date_param).transpose()?;

    Ok(store
        .aggregate_temps(Some(from), to)
        .map(TemperatureSummary::from)
        .into_iter()
        .collect())
}

/// Store status for the health route
pub fn health(store: &ObservationStore) -> HealthReport {
    let span = store.date_span();

    HealthReport {
        status: "healthy",
        stations: store.station_count(),
        measurements: store.measurement_count(),
        first_date: span.map(|s| s.first),
        last_date: span.map(|s| s.last),
    }
}

/// Parse a start/end path parameter.
///
/// Only the fixed-width `YYYY-MM-DD` form is accepted, so date ordering
/// matches plain string ordering of the stored dates.
pub fn parse_date_param(value: &str) -> Result<NaiveDate> {
    let malformed = || ClimateError::MalformedDateParameter {
        value: value.to_string(),
    };

    if value.len() != 10 {
        return Err(malformed());
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| malformed())
}
