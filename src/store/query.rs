//! Scan, filter, and aggregate primitives over the observation store
//!
//! Every method here is a pure read. Date bounds are inclusive and each
//! bound is optional; `None` leaves that side of the range open.

use super::ObservationStore;
use crate::error::{ClimateError, Result};
use crate::models::{DateSpan, Station, TemperatureStats};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Inclusive, optionally open-ended date range check
fn within(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
}

impl ObservationStore {
    /// Latest measurement date in the store
    ///
    /// # Errors
    /// * Returns `ClimateError::EmptyDataset` if there are no measurements
    pub fn max_date(&self) -> Result<NaiveDate> {
        self.measurements
            .iter()
            .map(|m| m.date)
            .max()
            .ok_or(ClimateError::EmptyDataset)
    }

    /// Earliest and latest measurement dates, if any measurements exist
    pub fn date_span(&self) -> Option<DateSpan> {
        let mut dates = self.measurements.iter().map(|m| m.date);
        let first = dates.next()?;
        let (first, last) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(DateSpan { first, last })
    }

    /// Full scan of `(station, date, precipitation)` in load order
    pub fn all_measurements(
        &self,
    ) -> impl ExactSizeIterator<Item = (&str, NaiveDate, Option<f64>)> + '_ {
        self.measurements
            .iter()
            .map(|m| (m.station.as_str(), m.date, m.precipitation))
    }

    /// All stations in load order
    pub fn all_stations(&self) -> &[Station] {
        &self.stations
    }

    /// Measurement count per station id.
    ///
    /// Station ids appear in the order they are first seen while scanning
    /// measurements in load order, which makes the tie-break in
    /// [`most_active_station`](Self::most_active_station) deterministic.
    pub fn count_by_station(&self) -> Vec<(&str, usize)> {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(&str, usize)> = Vec::new();

        for measurement in &self.measurements {
            let id = measurement.station.as_str();
            match slots.get(id) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(id, counts.len());
                    counts.push((id, 1));
                }
            }
        }

        counts
    }

    /// Station id with the most measurements.
    ///
    /// Among stations sharing the highest count, the one first seen in load
    /// order wins. Returns `None` for an empty store.
    ///
    /// This is not "first to reach the count": for measurements A,B,B,A both
    /// stations end at 2 and B reaches 2 first, but A is returned because it
    /// appears first.
    pub fn most_active_station(&self) -> Option<(&str, usize)> {
        self.count_by_station()
            .into_iter()
            .fold(None, |best, (id, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((id, count)),
            })
    }

    /// `(date, temperature)` for one station within an inclusive date range,
    /// newest first. Measurements sharing a date keep their load order.
    pub fn filter_by_station_and_date_range(
        &self,
        station: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Vec<(NaiveDate, f64)> {
        let mut rows: Vec<(NaiveDate, f64)> = self
            .measurements
            .iter()
            .filter(|m| m.station == station && within(m.date, from, to))
            .map(|m| (m.date, m.temperature))
            .collect();

        rows.sort_by(|a, b| b.0.cmp(&a.0));
        rows
    }

    /// Min/max/mean temperature over measurements in an inclusive date range.
    ///
    /// Returns `None` when nothing matches; callers treat that as an empty
    /// result rather than a failure.
    pub fn aggregate_temps(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Option<TemperatureStats> {
        let mut temps = self
            .measurements
            .iter()
            .filter(|m| within(m.date, from, to))
            .map(|m| m.temperature);

        let first = temps.next()?;
        let (mut min, mut max, mut sum, mut count) = (first, first, first, 1usize);
        for t in temps {
            min = min.min(t);
            max = max.max(t);
            sum += t;
            count += 1;
        }

        // Rounding in the running sum can push the mean just outside [min, max]
        let avg = (sum / count as f64).clamp(min, max);

        Some(TemperatureStats { min, max, avg })
    }
}
