//! Store loading from tabular source files
//!
//! Reads the stations and measurements tables through polars and converts
//! them into typed records. CSV tables are read with every column as text
//! so station codes keep their exact spelling; numeric columns are cast
//! explicitly. Parquet tables are read with their stored types and cast
//! the same way. A SQLite database holds both tables; every column is
//! selected as text and goes through the same casts.

use super::ObservationStore;
use super::metadata::LoadStats;
use crate::config::{DataSourceConfig, is_sqlite, table_extension};
use crate::constants::{
    DATE_FORMAT, MEASUREMENTS_TABLE, STATIONS_TABLE, measurement_columns, sqlite_tables,
    station_columns,
};
use crate::error::{ClimateError, Result};
use crate::models::{Measurement, Station};
use chrono::NaiveDate;
use polars::prelude::*;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;
use tracing::{debug, info, warn};

impl ObservationStore {
    /// Load both tables named by the data source configuration
    ///
    /// # Errors
    /// * Returns `ClimateError::DataSourceNotFound` if a table file doesn't exist
    /// * Returns `ClimateError::MissingTable` if a SQLite database lacks a table
    /// * Returns `ClimateError::MissingColumn` if a required column is absent
    /// * Returns `ClimateError::InvalidRecord` for nulls or unparseable values
    pub async fn load(config: &DataSourceConfig) -> Result<(Self, LoadStats)> {
        Self::load_from_paths(&config.stations_path, &config.measurements_path).await
    }

    /// Load the stations and measurements tables from the given paths.
    ///
    /// The paths may be the same SQLite database file.
    pub async fn load_from_paths(
        stations_path: &Path,
        measurements_path: &Path,
    ) -> Result<(Self, LoadStats)> {
        let start_time = Instant::now();

        info!(
            "Loading observation store from {} and {}",
            stations_path.display(),
            measurements_path.display()
        );

        let station_frame = read_table(stations_path, STATIONS_TABLE).await?;
        let measurement_frame = read_table(measurements_path, MEASUREMENTS_TABLE).await?;

        let (stations, measurements) = task::spawn_blocking(move || {
            Ok::<_, ClimateError>((
                stations_from_frame(&station_frame)?,
                measurements_from_frame(&measurement_frame)?,
            ))
        })
        .await??;
        debug!(
            "Read {} station rows and {} measurement rows",
            stations.len(),
            measurements.len()
        );

        let station_rows = stations.len();
        let missing_precipitation = measurements
            .iter()
            .filter(|m| m.precipitation.is_none())
            .count();

        let (store, duplicate_stations) =
            Self::from_records_counting_duplicates(stations, measurements);

        let stats = LoadStats {
            station_rows,
            stations_loaded: store.station_count(),
            duplicate_stations,
            measurements_loaded: store.measurement_count(),
            missing_precipitation,
            orphan_measurements: store.orphan_measurement_count(),
            load_duration: start_time.elapsed(),
        };

        if stats.orphan_measurements > 0 {
            warn!(
                "{} measurements refer to stations missing from the stations table",
                stats.orphan_measurements
            );
        }

        info!("{}", stats.summary());
        Ok((store, stats))
    }
}

/// Read one logical table (`stations` or `measurements`) into a DataFrame.
///
/// CSV and Parquet files hold a single table. A SQLite database holds both,
/// under the `station` and `measurement` table names.
pub async fn read_table(path: &Path, table: &str) -> Result<DataFrame> {
    if !path.exists() {
        return Err(ClimateError::DataSourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let frame = if is_sqlite(path) {
        let sqlite_table = if table == STATIONS_TABLE {
            sqlite_tables::STATIONS
        } else {
            sqlite_tables::MEASUREMENTS
        };
        read_sqlite_table(path, sqlite_table).await?
    } else {
        let owned = path.to_path_buf();
        task::spawn_blocking(move || read_file_table(&owned)).await??
    };

    debug!(
        "Read table {} from {}: {} rows x {} columns",
        table,
        path.display(),
        frame.height(),
        frame.width()
    );

    Ok(frame)
}

fn read_file_table(path: &Path) -> Result<DataFrame> {
    match table_extension(path).as_deref() {
        Some("csv") => Ok(CsvReadOptions::default()
            .with_has_header(true)
            // 0 rows of inference reads every column as String
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
            .finish()?),
        Some("parquet") => Ok(ParquetReader::new(File::open(path)?).finish()?),
        _ => Err(ClimateError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Read every column of a SQLite table as text
async fn read_sqlite_table(path: &Path, table: &str) -> Result<DataFrame> {
    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    let columns: Vec<String> = sqlx::query("SELECT name FROM pragma_table_info(?)")
        .bind(table)
        .fetch_all(&pool)
        .await?
        .iter()
        .map(|row| row.try_get("name"))
        .collect::<std::result::Result<_, _>>()?;

    if columns.is_empty() {
        pool.close().await;
        return Err(ClimateError::MissingTable {
            table: table.to_string(),
            path: path.to_path_buf(),
        });
    }

    let select = columns
        .iter()
        .map(|c| {
            let quoted = c.replace('"', "\"\"");
            format!("CAST(\"{quoted}\" AS TEXT) AS \"{quoted}\"")
        })
        .collect::<Vec<_>>()
        .join(", ");
    let rows = sqlx::query(&format!("SELECT {select} FROM \"{table}\""))
        .fetch_all(&pool)
        .await?;
    pool.close().await;

    let mut frame_columns = Vec::with_capacity(columns.len());
    for (index, name) in columns.iter().enumerate() {
        let values: Vec<Option<String>> = rows
            .iter()
            .map(|row| row.try_get(index))
            .collect::<std::result::Result<_, _>>()?;
        frame_columns.push(Column::new(name.as_str().into(), values));
    }

    Ok(DataFrame::new(frame_columns)?)
}

fn required_column<'a>(frame: &'a DataFrame, table: &str, name: &str) -> Result<&'a Column> {
    frame.column(name).map_err(|_| ClimateError::MissingColumn {
        table: table.to_string(),
        column: name.to_string(),
    })
}

fn string_column(frame: &DataFrame, table: &str, name: &str) -> Result<StringChunked> {
    let column = required_column(frame, table, name)?.cast(&DataType::String)?;
    Ok(column.str()?.clone())
}

/// Cast a column to f64, rejecting values that are present but not numeric
fn float_column(frame: &DataFrame, table: &str, name: &str) -> Result<Float64Chunked> {
    let source = required_column(frame, table, name)?;
    let values = source.cast(&DataType::Float64)?.f64()?.clone();

    if values.null_count() > source.null_count() {
        let text = source.cast(&DataType::String)?;
        let unparsed = text
            .str()?
            .into_iter()
            .zip(&values)
            .enumerate()
            .find_map(|(row, (raw, value))| match (raw, value) {
                (Some(raw), None) if !raw.trim().is_empty() => Some((row, raw.to_string())),
                _ => None,
            });

        if let Some((row, raw)) = unparsed {
            return Err(ClimateError::invalid_record(
                table,
                row,
                format!("non-numeric {} '{}'", name, raw),
            ));
        }
    }

    Ok(values)
}

fn require<T>(value: Option<T>, table: &str, row: usize, column: &str) -> Result<T> {
    value.ok_or_else(|| ClimateError::invalid_record(table, row, format!("null {}", column)))
}

/// Convert the stations table into typed records, in row order
pub fn stations_from_frame(frame: &DataFrame) -> Result<Vec<Station>> {
    let ids = string_column(frame, STATIONS_TABLE, station_columns::ID)?;
    let names = string_column(frame, STATIONS_TABLE, station_columns::NAME)?;
    let latitudes = float_column(frame, STATIONS_TABLE, station_columns::LATITUDE)?;
    let longitudes = float_column(frame, STATIONS_TABLE, station_columns::LONGITUDE)?;
    let elevations = float_column(frame, STATIONS_TABLE, station_columns::ELEVATION)?;

    let rows = (&ids)
        .into_iter()
        .zip(&names)
        .zip((&latitudes).into_iter().zip(&longitudes))
        .zip(&elevations);

    let mut stations = Vec::with_capacity(frame.height());
    for (row, (((id, name), (lat, lon)), elev)) in rows.enumerate() {
        let station = Station::new(
            require(id, STATIONS_TABLE, row, station_columns::ID)?.trim(),
            require(
                name.filter(|n| !n.trim().is_empty()),
                STATIONS_TABLE,
                row,
                station_columns::NAME,
            )?
            .trim(),
            require(lat, STATIONS_TABLE, row, station_columns::LATITUDE)?,
            require(lon, STATIONS_TABLE, row, station_columns::LONGITUDE)?,
            require(elev, STATIONS_TABLE, row, station_columns::ELEVATION)?,
        );

        if let Some(reason) = station.validate() {
            return Err(ClimateError::invalid_record(STATIONS_TABLE, row, reason));
        }

        stations.push(station);
    }

    Ok(stations)
}

/// Convert the measurements table into typed records, in row order
pub fn measurements_from_frame(frame: &DataFrame) -> Result<Vec<Measurement>> {
    let stations = string_column(frame, MEASUREMENTS_TABLE, measurement_columns::STATION)?;
    let dates = string_column(frame, MEASUREMENTS_TABLE, measurement_columns::DATE)?;
    let precipitation =
        float_column(frame, MEASUREMENTS_TABLE, measurement_columns::PRECIPITATION)?;
    let temperatures = float_column(frame, MEASUREMENTS_TABLE, measurement_columns::TEMPERATURE)?;

    let rows = (&stations)
        .into_iter()
        .zip(&dates)
        .zip(&precipitation)
        .zip(&temperatures);

    let mut measurements = Vec::with_capacity(frame.height());
    for (row, (((station, date), prcp), tobs)) in rows.enumerate() {
        let station = require(station, MEASUREMENTS_TABLE, row, measurement_columns::STATION)?;
        let date = require(date, MEASUREMENTS_TABLE, row, measurement_columns::DATE)?;
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|e| {
            ClimateError::invalid_record(
                MEASUREMENTS_TABLE,
                row,
                format!("unparseable date '{}': {}", date, e),
            )
        })?;

        let temperature = require(tobs, MEASUREMENTS_TABLE, row, measurement_columns::TEMPERATURE)?;
        if !temperature.is_finite() {
            return Err(ClimateError::invalid_record(
                MEASUREMENTS_TABLE,
                row,
                format!("non-finite temperature {}", temperature),
            ));
        }

        measurements.push(Measurement::new(
            station.trim(),
            date,
            prcp.filter(|p| p.is_finite()),
            temperature,
        ));
    }

    Ok(measurements)
}
