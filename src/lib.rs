//! Climate API Library
//!
//! A read-only HTTP query and aggregation service over a weather station
//! dataset: a stations table and a daily measurements table (precipitation
//! and observed temperature).
//!
//! This library provides:
//! - Loading both tables from CSV or Parquet into an in-memory store
//! - Query primitives over the store (latest date, per-station activity,
//!   date-range filtering, temperature aggregation)
//! - One query engine operation per API route, producing JSON payloads
//! - An axum router exposing those operations under `/api/v1.0`

pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod models;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::{ApiConfig, DataSourceConfig};
pub use error::{ClimateError, Result};
pub use models::{Measurement, Station, TemperatureStats};
pub use store::{LoadStats, ObservationStore};
