//! Error handling for climate query operations.
//!
//! Covers store loading failures (fatal at startup) and the request-level
//! failures the HTTP layer translates into status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClimateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Background load task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Data source not found at path: {path}")]
    DataSourceNotFound { path: PathBuf },

    #[error("Unsupported data source format for file: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Missing table '{table}' in database {path}")]
    MissingTable { table: String, path: PathBuf },

    #[error("Missing column '{column}' in table {table}")]
    MissingColumn { table: String, column: String },

    #[error("Invalid record in table {table} at row {row}: {reason}")]
    InvalidRecord {
        table: String,
        row: usize,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Dataset contains no measurements")]
    EmptyDataset,

    #[error("Malformed date parameter '{value}': expected YYYY-MM-DD")]
    MalformedDateParameter { value: String },
}

impl ClimateError {
    /// Create an invalid record error
    pub fn invalid_record(table: &str, row: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            table: table.to_string(),
            row,
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Io(_) => "io_error",
            Self::Polars(_) => "polars_error",
            Self::TaskJoin(_) => "task_join_error",
            Self::Database(_) => "database_error",
            Self::DataSourceNotFound { .. } => "data_source_not_found",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::MissingTable { .. } => "missing_table",
            Self::MissingColumn { .. } => "missing_column",
            Self::InvalidRecord { .. } => "invalid_record",
            Self::Configuration { .. } => "config_error",
            Self::EmptyDataset => "empty_dataset",
            Self::MalformedDateParameter { .. } => "malformed_date_parameter",
        }
    }

    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedDateParameter { .. } => StatusCode::BAD_REQUEST,
            Self::EmptyDataset
            | Self::Io(_)
            | Self::Polars(_)
            | Self::TaskJoin(_)
            | Self::Database(_)
            | Self::DataSourceNotFound { .. }
            | Self::UnsupportedFormat { .. }
            | Self::MissingTable { .. }
            | Self::MissingColumn { .. }
            | Self::InvalidRecord { .. }
            | Self::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body returned for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(rename = "type")]
    pub error_type: &'static str,
}

impl IntoResponse for ClimateError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Load-time details never belong in a response body
        let message = match &self {
            Self::MalformedDateParameter { .. } | Self::EmptyDataset => self.to_string(),
            Self::Io(_)
            | Self::Polars(_)
            | Self::TaskJoin(_)
            | Self::Database(_)
            | Self::DataSourceNotFound { .. }
            | Self::UnsupportedFormat { .. }
            | Self::MissingTable { .. }
            | Self::MissingColumn { .. }
            | Self::InvalidRecord { .. }
            | Self::Configuration { .. } => "Internal server error".to_owned(),
        };

        let body = ErrorResponse {
            error: message,
            error_type: self.error_type(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ClimateError>;
