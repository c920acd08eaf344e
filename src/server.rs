//! HTTP server exposing the query engine.
//!
//! Routes map one-to-one onto engine operations. Static routes are matched
//! before the `{start}` capture, so `/api/v1.0/stations` never reaches the
//! temperature summary handler.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::ApiConfig;
use crate::constants::{
    HEALTH_ROUTE, PRECIPITATION_ROUTE, ROUTE_LISTING, START_END_ROUTE, START_ROUTE,
    STATIONS_ROUTE, TOBS_ROUTE,
};
use crate::engine::{self, PrecipitationEntry, StationEntry, TemperatureSummary, TobsEntry};
use crate::error::{ClimateError, Result};
use crate::store::ObservationStore;

/// Shared server state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Store loaded at startup, read-only for the life of the process.
    pub store: Arc<ObservationStore>,
}

impl AppState {
    pub fn new(store: ObservationStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route(HEALTH_ROUTE, get(health_check))
        .route(PRECIPITATION_ROUTE, get(precipitation))
        .route(STATIONS_ROUTE, get(stations))
        .route(TOBS_ROUTE, get(tobs))
        .route(START_ROUTE, get(temperature_from))
        .route(START_END_ROUTE, get(temperature_between))
        .with_state(state)
}

/// Bind the HTTP listener to the configured address
pub async fn bind(config: &ApiConfig) -> Result<TcpListener> {
    let listener = TcpListener::bind(config.bind_address).await?;
    info!(address = %listener.local_addr()?, "Climate API listening");
    Ok(listener)
}

/// Serve the API on a bound listener until `cancel` fires.
///
/// In-flight requests get `grace` to finish once shutdown starts;
/// connections still open after that are dropped.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    cancel: CancellationToken,
    grace: Duration,
) -> Result<()> {
    let app = router(state);

    let shutdown = cancel.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .into_future();

    tokio::select! {
        result = server => result.map_err(ClimateError::Io)?,
        _ = async {
            cancel.cancelled().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                grace_secs = grace.as_secs(),
                "Grace period elapsed, dropping open connections"
            );
        }
    }

    info!("Climate API shutdown complete");
    Ok(())
}

/// Cancel `cancel` once `signal` resolves successfully.
///
/// If the signal handler cannot be installed the server keeps running.
pub async fn cancel_on_signal<F>(signal: F, cancel: CancellationToken)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("Shutdown requested");
            cancel.cancel();
        }
        Err(e) => error!(
            "Failed to install CTRL+C signal handler, Ctrl+C will not stop the server: {}",
            e
        ),
    }
}

/// Plain-text listing of the available routes.
pub fn home_page() -> String {
    let mut page = String::from("Climate Analysis Homepage\nAvailable Routes:\n");
    for route in ROUTE_LISTING {
        page.push_str(route);
        page.push('\n');
    }
    page
}

async fn home() -> String {
    home_page()
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(engine::health(&state.store))
}

async fn precipitation(
    State(state): State<AppState>,
) -> Result<Json<Vec<PrecipitationEntry>>> {
    let entries = engine::precipitation(&state.store)?;
    debug!(entries = entries.len(), "Served precipitation");
    Ok(Json(entries))
}

async fn stations(State(state): State<AppState>) -> Json<Vec<StationEntry>> {
    Json(engine::stations(&state.store))
}

async fn tobs(State(state): State<AppState>) -> Result<Json<Vec<TobsEntry>>> {
    let entries = engine::tobs(&state.store)?;
    debug!(entries = entries.len(), "Served temperature observations");
    Ok(Json(entries))
}

async fn temperature_from(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureSummary>>> {
    debug!(%start, "Temperature summary requested");
    Ok(Json(engine::temperature_summary(&state.store, &start, None)?))
}

async fn temperature_between(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureSummary>>> {
    debug!(%start, %end, "Temperature summary requested");
    Ok(Json(engine::temperature_summary(
        &state.store,
        &start,
        Some(&end),
    )?))
}
