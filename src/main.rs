use anyhow::Context;
use clap::Parser;
use climate_api::cli::{Args, setup_logging};
use climate_api::server::{self, AppState};
use climate_api::{ApiConfig, LoadStats, ObservationStore};
use colored::*;
use std::net::SocketAddr;
use std::process;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn main() {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args) {
        eprintln!("Failed to initialise logging: {}", error);
        process::exit(1);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let config = args.to_config();
    let result = runtime.block_on(serve(config, args.quiet));

    if let Err(error) = result {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), error);
        process::exit(1);
    }
}

async fn serve(config: ApiConfig, quiet: bool) -> anyhow::Result<()> {
    config.validate().context("Invalid configuration")?;

    let (store, stats) = ObservationStore::load(&config.data)
        .await
        .context("Failed to load observation store")?;

    let listener = server::bind(&config)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    if !quiet {
        let address = listener.local_addr().unwrap_or(config.bind_address);
        print_startup_summary(&config, &store, &stats, address);
    }

    // Cancelled on Ctrl+C; the server drains in-flight requests before returning
    let cancellation_token = CancellationToken::new();
    tokio::spawn(server::cancel_on_signal(
        tokio::signal::ctrl_c(),
        cancellation_token.clone(),
    ));

    server::serve(
        listener,
        AppState::new(store),
        cancellation_token,
        Duration::from_secs(config.shutdown_grace_secs),
    )
    .await
    .context("Server error")?;

    Ok(())
}

fn print_startup_summary(
    config: &ApiConfig,
    store: &ObservationStore,
    stats: &LoadStats,
    address: SocketAddr,
) {
    println!("{}", "Climate API".bright_green().bold());
    println!("{}", "===========".bright_green());
    println!(
        "  {} {}",
        "Stations:    ".bright_white(),
        config.data.stations_path.display().to_string().bright_cyan()
    );
    println!(
        "  {} {}",
        "Measurements:".bright_white(),
        config.data.measurements_path.display().to_string().bright_cyan()
    );
    println!("  {}", stats.summary());

    if let Some(span) = store.date_span() {
        println!(
            "  {} {} to {} ({} days)",
            "Date range:  ".bright_white(),
            span.first,
            span.last,
            span.days()
        );
    }

    if stats.has_warnings() {
        println!(
            "  {}",
            format!(
                "{} duplicate stations skipped, {} measurements without a station record",
                stats.duplicate_stations, stats.orphan_measurements
            )
            .bright_yellow()
        );
    }

    println!();
    println!(
        "  {} {}",
        "Listening on".bright_white(),
        format!("http://{}/", address).bright_yellow().bold()
    );
    println!("  {}", "Press Ctrl+C to stop".bright_black());
    println!();
}
