//! Game Rankings Worker
//!
//! Periodically rebuilds every leaderboard and the players' medal counters.

use anyhow::{Context, Result};
use clap::Parser;
use rankings_application::{RankingEngine, RegistryBuilder, SystemClock};
use rankings_common::{init_from_config, AppConfig};
use rankings_infrastructure::{DatabaseConfig, DatabasePool, PgRankingStore, PgScoreSource};
use rankings_worker::{RecomputeService, WorkerConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "rankings-worker")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Seconds between recompute cycles
    #[arg(long, env = "RECOMPUTE_INTERVAL")]
    interval: Option<u64>,

    /// Run a cycle immediately on start
    #[arg(long, env = "RECOMPUTE_ON_START")]
    run_on_start: Option<bool>,

    /// Run one cycle and exit
    #[arg(long)]
    once: bool,

    /// Print metrics interval (seconds)
    #[arg(long, env = "METRICS_INTERVAL", default_value = "3600")]
    metrics_interval: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    if let Some(interval) = args.interval {
        config.rankings.recompute_interval_seconds = interval;
    }
    if let Some(run_on_start) = args.run_on_start {
        config.rankings.run_on_start = run_on_start;
    }

    init_from_config(&config.telemetry)?;

    let catalog = config.rankings.catalog()?;
    let worker_config = WorkerConfig::from_settings(&config.rankings);

    info!(
        games = catalog.games().len(),
        primary_game = %catalog.primary(),
        tick_interval = worker_config.scheduler.tick_interval,
        "Starting rankings worker"
    );

    let pool = DatabasePool::new(&DatabaseConfig::from_settings(&config.database))
        .await
        .context("Failed to connect to database")?;

    let source = Arc::new(PgScoreSource::new(pool.pool().clone()));
    let store = Arc::new(PgRankingStore::new(pool.pool().clone()));
    let engine = RankingEngine::new(source.clone(), store, Arc::new(SystemClock));
    let builder = RegistryBuilder::new(source, catalog);

    let mut service = RecomputeService::new(worker_config, engine, builder);

    if args.once {
        let report = service.run_once().await?;
        info!(
            succeeded = report.units_succeeded,
            failed = report.units_failed,
            "Single cycle finished"
        );
        pool.close().await;
        return Ok(());
    }

    let shutdown_handle = service.shutdown_handle();
    let metrics = service.metrics().clone();

    // Setup graceful shutdown
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        info!("Received shutdown signal");
        if let Err(e) = shutdown_handle.send(()).await {
            warn!(error = %e, "Failed to signal recompute service shutdown");
        }
    });

    // Start metrics reporting
    let metrics_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(args.metrics_interval.max(1)));
        loop {
            interval.tick().await;
            let snapshot = metrics.snapshot();
            info!(
                cycles = snapshot.cycles_completed,
                units_processed = snapshot.units_processed,
                units_failed = snapshot.units_failed,
                medal_failures = snapshot.medal_failures,
                success_rate = format!("{:.2}%", snapshot.success_rate * 100.0),
                last_cycle_ms = snapshot.last_duration
                    .map(|d| d.as_millis())
                    .unwrap_or(0),
                "Worker metrics"
            );
        }
    });

    if let Err(e) = service.start().await {
        error!(error = %e, "Recompute service error");
    }

    metrics_handle.abort();
    pool.close().await;

    info!("Worker shutting down gracefully");

    Ok(())
}
