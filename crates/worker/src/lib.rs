//! Game Rankings Worker
//!
//! Background recomputation of leaderboards and medal counters.
//!
//! This crate provides:
//! - The cycle planner turning the category registry into jobs
//! - Workers rebuilding one leaderboard or one game's medals
//! - The interval scheduler driving the cycles
//! - Cycle metrics

pub mod config;
pub mod job;
pub mod metrics;
pub mod scheduler;
pub mod workers;

pub use config::{SchedulerConfig, WorkerConfig};
pub use job::Job;
pub use metrics::WorkerMetrics;
pub use scheduler::{plan_cycle, CycleReport, Scheduler};

use anyhow::Result;
use rankings_application::{RankingEngine, RegistryBuilder};
use tokio::sync::mpsc;
use tracing::{error, info};
use workers::JobHandler;

/// Recompute service owning the scheduler
pub struct RecomputeService {
    config: WorkerConfig,
    scheduler: Scheduler,
    metrics: WorkerMetrics,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl RecomputeService {
    /// Create a new recompute service
    pub fn new(config: WorkerConfig, engine: RankingEngine, builder: RegistryBuilder) -> Self {
        let metrics = WorkerMetrics::new();
        let scheduler = Scheduler::new(
            config.scheduler.clone(),
            builder,
            JobHandler::new(engine),
            metrics.clone(),
        );
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        Self {
            config,
            scheduler,
            metrics,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Run a single cycle and return its report
    pub async fn run_once(&mut self) -> Result<CycleReport> {
        self.scheduler.run_cycle().await
    }

    /// Run the scheduler until shutdown
    pub async fn start(self) -> Result<()> {
        info!(
            scheduler_enabled = self.config.scheduler.enabled,
            tick_interval = self.config.scheduler.tick_interval,
            "Starting recompute service"
        );

        let handle = self.scheduler.start(self.shutdown_rx);
        if let Err(e) = handle.await {
            error!("Scheduler task error: {}", e);
        }

        info!("Recompute service stopped");
        Ok(())
    }

    /// Get a handle to send shutdown signal
    pub fn shutdown_handle(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Get metrics
    pub fn metrics(&self) -> &WorkerMetrics {
        &self.metrics
    }
}
