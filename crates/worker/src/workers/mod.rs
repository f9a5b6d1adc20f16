//! Worker implementations

pub mod medals;
pub mod recompute;

use crate::job::Job;
use anyhow::Result;
use async_trait::async_trait;
use rankings_application::RankingEngine;

/// Worker trait for processing jobs
#[async_trait]
pub trait Worker: Send + Sync {
    /// Process a job
    async fn process(&self, job: &Job) -> Result<()>;

    /// Get the worker name
    fn name(&self) -> &str;
}

/// Job handler that routes jobs to appropriate workers
#[derive(Clone)]
pub struct JobHandler {
    engine: RankingEngine,
}

impl JobHandler {
    /// Create a new job handler
    pub fn new(engine: RankingEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &RankingEngine {
        &self.engine
    }

    /// Handle a job by routing to the appropriate worker
    pub async fn handle(&self, job: &Job) -> Result<()> {
        match job {
            Job::Recompute(_) => {
                let worker = recompute::RecomputeWorker::new(self.engine.clone());
                worker.process(job).await
            }
            Job::TallyMedals { .. } => {
                let worker = medals::MedalWorker::new(self.engine.clone());
                worker.process(job).await
            }
        }
    }
}
