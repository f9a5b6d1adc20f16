//! Recompute worker - rebuilds one leaderboard

use super::Worker;
use crate::job::Job;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rankings_application::RankingEngine;
use tracing::{debug, warn};

/// Worker for rebuilding a single (category, subcategory) leaderboard
pub struct RecomputeWorker {
    engine: RankingEngine,
}

impl RecomputeWorker {
    /// Create a new recompute worker
    pub fn new(engine: RankingEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Worker for RecomputeWorker {
    async fn process(&self, job: &Job) -> Result<()> {
        match job {
            Job::Recompute(unit) => {
                let outcome = self
                    .engine
                    .recompute(unit)
                    .await
                    .with_context(|| format!("Failed to recompute {}", unit))?;
                debug!(
                    unit = %unit,
                    players = outcome.players_scored,
                    entries = outcome.entries_written,
                    "Leaderboard rebuilt"
                );
                Ok(())
            }
            _ => {
                warn!(job = %job, "Invalid job type for RecomputeWorker");
                Err(anyhow::anyhow!("Invalid job type"))
            }
        }
    }

    fn name(&self) -> &str {
        "RecomputeWorker"
    }
}
