//! Medal worker - refreshes a game's medal counters

use super::Worker;
use crate::job::Job;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rankings_application::RankingEngine;
use tracing::warn;

/// Worker for tallying medals of one game
pub struct MedalWorker {
    engine: RankingEngine,
}

impl MedalWorker {
    /// Create a new medal worker
    pub fn new(engine: RankingEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Worker for MedalWorker {
    async fn process(&self, job: &Job) -> Result<()> {
        match job {
            Job::TallyMedals {
                game,
                current_period,
            } => {
                self.engine
                    .tally_medals(game, *current_period)
                    .await
                    .with_context(|| format!("Failed to tally medals for {}", game))?;
                Ok(())
            }
            _ => {
                warn!(job = %job, "Invalid job type for MedalWorker");
                Err(anyhow::anyhow!("Invalid job type"))
            }
        }
    }

    fn name(&self) -> &str {
        "MedalWorker"
    }
}
