//! Single-leaderboard recompute

use anyhow::{Context, Result};
use rankings_application::RecomputeOutcome;
use rankings_domain::RecomputeUnit;
use serde::Serialize;
use tracing::debug;

use crate::commands::CommandContext;
use crate::output::{Render, TableFormatter};

/// Result of `update-rankings`
#[derive(Debug, Serialize)]
pub struct UpdateReport {
    pub game: String,
    pub category_id: String,
    pub sub_category_id: String,
    pub players_scored: usize,
    pub entries_written: usize,
    pub duration_ms: u64,
}

impl From<RecomputeOutcome> for UpdateReport {
    fn from(outcome: RecomputeOutcome) -> Self {
        Self {
            game: outcome.unit.game.to_string(),
            category_id: outcome.unit.category_id.to_string(),
            sub_category_id: outcome.unit.sub_category_id.to_string(),
            players_scored: outcome.players_scored,
            entries_written: outcome.entries_written,
            duration_ms: outcome.duration.as_millis() as u64,
        }
    }
}

impl Render for UpdateReport {
    fn render_table(&self) -> Result<String> {
        Ok(TableFormatter::key_value(vec![
            ("Game", self.game.clone()),
            ("Category", self.category_id.clone()),
            ("Subcategory", self.sub_category_id.clone()),
            ("Players scored", self.players_scored.to_string()),
            ("Entries written", self.entries_written.to_string()),
            ("Duration", format!("{} ms", self.duration_ms)),
        ]))
    }
}

/// Rebuild one leaderboard synchronously
pub async fn update_rankings(
    ctx: &CommandContext,
    category_id: &str,
    sub_category_id: &str,
    game: &str,
) -> Result<UpdateReport> {
    let game = ctx.catalog.require(game)?;
    let unit = RecomputeUnit::parse(category_id, sub_category_id, game)?;
    debug!(%unit, "Updating rankings");

    let outcome = ctx
        .engine
        .recompute(&unit)
        .await
        .with_context(|| format!("Failed to update rankings for {}", unit))?;

    Ok(outcome.into())
}
