//! Ranking recomputation.

use crate::aggregation::AggregationQuery;
use crate::medals::MedalTallier;
use crate::ports::{Clock, RankingStore, ScoreSource};
use crate::ranking::{assign_ranks, normalize_positions};
use crate::ApplicationResult;
use rankings_domain::{paging::MAX_ENTRIES, GameId, RecomputeUnit};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Result of rebuilding one leaderboard
#[derive(Debug, Clone, PartialEq)]
pub struct RecomputeOutcome {
    pub unit: RecomputeUnit,
    /// Players returned by the aggregation
    pub players_scored: usize,
    /// Entries stored after ranking and truncation
    pub entries_written: usize,
    pub duration: Duration,
}

/// Rebuilds leaderboards and medal counters.
///
/// Dependencies are injected so the same engine serves the scheduler, the CLI
/// and tests.
#[derive(Clone)]
pub struct RankingEngine {
    source: Arc<dyn ScoreSource>,
    store: Arc<dyn RankingStore>,
    clock: Arc<dyn Clock>,
}

impl RankingEngine {
    pub fn new(
        source: Arc<dyn ScoreSource>,
        store: Arc<dyn RankingStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            store,
            clock,
        }
    }

    pub fn source(&self) -> &Arc<dyn ScoreSource> {
        &self.source
    }

    pub fn store(&self) -> &Arc<dyn RankingStore> {
        &self.store
    }

    /// Ordinal of the event period active today
    pub async fn current_period_ordinal(&self) -> ApplicationResult<Option<i32>> {
        self.source.current_period_ordinal(self.clock.today()).await
    }

    /// Aggregate, rank and replace the entries of one leaderboard
    #[instrument(skip(self), fields(unit = %unit))]
    pub async fn recompute(&self, unit: &RecomputeUnit) -> ApplicationResult<RecomputeOutcome> {
        let started = Instant::now();

        let query = AggregationQuery::for_unit(unit)?;
        debug!(
            kind = query.kind().as_str(),
            game = ?query.game(),
            period = ?query.period(),
            "Aggregating scores"
        );
        let scores = self.source.aggregate(&query, MAX_ENTRIES).await?;
        let players_scored = scores.len();

        let ranked = assign_ranks(scores, query.sort_direction(), MAX_ENTRIES);
        let entries = normalize_positions(&unit.category_id, &unit.sub_category_id, ranked);
        debug!(players = players_scored, entries = entries.len(), "Ranked scores");

        let entries_written = self
            .store
            .replace_entries(&unit.category_id, &unit.sub_category_id, &entries)
            .await?;

        let duration = started.elapsed();
        info!(
            entries = entries_written,
            duration_ms = duration.as_millis() as u64,
            "Recomputed rankings"
        );

        Ok(RecomputeOutcome {
            unit: unit.clone(),
            players_scored,
            entries_written,
            duration,
        })
    }

    /// Overwrite `game`'s medal counters from the stored leaderboards.
    ///
    /// Returns the number of players with at least one eligible entry.
    #[instrument(skip(self), fields(game = %game))]
    pub async fn tally_medals(
        &self,
        game: &GameId,
        current_period: Option<i32>,
    ) -> ApplicationResult<usize> {
        let candidates = self.store.medal_candidates(game).await?;
        let tallies = MedalTallier::new(current_period).tally(game, &candidates);
        self.store.write_medals(game, &tallies).await?;

        info!(players = tallies.len(), "Updated player medals");
        Ok(tallies.len())
    }
}
