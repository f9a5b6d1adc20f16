//! Score source implementation.
//!
//! Reads raw achievement facts (badges, event completions, time trials,
//! minigame scores) and aggregates one value per player. Every aggregation
//! variant maps to one static statement whose optional filters are bound as
//! nullable parameters.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::Query,
    PgPool, Postgres, Row,
};
use tracing::{debug, instrument};

use rankings_application::{AggregationQuery, ApplicationResult, ScoreSource};
use rankings_domain::{EventPeriod, GameId, PlayerId, PlayerScore, RankingValue, ValueKind};

use crate::{query_all, query_optional, Error, Result};

const BADGE_COUNT_SQL: &str = r#"
    SELECT pb.player_id, COUNT(*)::BIGINT AS value, MAX(pb.unlocked_at) AS achieved_at
    FROM player_badges pb
    JOIN accounts a ON a.player_id = pb.player_id
    JOIN badges b ON b.badge_id = pb.badge_id
    WHERE NOT b.hidden AND ($1::TEXT IS NULL OR b.game = $1)
    GROUP BY pb.player_id
    HAVING COUNT(*) > 0
    ORDER BY value DESC, achieved_at, pb.player_id
    LIMIT $2
"#;

const BADGE_POINTS_SQL: &str = r#"
    SELECT pb.player_id, SUM(b.bp)::BIGINT AS value, MAX(pb.unlocked_at) AS achieved_at
    FROM player_badges pb
    JOIN accounts a ON a.player_id = pb.player_id
    JOIN badges b ON b.badge_id = pb.badge_id
    WHERE $1::TEXT IS NULL OR b.game = $1
    GROUP BY pb.player_id
    HAVING SUM(b.bp) > 0
    ORDER BY value DESC, achieved_at, pb.player_id
    LIMIT $2
"#;

const EXP_SQL: &str = r#"
    WITH completions AS (
        SELECT ec.player_id, ec.exp, ec.completed_at, gep.period_id
        FROM event_completions ec
        JOIN event_locations el ON el.id = ec.event_id
        JOIN game_event_periods gep ON gep.id = el.game_period_id
        WHERE ec.type = 0
        UNION ALL
        SELECT ec.player_id, ec.exp, ec.completed_at, gep.period_id
        FROM event_completions ec
        JOIN event_vms ev ON ev.id = ec.event_id
        JOIN game_event_periods gep ON gep.id = ev.game_period_id
        WHERE ec.type = 2
    )
    SELECT c.player_id, SUM(c.exp)::BIGINT AS value,
        MAX(c.completed_at) FILTER (WHERE c.exp > 0) AS achieved_at
    FROM completions c
    JOIN event_periods ep ON ep.id = c.period_id
    WHERE $1::INT IS NULL OR ep.period_ordinal = $1
    GROUP BY c.player_id
    HAVING SUM(c.exp) > 0
    ORDER BY value DESC, achieved_at, c.player_id
    LIMIT $2
"#;

const EVENT_LOCATION_COUNT_SQL: &str = r#"
    SELECT ec.player_id, COUNT(*)::BIGINT AS value, MAX(ec.completed_at) AS achieved_at
    FROM event_completions ec
    JOIN event_locations el ON el.id = ec.event_id
    JOIN game_event_periods gep ON gep.id = el.game_period_id
    JOIN event_periods ep ON ep.id = gep.period_id
    WHERE ec.type = 0 AND ($1::INT IS NULL OR ep.period_ordinal = $1)
    GROUP BY ec.player_id
    ORDER BY value DESC, achieved_at, ec.player_id
    LIMIT $2
"#;

const FREE_EVENT_LOCATION_COUNT_SQL: &str = r#"
    SELECT ec.player_id, COUNT(*)::BIGINT AS value, MAX(ec.completed_at) AS achieved_at
    FROM event_completions ec
    JOIN player_event_locations pel ON pel.id = ec.event_id
    JOIN game_event_periods gep ON gep.id = pel.game_period_id AND gep.game = $1
    JOIN event_periods ep ON ep.id = gep.period_id
    WHERE ec.type = 1 AND ($2::INT IS NULL OR ep.period_ordinal = $2)
    GROUP BY ec.player_id
    ORDER BY value DESC, achieved_at, ec.player_id
    LIMIT $3
"#;

// The denominator counts the distinct locations completed by anyone in the
// same game and period scope as the numerator.
const EVENT_LOCATION_COMPLETION_SQL: &str = r#"
    WITH locations AS (
        SELECT ec.player_id, COALESCE(el.location_id, pel.location_id) AS location_id,
            ec.completed_at
        FROM event_completions ec
        LEFT JOIN event_locations el ON el.id = ec.event_id AND ec.type = 0
        LEFT JOIN player_event_locations pel ON pel.id = ec.event_id AND ec.type = 1
        JOIN game_event_periods gep
            ON gep.id = COALESCE(el.game_period_id, pel.game_period_id) AND gep.game = $1
        JOIN event_periods ep ON ep.id = gep.period_id
        WHERE $2::INT IS NULL OR ep.period_ordinal = $2
    ),
    total AS (
        SELECT COUNT(DISTINCT location_id) AS location_count FROM locations
    )
    SELECT l.player_id,
        COUNT(DISTINCT l.location_id)::DOUBLE PRECISION / t.location_count AS value,
        MAX(l.completed_at) AS achieved_at
    FROM locations l
    CROSS JOIN total t
    GROUP BY l.player_id, t.location_count
    ORDER BY value DESC, achieved_at, l.player_id
    LIMIT $3
"#;

const EVENT_VM_COUNT_SQL: &str = r#"
    SELECT ec.player_id, COUNT(*)::BIGINT AS value, MAX(ec.completed_at) AS achieved_at
    FROM event_completions ec
    JOIN event_vms ev ON ev.id = ec.event_id
    JOIN game_event_periods gep ON gep.id = ev.game_period_id
    JOIN event_periods ep ON ep.id = gep.period_id
    WHERE ec.type = 2 AND ($1::INT IS NULL OR ep.period_ordinal = $1)
    GROUP BY ec.player_id
    ORDER BY value DESC, achieved_at, ec.player_id
    LIMIT $2
"#;

// Ties on the best time go to the player who set it first.
const TIME_TRIAL_SQL: &str = r#"
    WITH best AS (
        SELECT player_id, MIN(seconds) AS seconds
        FROM player_time_trials
        WHERE game = $1 AND map_id = $2
        GROUP BY player_id
    )
    SELECT b.player_id, b.seconds::BIGINT AS value, MIN(tt.completed_at) AS achieved_at
    FROM best b
    JOIN player_time_trials tt
        ON tt.player_id = b.player_id AND tt.game = $1 AND tt.map_id = $2
        AND tt.seconds = b.seconds
    WHERE b.seconds > 0
    GROUP BY b.player_id, b.seconds
    ORDER BY value ASC, achieved_at, b.player_id
    LIMIT $3
"#;

const MINIGAME_SQL: &str = r#"
    WITH best AS (
        SELECT player_id, MAX(score) AS score
        FROM player_minigame_scores
        WHERE minigame_id = $1
        GROUP BY player_id
    )
    SELECT b.player_id, b.score::BIGINT AS value, MIN(ms.completed_at) AS achieved_at
    FROM best b
    JOIN player_minigame_scores ms
        ON ms.player_id = b.player_id AND ms.minigame_id = $1
        AND ms.score = b.score
    WHERE b.score > 0
    GROUP BY b.player_id, b.score
    ORDER BY value DESC, achieved_at, b.player_id
    LIMIT $2
"#;

const EVENT_PERIODS_SQL: &str = r#"
    SELECT ep.period_ordinal, ep.start_date, ep.end_date, gep.enable_vms
    FROM event_periods ep
    JOIN game_event_periods gep ON gep.period_id = ep.id AND gep.game = $1
    WHERE ep.period_ordinal > 0
    ORDER BY ep.period_ordinal
"#;

const CURRENT_PERIOD_SQL: &str = r#"
    SELECT period_ordinal
    FROM event_periods
    WHERE $1 >= start_date AND $1 < end_date
    ORDER BY period_ordinal
    LIMIT 1
"#;

const TIME_TRIAL_MAPS_SQL: &str = r#"
    SELECT map_id
    FROM player_time_trials
    WHERE game = $1
    GROUP BY map_id
    ORDER BY MIN(seconds), map_id
"#;

const MINIGAME_IDS_SQL: &str = r#"
    SELECT DISTINCT minigame_id
    FROM player_minigame_scores
    WHERE game = $1
    ORDER BY minigame_id
"#;

/// PostgreSQL implementation of ScoreSource.
pub struct PgScoreSource {
    pool: PgPool,
}

impl PgScoreSource {
    /// Create a new PostgreSQL score source.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bind the statement for one aggregation variant.
    fn statement(query: &AggregationQuery, limit: i64) -> Query<'_, Postgres, PgArguments> {
        match query {
            AggregationQuery::BadgeCount { game } => sqlx::query(BADGE_COUNT_SQL)
                .bind(game.as_ref().map(GameId::as_str))
                .bind(limit),
            AggregationQuery::BadgePoints { game } => sqlx::query(BADGE_POINTS_SQL)
                .bind(game.as_ref().map(GameId::as_str))
                .bind(limit),
            AggregationQuery::Exp { period } => sqlx::query(EXP_SQL).bind(*period).bind(limit),
            AggregationQuery::EventLocationCount { period } => {
                sqlx::query(EVENT_LOCATION_COUNT_SQL).bind(*period).bind(limit)
            }
            AggregationQuery::FreeEventLocationCount { game, period } => {
                sqlx::query(FREE_EVENT_LOCATION_COUNT_SQL)
                    .bind(game.as_str())
                    .bind(*period)
                    .bind(limit)
            }
            AggregationQuery::EventLocationCompletion { game, period } => {
                sqlx::query(EVENT_LOCATION_COMPLETION_SQL)
                    .bind(game.as_str())
                    .bind(*period)
                    .bind(limit)
            }
            AggregationQuery::EventVmCount { period } => {
                sqlx::query(EVENT_VM_COUNT_SQL).bind(*period).bind(limit)
            }
            AggregationQuery::TimeTrial { game, map_id } => sqlx::query(TIME_TRIAL_SQL)
                .bind(game.as_str())
                .bind(*map_id)
                .bind(limit),
            AggregationQuery::Minigame { minigame_id } => sqlx::query(MINIGAME_SQL)
                .bind(minigame_id.as_str())
                .bind(limit),
        }
    }

    fn row_to_score(row: &PgRow, value_kind: ValueKind) -> Result<PlayerScore> {
        let player_id: String = row.try_get("player_id")?;
        let value = match value_kind {
            ValueKind::Int => RankingValue::Int(row.try_get("value")?),
            ValueKind::Float => RankingValue::Float(row.try_get("value")?),
        };
        let achieved_at: DateTime<Utc> = row.try_get("achieved_at")?;
        Ok(PlayerScore::new(PlayerId::new(player_id), value, achieved_at))
    }

    async fn run(&self, query: &AggregationQuery, limit: usize) -> Result<Vec<PlayerScore>> {
        let limit = i64::try_from(limit)
            .map_err(|_| Error::InvalidData(format!("limit {limit} out of range")))?;
        let rows = Self::statement(query, limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let value_kind = query.value_kind();
        rows.iter()
            .map(|row| Self::row_to_score(row, value_kind))
            .collect::<Result<Vec<_>>>()
            .map(|mut scores| {
                scores.retain(|s| s.value.is_positive());
                scores
            })
    }
}

#[async_trait]
impl ScoreSource for PgScoreSource {
    #[instrument(skip(self), fields(kind = %query.kind()))]
    async fn aggregate(
        &self,
        query: &AggregationQuery,
        limit: usize,
    ) -> ApplicationResult<Vec<PlayerScore>> {
        let scores = self.run(query, limit).await?;
        debug!(players = scores.len(), "Aggregated scores");
        Ok(scores)
    }

    #[instrument(skip(self), fields(game = %game))]
    async fn event_periods(&self, game: &GameId) -> ApplicationResult<Vec<EventPeriod>> {
        let rows = query_all!(&self.pool, EVENT_PERIODS_SQL, game.as_str())?;

        let periods = rows
            .iter()
            .map(|row| -> std::result::Result<EventPeriod, sqlx::Error> {
                Ok(EventPeriod {
                    period_ordinal: row.try_get("period_ordinal")?,
                    start_date: row.try_get("start_date")?,
                    end_date: row.try_get("end_date")?,
                    enable_vms: row.try_get("enable_vms")?,
                })
            })
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()
            .map_err(Error::Database)?;
        Ok(periods)
    }

    #[instrument(skip(self))]
    async fn current_period_ordinal(&self, today: NaiveDate) -> ApplicationResult<Option<i32>> {
        let row = query_optional!(&self.pool, CURRENT_PERIOD_SQL, today)?;
        let ordinal = row
            .map(|row| row.try_get::<i32, _>("period_ordinal"))
            .transpose()
            .map_err(Error::Database)?;
        Ok(ordinal)
    }

    #[instrument(skip(self), fields(game = %game))]
    async fn time_trial_map_ids(&self, game: &GameId) -> ApplicationResult<Vec<i32>> {
        let rows = query_all!(&self.pool, TIME_TRIAL_MAPS_SQL, game.as_str())?;
        let map_ids = rows
            .iter()
            .map(|row| row.try_get::<i32, _>("map_id"))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Database)?;
        Ok(map_ids)
    }

    #[instrument(skip(self), fields(game = %game))]
    async fn minigame_ids(&self, game: &GameId) -> ApplicationResult<Vec<String>> {
        let rows = query_all!(&self.pool, MINIGAME_IDS_SQL, game.as_str())?;
        let minigame_ids = rows
            .iter()
            .map(|row| row.try_get::<String, _>("minigame_id"))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Database)?;
        Ok(minigame_ids)
    }
}
