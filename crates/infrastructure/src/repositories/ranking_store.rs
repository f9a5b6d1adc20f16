//! Ranking store implementation.
//!
//! PostgreSQL-backed storage for ranking categories, leaderboard entries and
//! per-game medal counters.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Postgres, Row, Transaction};
use std::collections::HashMap;
use tracing::{debug, instrument};

use rankings_application::{
    ApplicationResult, CategoryRegistration, MedalCandidate, RankingStore,
    SubCategoryRegistration,
};
use rankings_domain::{
    paging, CategoryId, CategoryListing, GameId, MedalCounts, PlayerId, Ranking, RankingEntry,
    RankingSubCategory, RankingValue, SubCategoryId,
};

use crate::{database::TransactionExt, query_all, query_optional, Error, Result};

const UPSERT_CATEGORY_SQL: &str = r#"
    INSERT INTO ranking_categories (category_id, game, ordinal, periodic)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (category_id, game)
    DO UPDATE SET ordinal = EXCLUDED.ordinal, periodic = EXCLUDED.periodic
"#;

const UPSERT_SUB_CATEGORY_SQL: &str = r#"
    INSERT INTO ranking_sub_categories (category_id, sub_category_id, game, ordinal)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (category_id, sub_category_id, game)
    DO UPDATE SET ordinal = EXCLUDED.ordinal
"#;

const DELETE_ENTRIES_SQL: &str = r#"
    DELETE FROM ranking_entries WHERE category_id = $1 AND sub_category_id = $2
"#;

const INSERT_ENTRIES_SQL: &str = r#"
    INSERT INTO ranking_entries (
        category_id, sub_category_id, position, actual_position,
        player_id, value_int, value_float, achieved_at
    )
    SELECT $1, $2, e.position, e.actual_position, e.player_id, e.value_int, e.value_float, e.achieved_at
    FROM UNNEST($3::INT[], $4::INT[], $5::TEXT[], $6::BIGINT[], $7::DOUBLE PRECISION[], $8::TIMESTAMPTZ[])
        AS e(position, actual_position, player_id, value_int, value_float, achieved_at)
"#;

const BACKFILL_ACTUAL_POSITIONS_SQL: &str = r#"
    UPDATE ranking_entries e
    SET actual_position = r.actual_position
    FROM (
        SELECT player_id,
            ROW_NUMBER() OVER (ORDER BY position, achieved_at, player_id) AS actual_position
        FROM ranking_entries
        WHERE category_id = $1 AND sub_category_id = $2
    ) r
    WHERE e.category_id = $1 AND e.sub_category_id = $2 AND e.player_id = r.player_id
"#;

const LIST_CATEGORIES_SQL: &str = r#"
    SELECT category_id, game
    FROM ranking_categories
    WHERE game IN ('', $1)
    ORDER BY ordinal, category_id
"#;

const LIST_SUB_CATEGORIES_SQL: &str = r#"
    SELECT sc.category_id, sc.sub_category_id, sc.game, COUNT(*) AS entry_count
    FROM ranking_sub_categories sc
    JOIN ranking_entries e
        ON e.category_id = sc.category_id AND e.sub_category_id = sc.sub_category_id
    WHERE sc.game IN ('', $1)
    GROUP BY sc.category_id, sc.sub_category_id, sc.game, sc.ordinal
    ORDER BY sc.category_id, sc.ordinal
"#;

const PLAYER_POSITION_SQL: &str = r#"
    SELECT actual_position
    FROM ranking_entries
    WHERE category_id = $1 AND sub_category_id = $2 AND player_id = $3
"#;

const RANKINGS_PAGE_SQL: &str = r#"
    SELECT e.position,
        COALESCE(a.username, '') AS username,
        COALESCE(p.rank, 0) AS rank,
        COALESCE(a.badge, 'null') AS badge,
        COALESCE(pgd.system_name, '') AS system_name,
        COALESCE(pgd.medal_count_bronze, 0) AS bronze,
        COALESCE(pgd.medal_count_silver, 0) AS silver,
        COALESCE(pgd.medal_count_gold, 0) AS gold,
        COALESCE(pgd.medal_count_platinum, 0) AS platinum,
        COALESCE(pgd.medal_count_diamond, 0) AS diamond,
        e.value_int, e.value_float
    FROM ranking_entries e
    LEFT JOIN accounts a ON a.player_id = e.player_id
    LEFT JOIN players p ON p.player_id = e.player_id
    LEFT JOIN player_game_data pgd ON pgd.player_id = e.player_id AND pgd.game = $1
    WHERE e.category_id = $2 AND e.sub_category_id = $3
        AND e.actual_position BETWEEN $4 AND $5
    ORDER BY e.actual_position
"#;

const MEDAL_CANDIDATES_SQL: &str = r#"
    SELECT e.player_id, e.actual_position, e.category_id, e.sub_category_id,
        c.game AS category_game, sc.game AS sub_category_game, c.periodic
    FROM ranking_entries e
    JOIN ranking_categories c ON c.category_id = e.category_id AND c.game IN ('', $1)
    JOIN ranking_sub_categories sc
        ON sc.category_id = e.category_id AND sc.sub_category_id = e.sub_category_id
        AND sc.game IN ('', $1)
    WHERE e.actual_position BETWEEN 1 AND 100
"#;

const RESET_MEDALS_SQL: &str = r#"
    UPDATE player_game_data
    SET medal_count_bronze = 0, medal_count_silver = 0, medal_count_gold = 0,
        medal_count_platinum = 0, medal_count_diamond = 0
    WHERE game = $1
"#;

const UPSERT_MEDALS_SQL: &str = r#"
    INSERT INTO player_game_data (
        player_id, game, medal_count_bronze, medal_count_silver, medal_count_gold,
        medal_count_platinum, medal_count_diamond
    )
    SELECT m.player_id, $1, m.bronze, m.silver, m.gold, m.platinum, m.diamond
    FROM UNNEST($2::TEXT[], $3::INT[], $4::INT[], $5::INT[], $6::INT[], $7::INT[])
        AS m(player_id, bronze, silver, gold, platinum, diamond)
    JOIN players p ON p.player_id = m.player_id
    ON CONFLICT (player_id, game) DO UPDATE SET
        medal_count_bronze = EXCLUDED.medal_count_bronze,
        medal_count_silver = EXCLUDED.medal_count_silver,
        medal_count_gold = EXCLUDED.medal_count_gold,
        medal_count_platinum = EXCLUDED.medal_count_platinum,
        medal_count_diamond = EXCLUDED.medal_count_diamond
"#;

/// Shared categories and subcategories are stored with an empty game.
fn game_column(game: &Option<GameId>) -> &str {
    game.as_ref().map(GameId::as_str).unwrap_or("")
}

fn game_from_column(game: String) -> Option<GameId> {
    (!game.is_empty()).then(|| GameId::new(game))
}

fn position_from_column(value: i32, column: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::InvalidData(format!("negative {column}: {value}")))
}

fn medal_count(row: &PgRow, column: &str) -> Result<u32> {
    position_from_column(row.try_get(column)?, column)
}

/// PostgreSQL implementation of RankingStore.
pub struct PgRankingStore {
    pool: PgPool,
}

impl PgRankingStore {
    /// Create a new PostgreSQL ranking store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete, insert in batches and backfill actual positions.
    async fn write_entries(
        tx: &mut Transaction<'_, Postgres>,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
        entries: &[RankingEntry],
    ) -> Result<usize> {
        sqlx::query(DELETE_ENTRIES_SQL)
            .bind(category_id.as_str())
            .bind(sub_category_id.as_str())
            .execute(&mut **tx)
            .await?;

        let mut written = 0;
        for batch in entries.chunks(paging::INSERT_BATCH_SIZE) {
            let mut positions = Vec::with_capacity(batch.len());
            let mut actual_positions = Vec::with_capacity(batch.len());
            let mut player_ids = Vec::with_capacity(batch.len());
            let mut value_ints: Vec<Option<i64>> = Vec::with_capacity(batch.len());
            let mut value_floats: Vec<Option<f64>> = Vec::with_capacity(batch.len());
            let mut timestamps = Vec::with_capacity(batch.len());

            for entry in batch {
                positions.push(entry.position as i32);
                actual_positions.push(entry.actual_position as i32);
                player_ids.push(entry.player_id.as_str().to_string());
                match entry.value {
                    RankingValue::Int(v) => {
                        value_ints.push(Some(v));
                        value_floats.push(None);
                    }
                    RankingValue::Float(v) => {
                        value_ints.push(None);
                        value_floats.push(Some(v));
                    }
                }
                timestamps.push(entry.timestamp);
            }

            let result = sqlx::query(INSERT_ENTRIES_SQL)
                .bind(category_id.as_str())
                .bind(sub_category_id.as_str())
                .bind(positions)
                .bind(actual_positions)
                .bind(player_ids)
                .bind(value_ints)
                .bind(value_floats)
                .bind(timestamps)
                .execute(&mut **tx)
                .await?;
            written += result.rows_affected() as usize;
            debug!(batch = batch.len(), "Inserted ranking entries");
        }

        if written > 0 {
            sqlx::query(BACKFILL_ACTUAL_POSITIONS_SQL)
                .bind(category_id.as_str())
                .bind(sub_category_id.as_str())
                .execute(&mut **tx)
                .await?;
        }

        Ok(written)
    }

    async fn overwrite_medals(
        tx: &mut Transaction<'_, Postgres>,
        game: &GameId,
        tallies: &HashMap<PlayerId, MedalCounts>,
    ) -> Result<u64> {
        sqlx::query(RESET_MEDALS_SQL)
            .bind(game.as_str())
            .execute(&mut **tx)
            .await?;

        let tallies: Vec<_> = tallies.iter().filter(|(_, c)| !c.is_empty()).collect();
        if tallies.is_empty() {
            return Ok(0);
        }

        let player_ids: Vec<String> = tallies.iter().map(|(p, _)| p.as_str().to_string()).collect();
        let column = |f: fn(&MedalCounts) -> u32| -> Vec<i32> {
            tallies.iter().map(|(_, c)| f(c) as i32).collect()
        };

        let result = sqlx::query(UPSERT_MEDALS_SQL)
            .bind(game.as_str())
            .bind(player_ids)
            .bind(column(|c| c.bronze))
            .bind(column(|c| c.silver))
            .bind(column(|c| c.gold))
            .bind(column(|c| c.platinum))
            .bind(column(|c| c.diamond))
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }

    fn row_to_ranking(row: &PgRow) -> Result<Ranking> {
        let value_int: Option<i64> = row.try_get("value_int")?;
        let value_float: Option<f64> = row.try_get("value_float")?;
        let value = match (value_int, value_float) {
            (_, Some(v)) => RankingValue::Float(v),
            (v, None) => RankingValue::Int(v.unwrap_or_default()),
        };

        Ok(Ranking {
            position: position_from_column(row.try_get("position")?, "position")?,
            name: row.try_get("username")?,
            account_rank: row.try_get("rank")?,
            badge: row.try_get("badge")?,
            system_name: row.try_get("system_name")?,
            medals: [
                medal_count(row, "bronze")?,
                medal_count(row, "silver")?,
                medal_count(row, "gold")?,
                medal_count(row, "platinum")?,
                medal_count(row, "diamond")?,
            ],
            value,
        })
    }

    fn row_to_candidate(row: &PgRow) -> Result<MedalCandidate> {
        Ok(MedalCandidate {
            player_id: PlayerId::new(row.try_get::<String, _>("player_id")?),
            actual_position: position_from_column(
                row.try_get("actual_position")?,
                "actual_position",
            )?,
            category_id: CategoryId::new(row.try_get::<String, _>("category_id")?),
            sub_category_id: SubCategoryId::new(row.try_get::<String, _>("sub_category_id")?),
            category_game: game_from_column(row.try_get("category_game")?),
            sub_category_game: game_from_column(row.try_get("sub_category_game")?),
            periodic: row.try_get("periodic")?,
        })
    }
}

#[async_trait]
impl RankingStore for PgRankingStore {
    #[instrument(skip(self, registration), fields(category_id = %registration.category_id))]
    async fn upsert_category(&self, registration: &CategoryRegistration) -> ApplicationResult<()> {
        sqlx::query(UPSERT_CATEGORY_SQL)
            .bind(registration.category_id.as_str())
            .bind(game_column(&registration.game))
            .bind(registration.ordinal)
            .bind(registration.periodic)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    #[instrument(
        skip(self, registration),
        fields(
            category_id = %registration.category_id,
            sub_category_id = %registration.sub_category_id
        )
    )]
    async fn upsert_sub_category(
        &self,
        registration: &SubCategoryRegistration,
    ) -> ApplicationResult<()> {
        sqlx::query(UPSERT_SUB_CATEGORY_SQL)
            .bind(registration.category_id.as_str())
            .bind(registration.sub_category_id.as_str())
            .bind(game_column(&registration.game))
            .bind(registration.ordinal)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    async fn replace_entries(
        &self,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
        entries: &[RankingEntry],
    ) -> ApplicationResult<usize> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let result = Self::write_entries(&mut tx, category_id, sub_category_id, entries).await;
        let written = tx.commit_or_rollback(result).await?;

        debug!(written, "Replaced ranking entries");
        Ok(written)
    }

    #[instrument(skip(self), fields(game = %game))]
    async fn list_categories(&self, game: &GameId) -> ApplicationResult<Vec<CategoryListing>> {
        let category_rows = query_all!(&self.pool, LIST_CATEGORIES_SQL, game.as_str())?;
        let mut categories = category_rows
            .iter()
            .map(|row| -> Result<CategoryListing> {
                Ok(CategoryListing {
                    category_id: CategoryId::new(row.try_get::<String, _>("category_id")?),
                    game: game_from_column(row.try_get("game")?),
                    sub_categories: Vec::new(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let sub_category_rows = query_all!(&self.pool, LIST_SUB_CATEGORIES_SQL, game.as_str())?;
        for row in &sub_category_rows {
            let category_id: String = row.try_get("category_id").map_err(Error::Database)?;
            let entry_count: i64 = row.try_get("entry_count").map_err(Error::Database)?;
            let sub_category = RankingSubCategory {
                sub_category_id: SubCategoryId::new(
                    row.try_get::<String, _>("sub_category_id")
                        .map_err(Error::Database)?,
                ),
                game: game_from_column(row.try_get("game").map_err(Error::Database)?),
                page_count: paging::page_count(entry_count.max(0) as u64),
            };
            if let Some(category) = categories
                .iter_mut()
                .find(|c| c.category_id.as_str() == category_id)
            {
                category.sub_categories.push(sub_category);
            }
        }

        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn player_actual_position(
        &self,
        player_id: &PlayerId,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
    ) -> ApplicationResult<Option<u32>> {
        let row = query_optional!(
            &self.pool,
            PLAYER_POSITION_SQL,
            category_id.as_str(),
            sub_category_id.as_str(),
            player_id.as_str(),
        )?;

        let position = match row {
            Some(row) => {
                let value: i32 = row.try_get("actual_position").map_err(Error::Database)?;
                // Unbackfilled rows carry 0
                (value > 0).then_some(value as u32)
            }
            None => None,
        };
        Ok(position)
    }

    #[instrument(skip(self))]
    async fn rankings_page(
        &self,
        game: &GameId,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
        page: u32,
    ) -> ApplicationResult<Vec<Ranking>> {
        // Pages are cut by actual position so they agree with player_actual_position
        let (first, last) = paging::page_bounds(page);
        let rows = query_all!(
            &self.pool,
            RANKINGS_PAGE_SQL,
            game.as_str(),
            category_id.as_str(),
            sub_category_id.as_str(),
            i64::from(first),
            i64::from(last),
        )?;

        let rankings = rows
            .iter()
            .map(Self::row_to_ranking)
            .collect::<Result<Vec<_>>>()?;
        Ok(rankings)
    }

    #[instrument(skip(self), fields(game = %game))]
    async fn medal_candidates(&self, game: &GameId) -> ApplicationResult<Vec<MedalCandidate>> {
        let rows = query_all!(&self.pool, MEDAL_CANDIDATES_SQL, game.as_str())?;
        let candidates = rows
            .iter()
            .map(Self::row_to_candidate)
            .collect::<Result<Vec<_>>>()?;
        debug!(candidates = candidates.len(), "Loaded medal candidates");
        Ok(candidates)
    }

    #[instrument(skip(self, tallies), fields(game = %game, players = tallies.len()))]
    async fn write_medals(
        &self,
        game: &GameId,
        tallies: &HashMap<PlayerId, MedalCounts>,
    ) -> ApplicationResult<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let result = Self::overwrite_medals(&mut tx, game, tallies).await;
        let updated = tx.commit_or_rollback(result).await?;

        debug!(updated, "Wrote player medals");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_rows_use_empty_game() {
        assert_eq!(game_column(&None), "");
        assert_eq!(game_column(&Some(GameId::from("yume"))), "yume");
        assert_eq!(game_from_column(String::new()), None);
        assert_eq!(game_from_column("flow".into()), Some(GameId::from("flow")));
    }

    #[test]
    fn test_negative_positions_are_rejected() {
        assert_eq!(position_from_column(7, "position").unwrap(), 7);
        assert!(matches!(
            position_from_column(-1, "position"),
            Err(Error::InvalidData(_))
        ));
    }
}
