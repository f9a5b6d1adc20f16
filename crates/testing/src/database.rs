//! Test database setup.
//!
//! Provides a migrated PostgreSQL pool for integration tests. Tests using it
//! are `#[ignore]`d and run against `TEST_DATABASE_URL`.

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;

/// Environment variable naming the test database
pub const TEST_DATABASE_URL: &str = "TEST_DATABASE_URL";

/// Test database wrapper
pub struct TestDatabase {
    pool: Arc<PgPool>,
}

impl TestDatabase {
    /// Connect to `TEST_DATABASE_URL` and apply migrations
    pub async fn from_env() -> anyhow::Result<Self> {
        let url = std::env::var(TEST_DATABASE_URL)?;
        Self::new_with_url(&url).await
    }

    /// Connect to `connection_string` and apply migrations
    pub async fn new_with_url(connection_string: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;

        sqlx::migrate!("../../migrations").run(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get a reference to the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get an Arc clone of the pool for sharing
    pub fn pool_arc(&self) -> Arc<PgPool> {
        Arc::clone(&self.pool)
    }

    /// Clean all tables for test isolation
    pub async fn clean(&self) -> anyhow::Result<()> {
        sqlx::query(
            "TRUNCATE TABLE ranking_entries, ranking_sub_categories, ranking_categories, \
             player_game_data, player_sessions, player_badges, badges, \
             player_event_locations, event_locations, event_vms, event_completions, \
             game_event_periods, event_periods, player_time_trials, player_minigame_scores, \
             accounts, players CASCADE",
        )
        .execute(self.pool())
        .await?;
        Ok(())
    }
}
