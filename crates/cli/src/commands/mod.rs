//! CLI commands

pub mod categories;
pub mod leaderboard;
pub mod migrate;
pub mod registry;
pub mod update;

use crate::output::OutputFormat;
use anyhow::{Context, Result};
use rankings_application::{
    Clock, RankingEngine, RankingQueryService, RankingStore, RegistryBuilder, ScoreSource,
    SystemClock,
};
use rankings_common::AppConfig;
use rankings_domain::GameCatalog;
use rankings_infrastructure::{DatabaseConfig, DatabasePool, PgRankingStore, PgScoreSource};
use std::sync::Arc;

/// Context passed to all commands
pub struct CommandContext {
    pub format: OutputFormat,
    pub catalog: GameCatalog,
    pub engine: RankingEngine,
    pub queries: RankingQueryService,
    pub builder: RegistryBuilder,
    database: Option<DatabasePool>,
}

impl CommandContext {
    /// Connect to the configured database
    pub async fn connect(config: &AppConfig, format: OutputFormat) -> Result<Self> {
        let pool = DatabasePool::new(&DatabaseConfig::from_settings(&config.database))
            .await
            .context("Failed to connect to database")?;

        let source: Arc<dyn ScoreSource> = Arc::new(PgScoreSource::new(pool.pool().clone()));
        let store: Arc<dyn RankingStore> = Arc::new(PgRankingStore::new(pool.pool().clone()));

        let mut ctx = Self::with_ports(
            config.rankings.catalog()?,
            format,
            source,
            store,
            Arc::new(SystemClock),
        );
        ctx.database = Some(pool);
        Ok(ctx)
    }

    /// Build a context over arbitrary port implementations
    pub fn with_ports(
        catalog: GameCatalog,
        format: OutputFormat,
        source: Arc<dyn ScoreSource>,
        store: Arc<dyn RankingStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            format,
            engine: RankingEngine::new(Arc::clone(&source), Arc::clone(&store), clock),
            queries: RankingQueryService::new(store, catalog.clone()),
            builder: RegistryBuilder::new(source, catalog.clone()),
            catalog,
            database: None,
        }
    }

    /// Database pool, for commands that work on the schema directly
    pub fn database(&self) -> Result<&DatabasePool> {
        self.database
            .as_ref()
            .context("This command requires a database connection")
    }
}
