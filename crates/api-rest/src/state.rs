//! Application state shared by all route handlers.

use rankings_application::{RankingQueryService, SessionLookup};
use rankings_infrastructure::DatabasePool;
use std::sync::Arc;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Leaderboard read service
    pub queries: Arc<RankingQueryService>,

    /// Session token resolution
    pub sessions: Arc<dyn SessionLookup>,

    /// Database pool used by the readiness probe; absent for in-memory stores
    pub database: Option<DatabasePool>,
}

impl AppState {
    /// Create state without a database-backed readiness probe
    pub fn new(queries: RankingQueryService, sessions: Arc<dyn SessionLookup>) -> Self {
        Self {
            queries: Arc::new(queries),
            sessions,
            database: None,
        }
    }

    /// Attach the database pool checked by `/ready`
    pub fn with_database(mut self, database: DatabasePool) -> Self {
        self.database = Some(database);
        self
    }
}
