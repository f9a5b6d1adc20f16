//! Infrastructure layer for the game rankings service
//!
//! This crate provides:
//! - Database access (PostgreSQL with sqlx)
//! - The score source reading raw achievement facts
//! - The ranking store holding categories, entries and medal counters
//! - Session token lookup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rankings_common::AppConfig;
//! use rankings_infrastructure::{
//!     database::{DatabaseConfig, DatabasePool},
//!     repositories::{PgRankingStore, PgScoreSource},
//! };
//!
//! let config = AppConfig::load()?;
//! let pool = DatabasePool::new(&DatabaseConfig::from_settings(&config.database)).await?;
//! let store = PgRankingStore::new(pool.pool().clone());
//! let source = PgScoreSource::new(pool.pool().clone());
//! ```

pub mod database;
pub mod repositories;

// Re-export commonly used types
pub use database::{DatabaseConfig, DatabasePool, HealthStatus, TransactionExt};
pub use repositories::{PgRankingStore, PgScoreSource, PgSessionLookup};

use rankings_application::ApplicationError;

// Re-export result and error types
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure-level errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database errors from sqlx
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Stored data that cannot be mapped back to domain values
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl From<Error> for ApplicationError {
    fn from(err: Error) -> Self {
        match err {
            Error::Database(e) => ApplicationError::StoreUnavailable(e.to_string()),
            other => ApplicationError::Internal(other.to_string()),
        }
    }
}
