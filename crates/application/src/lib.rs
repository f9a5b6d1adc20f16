//! Application layer for the game rankings service
//!
//! This crate holds the ranking recomputation engine and the read-side
//! services, written against ports that the infrastructure layer implements.
//!
//! ## Modules
//!
//! - `ports` - Traits for the score source, ranking store, session lookup and clock
//! - `aggregation` - Per-category aggregation queries
//! - `ranking` - Rank assignment and position normalization
//! - `medals` - Medal eligibility and tallying
//! - `registry` - Category registry discovery and persistence
//! - `services` - Recompute engine and leaderboard queries

pub mod aggregation;
pub mod medals;
pub mod ports;
pub mod ranking;
pub mod registry;
pub mod services;

// Re-export commonly used types
pub use aggregation::AggregationQuery;
pub use medals::MedalTallier;
pub use ports::{
    CategoryRegistration, Clock, FixedClock, MedalCandidate, RankingStore, ScoreSource,
    SessionLookup, SubCategoryRegistration, SystemClock,
};
pub use ranking::{assign_ranks, normalize_positions, RankedScore};
pub use registry::{GameRegistry, PersistSummary, Registry, RegistryBuilder};
pub use services::{RankingEngine, RankingQueryService, RecomputeOutcome};

use rankings_domain::DomainError;
use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug, Clone)]
pub enum ApplicationError {
    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Ranking store or score source unreachable or failing
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            ApplicationError::NotFound(_) => 404,
            ApplicationError::InvalidInput(_) => 400,
            ApplicationError::StoreUnavailable(_) => 503,
            ApplicationError::Internal(_) => 500,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApplicationError::StoreUnavailable(_))
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ApplicationError::NotFound(_) => "NOT_FOUND",
            ApplicationError::InvalidInput(_) => "INVALID_INPUT",
            ApplicationError::StoreUnavailable(_) => "SERVICE_UNAVAILABLE",
            ApplicationError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        ApplicationError::InvalidInput(err.to_string())
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
