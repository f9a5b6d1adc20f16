//! Repository implementations for data persistence.
//!
//! PostgreSQL-backed implementations of the ports defined in the application
//! layer.

mod ranking_store;
mod score_source;
mod session_repository;

pub use ranking_store::PgRankingStore;
pub use score_source::PgScoreSource;
pub use session_repository::PgSessionLookup;
