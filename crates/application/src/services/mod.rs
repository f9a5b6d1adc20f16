//! Application Services
//!
//! The recompute engine writes leaderboards; the query service reads them.

mod rankings;
mod recompute;

pub use rankings::RankingQueryService;
pub use recompute::{RankingEngine, RecomputeOutcome};
