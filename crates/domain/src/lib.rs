//! Game Rankings Domain Types
//!
//! This crate provides the core domain model for the game rankings service:
//! the games a deployment serves, the ranking categories built for them, the
//! computed leaderboard entries and the medal bands derived from them.
//!
//! ## Architecture
//!
//! - **identifiers**: String-backed identifiers for games, players, categories and subcategories
//! - **game**: The configured game catalog and its primary game
//! - **period**: Event periods and the current-period lookup
//! - **category**: Category kinds, registered categories and reader listings
//! - **ranking**: Ranking values, stored entries and the leaderboard read model
//! - **medal**: Medal bands over actual positions
//! - **paging**: Page size, page counts and position-to-page arithmetic
//! - **recompute**: Units of recomputation work
//! - **errors**: Domain error types
//!
//! ## Usage
//!
//! ```rust
//! use rankings_domain::{paging, CategoryKind, SortDirection};
//!
//! let kind: CategoryKind = "timeTrial".parse().unwrap();
//! assert_eq!(kind.sort_direction(), SortDirection::Ascending);
//! assert_eq!(paging::page_count(63), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod errors;
pub mod game;
pub mod identifiers;
pub mod medal;
pub mod paging;
pub mod period;
pub mod ranking;
pub mod recompute;

pub use category::{
    CategoryKind, CategoryListing, RankingCategory, RankingSubCategory, SortDirection, ValueKind,
};
pub use errors::{DomainError, DomainResult};
pub use game::GameCatalog;
pub use identifiers::*;
pub use medal::{Medal, MedalCounts};
pub use period::EventPeriod;
pub use ranking::{PlayerScore, Ranking, RankingEntry, RankingValue};
pub use recompute::RecomputeUnit;
