//! Testing utilities for the game rankings service
//!
//! This crate provides:
//! - In-memory implementations of the application ports
//! - Fixtures for scores, periods and player profiles
//! - Builder patterns for scores, periods and stored leaderboards
//! - A PostgreSQL test database helper
//!
//! # Examples
//!
//! ```
//! use rankings_testing::builders::*;
//!
//! let entries = LeaderboardBuilder::new("bp", "all").with_players(63).build();
//! assert_eq!(entries.len(), 63);
//! ```

pub mod builders;
pub mod database;
pub mod fixtures;
pub mod mocks;

// Re-export commonly used types
pub use builders::*;
pub use fixtures::*;
pub use mocks::*;

// Re-export testing dependencies for convenience
pub use fake;
pub use proptest;
