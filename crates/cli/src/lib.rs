//! Game Rankings CLI Library
//!
//! Operational commands run against the rankings database: rebuilding a
//! single leaderboard, inspecting categories, pages and the category
//! registry, and applying migrations.

pub mod commands;
pub mod output;

pub use commands::CommandContext;
pub use output::{OutputFormat, Render};

/// Re-export common types
pub use anyhow::{Context, Result};
