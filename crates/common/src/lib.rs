//! Common utilities shared by the rankings services.
//!
//! This crate provides foundational utilities used across all binaries:
//! - Configuration management
//! - Structured logging setup
//! - Page parameter parsing

pub mod config;
pub mod pagination;
pub mod telemetry;

// Re-export commonly used types
pub use config::{AppConfig, DatabaseConfig, RankingsConfig, ServerConfig, TelemetryConfig};
pub use pagination::{parse_page, PageParams};
pub use telemetry::{init_from_config, init_tracing};

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
