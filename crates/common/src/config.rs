//! Configuration management for the rankings services.
//!
//! Settings are layered from configuration files and environment variables.
//! Every binary (API server, recompute worker, CLI) loads the same
//! [`AppConfig`] and reads the sections it needs.
//!
//! ## Example Configuration
//!
//! ```toml
//! [database]
//! url = "postgres://rankings@localhost/rankings"
//!
//! [rankings]
//! games = ["2kki", "yume"]
//! primary_game = "2kki"
//! time_trial_games = ["2kki"]
//! recompute_interval_seconds = 3600
//! ```

use anyhow::{Context, Result};
use rankings_domain::{GameCatalog, GameId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub rankings: RankingsConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// CORS allowed origins
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Serve the OpenAPI document and Swagger UI
    #[serde(default = "default_enable_swagger")]
    pub enable_swagger: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            request_timeout_seconds: default_request_timeout(),
            cors_allowed_origins: default_cors_origins(),
            enable_swagger: default_enable_swagger(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_db_timeout")]
    pub timeout_seconds: u64,
}

/// Ranking engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingsConfig {
    /// Games served, in display order
    #[serde(default = "default_games")]
    pub games: Vec<String>,

    /// Game that computes the cross-game `all` subcategories
    #[serde(default = "default_primary_game")]
    pub primary_game: String,

    /// Games exposing time-trial runs
    #[serde(default = "default_time_trial_games")]
    pub time_trial_games: Vec<String>,

    /// Seconds between recompute cycles
    #[serde(default = "default_recompute_interval")]
    pub recompute_interval_seconds: u64,

    /// Run a cycle immediately when the worker starts
    #[serde(default)]
    pub run_on_start: bool,
}

impl Default for RankingsConfig {
    fn default() -> Self {
        Self {
            games: default_games(),
            primary_game: default_primary_game(),
            time_trial_games: default_time_trial_games(),
            recompute_interval_seconds: default_recompute_interval(),
            run_on_start: false,
        }
    }
}

impl RankingsConfig {
    /// Build the game catalog described by this section
    pub fn catalog(&self) -> Result<GameCatalog> {
        GameCatalog::new(
            self.games.iter().map(|g| GameId::new(g.clone())).collect(),
            GameId::new(self.primary_game.clone()),
            self.time_trial_games.iter().map(|g| GameId::new(g.clone())).collect(),
        )
        .context("Invalid rankings game catalog")
    }

    /// Interval between recompute cycles
    pub fn recompute_interval(&self) -> Duration {
        Duration::from_secs(self.recompute_interval_seconds)
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable JSON logging format
    #[serde(default)]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            json_logging: false,
            log_level: default_log_level(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_enable_swagger() -> bool {
    true
}

fn default_pool_size() -> u32 {
    10
}

fn default_db_timeout() -> u64 {
    30
}

fn default_games() -> Vec<String> {
    GameCatalog::default()
        .games()
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_primary_game() -> String {
    GameCatalog::default().primary().to_string()
}

fn default_time_trial_games() -> Vec<String> {
    vec![default_primary_game()]
}

fn default_recompute_interval() -> u64 {
    3600 // hourly
}

fn default_service_name() -> String {
    "game-rankings".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from configuration files and environment variables.
    ///
    /// Later sources override earlier ones:
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/{environment}.toml (if exists, where environment is from APP_ENV)
    /// 4. Environment variables (prefixed with APP_)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rankings_common::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load configuration");
    /// println!("Recomputing every {}s", config.rankings.recompute_interval_seconds);
    /// ```
    pub fn load() -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Example: APP_DATABASE__URL=postgres://...
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("rankings.games")
                    .with_list_parse_key("rankings.time_trial_games")
                    .with_list_parse_key("server.cors_allowed_origins")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.server.workers == 0 {
            anyhow::bail!("Number of workers must be greater than 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL is required");
        }

        if self.database.pool_size == 0 {
            anyhow::bail!("Database pool size must be greater than 0");
        }

        if self.database.timeout_seconds == 0 {
            anyhow::bail!("Database timeout must be greater than 0");
        }

        if self.rankings.games.is_empty() {
            anyhow::bail!("At least one game must be configured");
        }

        if self.rankings.recompute_interval_seconds == 0 {
            anyhow::bail!("Recompute interval must be greater than 0");
        }

        self.rankings.catalog()?;

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }

    /// Get the database connection timeout as a Duration
    pub fn database_timeout(&self) -> Duration {
        Duration::from_secs(self.database.timeout_seconds)
    }

    /// Create a development configuration with sensible defaults
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                workers: 4,
                ..ServerConfig::default()
            },
            database: DatabaseConfig {
                url: "postgres://localhost:5432/rankings_dev".to_string(),
                pool_size: 5,
                timeout_seconds: 30,
            },
            rankings: RankingsConfig {
                recompute_interval_seconds: 300,
                run_on_start: true,
                ..RankingsConfig::default()
            },
            telemetry: TelemetryConfig {
                service_name: "game-rankings-dev".to_string(),
                json_logging: false,
                log_level: "debug".to_string(),
            },
        }
    }
}
