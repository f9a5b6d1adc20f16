//! API configuration.

use rankings_common::ServerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server host to bind to
    pub host: String,

    /// Server port to bind to
    pub port: u16,

    /// CORS allowed origins
    pub cors_allowed_origins: Vec<String>,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Enable OpenAPI documentation
    pub enable_swagger: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_settings(&ServerConfig::default())
    }
}

impl ApiConfig {
    /// Build the API configuration from the `server` settings section
    pub fn from_settings(server: &ServerConfig) -> Self {
        Self {
            host: server.host.clone(),
            port: server.port,
            cors_allowed_origins: server.cors_allowed_origins.clone(),
            request_timeout_seconds: server.request_timeout_seconds,
            enable_swagger: server.enable_swagger,
        }
    }

    /// Socket address to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Whether any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|origin| origin == "*")
    }
}
