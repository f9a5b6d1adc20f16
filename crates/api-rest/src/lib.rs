//! Game Rankings REST API
//!
//! Axum read API over the computed leaderboards. It serves category listings,
//! ranking pages and the page a signed-in player appears on.
//!
//! ## Architecture
//!
//! - **app**: Router assembly and middleware stack
//! - **routes**: Health checks, the v1 REST routes and the legacy `?command=` endpoint
//! - **middleware**: Request ids and request logging
//! - **extractors**: Session player and page extraction
//! - **responses**: Response envelopes and wire types
//! - **error**: HTTP error handling and conversion
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rankings_api_rest::{create_app, ApiConfig, AppState};
//! use rankings_application::RankingQueryService;
//!
//! # async fn run(queries: RankingQueryService, sessions: Arc<dyn rankings_application::SessionLookup>) -> anyhow::Result<()> {
//! let state = AppState::new(queries, sessions);
//! let app = create_app(&ApiConfig::default(), state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod routes;
pub mod state;

// Re-export commonly used types
pub use app::create_app;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
