//! Game Rankings API server
//!
//! Serves the computed leaderboards over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use rankings_api_rest::{create_app, ApiConfig, AppState};
use rankings_application::{RankingQueryService, RankingStore, SessionLookup};
use rankings_common::{init_from_config, AppConfig};
use rankings_infrastructure::{DatabaseConfig, DatabasePool, PgRankingStore, PgSessionLookup};
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rankings-api")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Host to bind to
    #[arg(long, env = "API_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "API_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_from_config(&config.telemetry)?;

    let catalog = config.rankings.catalog()?;
    let api_config = ApiConfig::from_settings(&config.server);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %api_config.bind_address(),
        "Starting rankings API"
    );

    let pool = DatabasePool::new(&DatabaseConfig::from_settings(&config.database))
        .await
        .context("Failed to connect to database")?;

    let store: Arc<dyn RankingStore> = Arc::new(PgRankingStore::new(pool.pool().clone()));
    let sessions: Arc<dyn SessionLookup> = Arc::new(PgSessionLookup::new(pool.pool().clone()));
    let state = AppState::new(RankingQueryService::new(store, catalog), sessions)
        .with_database(pool.clone());

    let app = create_app(&api_config, state);

    let listener = tokio::net::TcpListener::bind(api_config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", api_config.bind_address()))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Rankings API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal");
    }
}
