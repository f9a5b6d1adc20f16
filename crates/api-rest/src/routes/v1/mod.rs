//! API v1 routes.

use crate::state::AppState;
use axum::Router;

pub mod categories;
pub mod rankings;

/// Create all v1 API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(categories::routes())
        .merge(rankings::routes())
}
