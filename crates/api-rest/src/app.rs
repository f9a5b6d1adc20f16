//! Application builder.
//!
//! Assembles routes, middleware and state into an Axum router.

use crate::{
    config::ApiConfig,
    middleware::{logging_middleware, request_id_middleware},
    responses::{
        CategoryResponse, PlayerPageResponse, RankingResponse, RankingsPageResponse,
        SubCategoryResponse,
    },
    routes,
    state::AppState,
};
use axum::{http::HeaderValue, middleware, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document for the read API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Game Rankings API",
        version = "1.0.0",
        description = "Read API for the computed game leaderboards",
    ),
    paths(
        routes::health::health,
        routes::health::ready,
        routes::v1::categories::list_categories,
        routes::v1::rankings::get_rankings_page,
        routes::v1::rankings::get_player_page,
    ),
    components(schemas(
        CategoryResponse,
        SubCategoryResponse,
        RankingResponse,
        RankingsPageResponse,
        PlayerPageResponse,
        crate::error::ErrorResponse,
        routes::health::HealthResponse,
        routes::health::ReadinessResponse,
        routes::health::ReadinessChecks,
    )),
    modifiers(&SessionTokenAddon),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "categories", description = "Ranking categories"),
        (name = "rankings", description = "Leaderboard pages"),
    )
)]
pub struct ApiDoc;

struct SessionTokenAddon;

impl Modify for SessionTokenAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
            );
        }
    }
}

/// Create the main application router
pub fn create_app(config: &ApiConfig, state: AppState) -> Router {
    let mut app = Router::new()
        // Health check routes
        .merge(routes::health_routes())
        // API v1 routes
        .nest("/api/v1", routes::v1_routes())
        // Query-style endpoint for existing clients
        .merge(routes::legacy_routes())
        .with_state(state);

    if config.enable_swagger {
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(build_cors_layer(config))
            .layer(TimeoutLayer::new(config.request_timeout()))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(middleware::from_fn(logging_middleware)),
    )
}

/// Build CORS layer from configuration
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(origins)
}
