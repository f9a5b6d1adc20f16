//! Leaderboard endpoints.

use crate::{
    error::ApiResult,
    extractors::{MaybePlayer, Page},
    responses::{ApiResponse, PlayerPageResponse, RankingResponse, RankingsPageResponse},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

/// Leaderboard routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/games/:game/rankings/:category/:sub_category",
            get(get_rankings_page),
        )
        .route(
            "/rankings/:category/:sub_category/player-page",
            get(get_player_page),
        )
}

/// Get a leaderboard page
///
/// Up to 25 rows ordered by actual position. Pages past the end, including
/// anything beyond page 40, are empty.
#[utoipa::path(
    get,
    path = "/games/{game}/rankings/{category}/{sub_category}",
    tag = "rankings",
    params(
        ("game" = String, Path, description = "Game id"),
        ("category" = String, Path, description = "Category storage id"),
        ("sub_category" = String, Path, description = "Subcategory id"),
        ("page" = Option<u32>, Query, description = "Page number; malformed values mean 1"),
    ),
    responses(
        (status = 200, description = "Leaderboard page", body = RankingsPageResponse),
        (status = 400, description = "Unknown game or category"),
        (status = 503, description = "Ranking store unavailable"),
    )
)]
pub async fn get_rankings_page(
    State(state): State<AppState>,
    Path((game, category, sub_category)): Path<(String, String, String)>,
    page: Page,
) -> ApiResult<Json<ApiResponse<RankingsPageResponse>>> {
    let rankings = state
        .queries
        .rankings_page(&game, &category, &sub_category, page.number())
        .await?;

    Ok(Json(ApiResponse::success(RankingsPageResponse {
        page: page.number(),
        rankings: rankings.into_iter().map(RankingResponse::from).collect(),
    })))
}

/// Get the caller's page
///
/// Page of the leaderboard holding the player behind the session token; 1
/// for anonymous callers and players without an entry.
#[utoipa::path(
    get,
    path = "/rankings/{category}/{sub_category}/player-page",
    tag = "rankings",
    params(
        ("category" = String, Path, description = "Category storage id"),
        ("sub_category" = String, Path, description = "Subcategory id"),
    ),
    responses(
        (status = 200, description = "Player page", body = PlayerPageResponse),
        (status = 400, description = "Unknown category"),
        (status = 503, description = "Ranking store unavailable"),
    ),
    security(("session_token" = []))
)]
pub async fn get_player_page(
    State(state): State<AppState>,
    Path((category, sub_category)): Path<(String, String)>,
    player: MaybePlayer,
) -> ApiResult<Json<ApiResponse<PlayerPageResponse>>> {
    let page = state
        .queries
        .player_page(player.player(), &category, &sub_category)
        .await?;

    Ok(Json(ApiResponse::success(PlayerPageResponse { page })))
}
