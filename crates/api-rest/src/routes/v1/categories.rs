//! Category listing endpoints.

use crate::{
    error::ApiResult,
    responses::{ApiResponse, CategoryResponse},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

/// Category routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/games/:game/categories", get(list_categories))
}

/// List ranking categories
///
/// Categories visible to the game in display order. Subcategories without
/// entries are omitted.
#[utoipa::path(
    get,
    path = "/games/{game}/categories",
    tag = "categories",
    params(
        ("game" = String, Path, description = "Game id, e.g. 2kki"),
    ),
    responses(
        (status = 200, description = "Ranking categories", body = [CategoryResponse]),
        (status = 400, description = "Unknown game"),
        (status = 503, description = "Ranking store unavailable"),
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Path(game): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<CategoryResponse>>>> {
    let categories = state.queries.list_categories(&game).await?;

    Ok(Json(ApiResponse::success(
        categories.into_iter().map(CategoryResponse::from).collect(),
    )))
}
