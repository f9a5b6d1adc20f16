//! Query-style endpoint used by existing game clients.
//!
//! `GET /?game=<game>&command=<command>` with `categories`, `page` and `list`
//! commands. Errors are plain text, and `page` answers with a bare number.

use crate::{
    error::ApiError,
    extractors::MaybePlayer,
    responses::{CategoryResponse, RankingResponse},
    state::AppState,
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use rankings_common::parse_page;
use serde::Deserialize;

/// Legacy routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(handle_command))
}

/// Query parameters of the legacy endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyQuery {
    /// Game id
    pub game: Option<String>,
    /// `categories`, `page` or `list`
    pub command: Option<String>,
    /// Category storage id
    pub category: Option<String>,
    /// Subcategory id
    pub sub_category: Option<String>,
    /// Raw page number for `list`
    pub page: Option<String>,
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{} not specified", name)))
}

async fn handle_command(
    State(state): State<AppState>,
    player: MaybePlayer,
    query: Result<Query<LegacyQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return ApiError::BadRequest(rejection.body_text()).into_plain_response(),
    };

    match dispatch(&state, &player, &query).await {
        Ok(response) => response,
        Err(e) => e.into_plain_response(),
    }
}

async fn dispatch(
    state: &AppState,
    player: &MaybePlayer,
    query: &LegacyQuery,
) -> Result<Response, ApiError> {
    let game = required(&query.game, "game")?;
    let command = required(&query.command, "command")?;

    match command {
        "categories" => {
            let categories = state.queries.list_categories(game).await?;
            let body: Vec<CategoryResponse> =
                categories.into_iter().map(CategoryResponse::from).collect();
            Ok(Json(body).into_response())
        }
        "page" => {
            let category = required(&query.category, "category")?;
            let sub_category = required(&query.sub_category, "subcategory")?;
            let page = state
                .queries
                .player_page(player.player(), category, sub_category)
                .await?;
            Ok(page.to_string().into_response())
        }
        "list" => {
            let category = required(&query.category, "category")?;
            let sub_category = required(&query.sub_category, "subcategory")?;
            let page = parse_page(query.page.as_deref());
            let rankings = state
                .queries
                .rankings_page(game, category, sub_category, page)
                .await?;
            let body: Vec<RankingResponse> =
                rankings.into_iter().map(RankingResponse::from).collect();
            Ok(Json(body).into_response())
        }
        _ => Err(ApiError::BadRequest("unknown command".to_string())),
    }
}
