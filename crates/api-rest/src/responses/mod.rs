//! Standardized API response types.
//!
//! Wire types keep the field names the game clients already read, so the
//! legacy endpoint and the v1 routes serialize leaderboards identically.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use rankings_domain::{CategoryListing, Ranking, RankingSubCategory, RankingValue};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Indicates if the request was successful
    pub success: bool,

    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// A ranking category with the subcategories that hold entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    /// Storage id, e.g. `badgeCount` or `freeEventLocationCount_yume`
    pub category_id: String,
    /// Owning game; empty for shared categories
    pub game: String,
    /// Subcategories in display order
    pub sub_categories: Vec<SubCategoryResponse>,
}

/// A leaderboard within a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryResponse {
    /// `all`, a period ordinal, a game, a map id or a minigame id
    pub sub_category_id: String,
    /// Owning game; empty when visible to every game
    pub game: String,
    /// Number of 25-row pages, at most 40
    pub page_count: u32,
}

impl From<RankingSubCategory> for SubCategoryResponse {
    fn from(sub_category: RankingSubCategory) -> Self {
        Self {
            sub_category_id: sub_category.sub_category_id.to_string(),
            game: sub_category.game.map(|g| g.to_string()).unwrap_or_default(),
            page_count: sub_category.page_count,
        }
    }
}

impl From<CategoryListing> for CategoryResponse {
    fn from(listing: CategoryListing) -> Self {
        Self {
            category_id: listing.category_id.to_string(),
            game: listing.game.map(|g| g.to_string()).unwrap_or_default(),
            sub_categories: listing
                .sub_categories
                .into_iter()
                .map(SubCategoryResponse::from)
                .collect(),
        }
    }
}

/// One leaderboard row.
///
/// Exactly one of `valueInt` and `valueFloat` is meaningful, depending on the
/// category; the other is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingResponse {
    /// Competition rank
    pub position: u32,
    /// Player display name
    pub name: String,
    /// Account rank
    pub rank: i32,
    /// Equipped badge
    pub badge: String,
    /// UI system graphic
    pub system_name: String,
    /// Bronze, silver, gold, platinum and diamond counts
    #[schema(value_type = Vec<u32>)]
    pub medals: [u32; 5],
    /// Integer value
    pub value_int: i64,
    /// Float value
    pub value_float: f64,
}

impl From<Ranking> for RankingResponse {
    fn from(ranking: Ranking) -> Self {
        let (value_int, value_float) = match ranking.value {
            RankingValue::Int(v) => (v, 0.0),
            RankingValue::Float(v) => (0, v),
        };
        Self {
            position: ranking.position,
            name: ranking.name,
            rank: ranking.account_rank,
            badge: ranking.badge,
            system_name: ranking.system_name,
            medals: ranking.medals,
            value_int,
            value_float,
        }
    }
}

/// A page of a leaderboard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RankingsPageResponse {
    /// Page served (1-based)
    pub page: u32,
    /// Rows ordered by actual position
    pub rankings: Vec<RankingResponse>,
}

/// Page on which the requesting player appears
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlayerPageResponse {
    /// 1-based page; 1 for anonymous callers and unranked players
    pub page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankings_domain::{CategoryId, GameId};

    fn ranking(value: RankingValue) -> Ranking {
        Ranking {
            position: 2,
            name: "alice".to_string(),
            account_rank: 1,
            badge: "null".to_string(),
            system_name: "0000000000".to_string(),
            medals: [0, 1, 2, 0, 1],
            value,
        }
    }

    #[test]
    fn test_ranking_splits_value_by_kind() {
        let int = RankingResponse::from(ranking(RankingValue::Int(42)));
        assert_eq!((int.value_int, int.value_float), (42, 0.0));

        let float = RankingResponse::from(ranking(RankingValue::Float(0.75)));
        assert_eq!((float.value_int, float.value_float), (0, 0.75));
    }

    #[test]
    fn test_ranking_wire_names() {
        let json = serde_json::to_value(RankingResponse::from(ranking(RankingValue::Int(3)))).unwrap();
        assert_eq!(json["systemName"], "0000000000");
        assert_eq!(json["rank"], 1);
        assert_eq!(json["valueInt"], 3);
        assert_eq!(json["medals"], serde_json::json!([0, 1, 2, 0, 1]));
    }

    #[test]
    fn test_category_listing_conversion() {
        let mut sub = RankingSubCategory::new("143", Some(GameId::from("2kki")));
        sub.page_count = 2;
        let listing = CategoryListing {
            category_id: CategoryId::from("timeTrial"),
            game: None,
            sub_categories: vec![sub],
        };

        let json = serde_json::to_value(CategoryResponse::from(listing)).unwrap();
        assert_eq!(json["categoryId"], "timeTrial");
        assert_eq!(json["game"], "");
        assert_eq!(json["subCategories"][0]["game"], "2kki");
        assert_eq!(json["subCategories"][0]["pageCount"], 2);
    }
}
