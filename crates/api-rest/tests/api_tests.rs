//! Integration tests for the REST API
//!
//! Requests are driven through the full router, middleware included, against
//! in-memory stores.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use rankings_api_rest::{create_app, ApiConfig, AppState};
use rankings_application::{
    CategoryRegistration, RankingQueryService, RankingStore, SessionLookup,
    SubCategoryRegistration,
};
use rankings_domain::{CategoryId, GameId, SubCategoryId};
use rankings_testing::{
    small_catalog, InMemoryRankingStore, InMemorySessionLookup, LeaderboardBuilder, PlayerProfile,
};
use serde_json::Value;
use tower::ServiceExt;

struct TestApp {
    store: Arc<InMemoryRankingStore>,
    sessions: Arc<InMemorySessionLookup>,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let store = Arc::new(InMemoryRankingStore::new());
        let sessions = Arc::new(InMemorySessionLookup::new());

        store
            .upsert_category(&CategoryRegistration {
                category_id: CategoryId::from("bp"),
                game: None,
                ordinal: 0,
                periodic: false,
            })
            .await
            .unwrap();
        store
            .upsert_category(&CategoryRegistration {
                category_id: CategoryId::from("eventLocationCompletion"),
                game: Some(GameId::from("2kki")),
                ordinal: 1,
                periodic: false,
            })
            .await
            .unwrap();
        for (ordinal, (category, sub)) in [
            ("bp", "all"),
            ("eventLocationCompletion", "all"),
        ]
        .into_iter()
        .enumerate()
        {
            store
                .upsert_sub_category(&SubCategoryRegistration {
                    category_id: CategoryId::from(category),
                    sub_category_id: SubCategoryId::from(sub),
                    game: None,
                    ordinal: ordinal as i32,
                })
                .await
                .unwrap();
        }
        store.seed_entries(LeaderboardBuilder::new("bp", "all").with_players(60).build());
        store.set_profile("player-0001", PlayerProfile::named("Urotsuki"));

        let queries = RankingQueryService::new(
            Arc::clone(&store) as Arc<dyn RankingStore>,
            small_catalog(),
        );
        let state = AppState::new(queries, Arc::clone(&sessions) as Arc<dyn SessionLookup>);
        let router = create_app(&ApiConfig::default(), state);

        Self {
            store,
            sessions,
            router,
        }
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::builder().uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, token);
        }
        let response = self
            .router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get_json(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let (status, body) = self.get(uri, token).await;
        (status, serde_json::from_str(&body).unwrap())
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
}

#[tokio::test]
async fn test_ready_without_database() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/ready", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ready"], true);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_list_categories() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/api/v1/games/2kki/categories", None).await;

    assert_eq!(status, StatusCode::OK);
    let categories = body["data"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["categoryId"], "bp");
    assert_eq!(categories[0]["game"], "");
    assert_eq!(categories[0]["subCategories"][0]["subCategoryId"], "all");
    assert_eq!(categories[0]["subCategories"][0]["pageCount"], 3);
    assert_eq!(categories[1]["game"], "2kki");
    assert_eq!(categories[1]["subCategories"], serde_json::json!([]));
}

#[tokio::test]
async fn test_list_categories_hides_other_games() {
    let app = TestApp::new().await;

    let (_, body) = app.get_json("/api/v1/games/yume/categories", None).await;

    let ids: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["categoryId"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["bp"]);
}

#[tokio::test]
async fn test_unknown_game_is_bad_request() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/api/v1/games/unknown/categories", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_rankings_page() {
    let app = TestApp::new().await;

    let (status, body) = app
        .get_json("/api/v1/games/2kki/rankings/bp/all?page=2", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page"], 2);
    let rankings = body["data"]["rankings"].as_array().unwrap();
    assert_eq!(rankings.len(), 25);
    assert_eq!(rankings[0]["position"], 26);
    assert_eq!(rankings[0]["name"], "player-0026");
    assert_eq!(rankings[0]["valueInt"], 350);
    assert_eq!(rankings[0]["valueFloat"], 0.0);
}

#[tokio::test]
async fn test_malformed_page_defaults_to_first() {
    let app = TestApp::new().await;

    for uri in [
        "/api/v1/games/2kki/rankings/bp/all?page=abc",
        "/api/v1/games/2kki/rankings/bp/all?page=-3",
        "/api/v1/games/2kki/rankings/bp/all",
    ] {
        let (status, body) = app.get_json(uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["data"]["page"], 1, "{uri}");
        assert_eq!(body["data"]["rankings"][0]["name"], "Urotsuki", "{uri}");
    }
}

#[tokio::test]
async fn test_pages_past_the_end_are_empty() {
    let app = TestApp::new().await;

    for page in [4, 41] {
        let uri = format!("/api/v1/games/2kki/rankings/bp/all?page={page}");
        let (status, body) = app.get_json(&uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["rankings"], serde_json::json!([]));
    }
}

#[tokio::test]
async fn test_unknown_category_is_bad_request() {
    let app = TestApp::new().await;

    let (status, _) = app
        .get_json("/api/v1/games/2kki/rankings/speedrun/all", None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_player_page_follows_session() {
    let app = TestApp::new().await;
    app.sessions.insert("token-30", "player-0030");
    app.sessions.insert("token-ghost", "nobody");
    let uri = "/api/v1/rankings/bp/all/player-page";

    let (_, signed_in) = app.get_json(uri, Some("token-30")).await;
    let (_, bearer) = app.get_json(uri, Some("Bearer token-30")).await;
    let (_, anonymous) = app.get_json(uri, None).await;
    let (_, unranked) = app.get_json(uri, Some("token-ghost")).await;
    let (_, unknown_token) = app.get_json(uri, Some("expired")).await;

    assert_eq!(signed_in["data"]["page"], 2);
    assert_eq!(bearer["data"]["page"], 2);
    assert_eq!(anonymous["data"]["page"], 1);
    assert_eq!(unranked["data"]["page"], 1);
    assert_eq!(unknown_token["data"]["page"], 1);
}

#[tokio::test]
async fn test_store_outage_is_service_unavailable() {
    let app = TestApp::new().await;
    app.store.set_unavailable(true);

    let (status, body) = app.get_json("/api/v1/games/2kki/categories", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_legacy_categories_and_list() {
    let app = TestApp::new().await;

    let (status, categories) = app.get_json("/?game=2kki&command=categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories[0]["categoryId"], "bp");

    let (status, rankings) = app
        .get_json("/?game=2kki&command=list&category=bp&subCategory=all&page=3", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let rankings = rankings.as_array().unwrap();
    assert_eq!(rankings.len(), 10);
    assert_eq!(rankings[9]["position"], 60);
    assert_eq!(rankings[9]["valueInt"], 10);
}

#[tokio::test]
async fn test_legacy_page_is_plain_text() {
    let app = TestApp::new().await;
    app.sessions.insert("token-51", "player-0051");

    let (status, body) = app
        .get("/?game=2kki&command=page&category=bp&subCategory=all", Some("token-51"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "3");

    let (_, anonymous) = app
        .get("/?game=2kki&command=page&category=bp&subCategory=all", None)
        .await;
    assert_eq!(anonymous, "1");
}

#[tokio::test]
async fn test_legacy_errors() {
    let app = TestApp::new().await;

    let cases = [
        ("/?command=categories", "game not specified"),
        ("/?game=2kki", "command not specified"),
        ("/?game=2kki&command=page", "category not specified"),
        ("/?game=2kki&command=list&category=bp", "subcategory not specified"),
        ("/?game=2kki&command=drop", "unknown command"),
    ];
    for (uri, message) in cases {
        let (status, body) = app.get(uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, message, "{uri}");
    }
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = TestApp::new().await;

    let (status, doc) = app.get_json("/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/games/{game}/categories"].is_object());
    assert!(doc["components"]["securitySchemes"]["session_token"].is_object());
}
