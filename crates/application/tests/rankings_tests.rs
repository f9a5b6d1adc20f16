//! Tests for the leaderboard read service

use std::sync::Arc;

use rankings_application::{
    ApplicationError, CategoryRegistration, RankingQueryService, RankingStore,
    SubCategoryRegistration,
};
use rankings_domain::{CategoryId, GameId, PlayerId, SubCategoryId};
use rankings_testing::{
    create_test_profile, small_catalog, InMemoryRankingStore, LeaderboardBuilder,
};

async fn register(
    store: &InMemoryRankingStore,
    category: &str,
    game: Option<&str>,
    subs: &[(&str, Option<&str>)],
) {
    store
        .upsert_category(&CategoryRegistration {
            category_id: CategoryId::from(category),
            game: game.map(GameId::from),
            ordinal: store.categories().len() as i32,
            periodic: false,
        })
        .await
        .unwrap();
    for (ordinal, (sub, sub_game)) in subs.iter().enumerate() {
        store
            .upsert_sub_category(&SubCategoryRegistration {
                category_id: CategoryId::from(category),
                sub_category_id: SubCategoryId::from(*sub),
                game: sub_game.map(GameId::from),
                ordinal: ordinal as i32,
            })
            .await
            .unwrap();
    }
}

fn service(store: Arc<InMemoryRankingStore>) -> RankingQueryService {
    RankingQueryService::new(store as Arc<dyn RankingStore>, small_catalog())
}

#[tokio::test]
async fn test_list_categories_hides_other_games_and_empty_subcategories() {
    // Arrange
    let store = Arc::new(InMemoryRankingStore::new());
    register(&store, "bp", None, &[("all", None), ("2kki", Some("2kki")), ("yume", Some("yume"))]).await;
    register(&store, "minigame", Some("yume"), &[("rby", Some("yume"))]).await;
    register(&store, "timeTrial", Some("2kki"), &[("143", Some("2kki"))]).await;
    store.seed_entries(LeaderboardBuilder::new("bp", "all").with_players(60).build());
    store.seed_entries(LeaderboardBuilder::new("bp", "yume").with_players(2).build());

    // Act
    let listing = service(store).list_categories("yume").await.unwrap();

    // Assert
    let ids: Vec<_> = listing.iter().map(|c| c.category_id.to_string()).collect();
    assert_eq!(ids, vec!["bp", "minigame"]);
    let bp_subs: Vec<_> = listing[0]
        .sub_categories
        .iter()
        .map(|s| (s.sub_category_id.to_string(), s.page_count))
        .collect();
    assert_eq!(
        bp_subs,
        vec![("all".to_string(), 3), ("yume".to_string(), 1)]
    );
    assert!(listing[1].sub_categories.is_empty());
}

#[tokio::test]
async fn test_list_categories_rejects_unknown_game() {
    let store = Arc::new(InMemoryRankingStore::new());

    let result = service(store).list_categories("unknown").await;

    assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
}

#[tokio::test]
async fn test_player_page_follows_actual_position() {
    // Arrange
    let store = Arc::new(InMemoryRankingStore::new());
    store.seed_entries(LeaderboardBuilder::new("exp", "all").with_players(1100).build());
    let service = service(store);

    // Act & Assert
    let page = |player: &'static str| {
        let service = service.clone();
        async move {
            service
                .player_page(Some(&PlayerId::from(player)), "exp", "all")
                .await
                .unwrap()
        }
    };
    assert_eq!(page("player-0001").await, 1);
    assert_eq!(page("player-0025").await, 1);
    assert_eq!(page("player-0026").await, 2);
    assert_eq!(page("player-1000").await, 40);
    // Players past the kept range have no entry
    assert_eq!(page("player-1050").await, 1);
}

#[tokio::test]
async fn test_player_page_without_player_is_first_page() {
    let store = Arc::new(InMemoryRankingStore::new());

    let page = service(store).player_page(None, "bogus", "").await.unwrap();

    assert_eq!(page, 1);
}

#[tokio::test]
async fn test_player_page_rejects_unknown_category() {
    let store = Arc::new(InMemoryRankingStore::new());

    let result = service(store)
        .player_page(Some(&PlayerId::from("p")), "speedrun", "all")
        .await;

    assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
}

#[tokio::test]
async fn test_rankings_page_returns_profiles_in_order() {
    // Arrange
    let store = Arc::new(InMemoryRankingStore::new());
    store.seed_entries(LeaderboardBuilder::new("bp", "all").with_players(30).build());
    let profile = create_test_profile();
    store.set_profile("player-0026", profile.clone());
    let service = service(store);

    // Act
    let first = service.rankings_page("2kki", "bp", "all", 0).await.unwrap();
    let second = service.rankings_page("2kki", "bp", "all", 2).await.unwrap();

    // Assert
    assert_eq!(first.len(), 25);
    assert_eq!(first[0].position, 1);
    assert_eq!(second.len(), 5);
    assert_eq!(second[0].name, profile.name);
    assert_eq!(second[0].position, 26);
    assert_eq!(second[0].medals, [0; 5]);
}

#[tokio::test]
async fn test_rankings_page_beyond_last_page_is_empty() {
    let store = Arc::new(InMemoryRankingStore::new());
    store.seed_entries(LeaderboardBuilder::new("bp", "all").with_players(10).build());
    let service = service(store);

    assert!(service.rankings_page("2kki", "bp", "all", 2).await.unwrap().is_empty());
    assert!(service.rankings_page("2kki", "bp", "all", 41).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rankings_page_requires_subcategory() {
    let store = Arc::new(InMemoryRankingStore::new());

    let result = service(store).rankings_page("2kki", "bp", "", 1).await;

    assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
}

#[tokio::test]
async fn test_store_outage_surfaces_as_unavailable() {
    let store = Arc::new(InMemoryRankingStore::new());
    store.set_unavailable(true);

    let result = service(store).rankings_page("2kki", "bp", "all", 1).await;

    assert!(matches!(result, Err(ApplicationError::StoreUnavailable(_))));
}

#[tokio::test]
async fn test_player_without_account_keeps_later_pages_aligned() {
    // Arrange
    let store = Arc::new(InMemoryRankingStore::new());
    store.seed_entries(LeaderboardBuilder::new("exp", "all").with_players(30).build());
    store.remove_account("player-0003");
    let service = service(store);

    // Act
    let first = service.rankings_page("2kki", "exp", "all", 1).await.unwrap();
    let second = service.rankings_page("2kki", "exp", "all", 2).await.unwrap();
    let page = service
        .player_page(Some(&PlayerId::from("player-0026")), "exp", "all")
        .await
        .unwrap();

    // Assert
    assert_eq!(first.len(), 25);
    assert_eq!(first[2].name, "");
    assert_eq!(first[2].position, 3);
    assert_eq!(page, 2);
    let names: Vec<_> = second.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["player-0026", "player-0027", "player-0028", "player-0029", "player-0030"]
    );
}
