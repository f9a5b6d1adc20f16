//! Integration tests for the PostgreSQL repositories
//!
//! These tests require a PostgreSQL database and are marked with #[ignore] for CI.
//! Run with: TEST_DATABASE_URL=postgres://... cargo test --test repository_tests -- --ignored

use std::collections::HashMap;

use rankings_application::{
    AggregationQuery, CategoryRegistration, RankingStore, ScoreSource, SessionLookup,
    SubCategoryRegistration,
};
use rankings_domain::{paging, CategoryId, GameId, MedalCounts, PlayerId, SubCategoryId};
use rankings_infrastructure::{PgRankingStore, PgScoreSource, PgSessionLookup};
use rankings_testing::{database::TestDatabase, timestamp, LeaderboardBuilder};
use sqlx::PgPool;

async fn setup() -> TestDatabase {
    let db = TestDatabase::from_env()
        .await
        .expect("TEST_DATABASE_URL must point at a reachable database");
    db.clean().await.expect("Failed to clean test database");
    db
}

async fn seed_player(pool: &PgPool, player_id: &str, username: &str) {
    sqlx::query("INSERT INTO players (player_id, rank) VALUES ($1, 0)")
        .bind(player_id)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO accounts (player_id, username) VALUES ($1, $2)")
        .bind(player_id)
        .bind(username)
        .execute(pool)
        .await
        .unwrap();
}

async fn register(store: &PgRankingStore, category_id: &str, sub_category_id: &str) {
    store
        .upsert_category(&CategoryRegistration {
            category_id: CategoryId::from(category_id),
            game: None,
            ordinal: 0,
            periodic: false,
        })
        .await
        .unwrap();
    store
        .upsert_sub_category(&SubCategoryRegistration {
            category_id: CategoryId::from(category_id),
            sub_category_id: SubCategoryId::from(sub_category_id),
            game: None,
            ordinal: 0,
        })
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn test_replace_entries_backfills_actual_positions() {
    let db = setup().await;
    let store = PgRankingStore::new(db.pool().clone());
    for i in 1..=30 {
        seed_player(db.pool(), &format!("player-{:04}", i), &format!("user{}", i)).await;
    }
    register(&store, "badgeCount", "all").await;

    let entries = LeaderboardBuilder::new("badgeCount", "all")
        .with_players(30)
        .build();
    let written = store
        .replace_entries(&CategoryId::from("badgeCount"), &SubCategoryId::all(), &entries)
        .await
        .unwrap();
    assert_eq!(written, 30);

    let position = store
        .player_actual_position(
            &PlayerId::from("player-0027"),
            &CategoryId::from("badgeCount"),
            &SubCategoryId::all(),
        )
        .await
        .unwrap();
    assert_eq!(position, Some(27));
    assert_eq!(paging::page_for_position(27), 2);

    let second_page = store
        .rankings_page(
            &GameId::from("2kki"),
            &CategoryId::from("badgeCount"),
            &SubCategoryId::all(),
            2,
        )
        .await
        .unwrap();
    assert_eq!(second_page.len(), 5);
    assert_eq!(second_page[0].position, 26);
    assert_eq!(second_page[0].name, "user26");
    assert_eq!(second_page[0].medals, [0; 5]);
}

#[tokio::test]
#[ignore]
async fn test_rankings_page_includes_players_without_accounts() {
    let db = setup().await;
    let store = PgRankingStore::new(db.pool().clone());
    for i in (1..=30).filter(|i| *i != 3) {
        seed_player(db.pool(), &format!("player-{:04}", i), &format!("user{}", i)).await;
    }
    register(&store, "exp", "all").await;

    let category_id = CategoryId::from("exp");
    let entries = LeaderboardBuilder::new("exp", "all").with_players(30).build();
    store
        .replace_entries(&category_id, &SubCategoryId::all(), &entries)
        .await
        .unwrap();

    let game = GameId::from("2kki");
    let first = store
        .rankings_page(&game, &category_id, &SubCategoryId::all(), 1)
        .await
        .unwrap();
    assert_eq!(first.len(), 25);
    assert_eq!(first[2].name, "");
    assert_eq!(first[2].badge, "null");

    let second = store
        .rankings_page(&game, &category_id, &SubCategoryId::all(), 2)
        .await
        .unwrap();
    let names: Vec<_> = second.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["user26", "user27", "user28", "user29", "user30"]);
}

#[tokio::test]
#[ignore]
async fn test_replace_entries_discards_previous_set() {
    let db = setup().await;
    let store = PgRankingStore::new(db.pool().clone());
    for i in 1..=5 {
        seed_player(db.pool(), &format!("player-{:04}", i), &format!("user{}", i)).await;
    }
    register(&store, "exp", "all").await;

    let category_id = CategoryId::from("exp");
    let first = LeaderboardBuilder::new("exp", "all").with_players(5).build();
    store
        .replace_entries(&category_id, &SubCategoryId::all(), &first)
        .await
        .unwrap();

    let second = LeaderboardBuilder::new("exp", "all").with_players(2).build();
    store
        .replace_entries(&category_id, &SubCategoryId::all(), &second)
        .await
        .unwrap();

    let listing = store.list_categories(&GameId::from("2kki")).await.unwrap();
    let exp = listing
        .iter()
        .find(|c| c.category_id.as_str() == "exp")
        .unwrap();
    assert_eq!(exp.sub_categories.len(), 1);
    assert_eq!(exp.sub_categories[0].page_count, 1);

    let gone = store
        .player_actual_position(&PlayerId::from("player-0005"), &category_id, &SubCategoryId::all())
        .await
        .unwrap();
    assert_eq!(gone, None);
}

#[tokio::test]
#[ignore]
async fn test_write_medals_resets_absent_players() {
    let db = setup().await;
    let store = PgRankingStore::new(db.pool().clone());
    seed_player(db.pool(), "alice", "alice").await;
    seed_player(db.pool(), "bob", "bob").await;
    let game = GameId::from("2kki");

    let mut tallies = HashMap::new();
    tallies.insert(PlayerId::from("alice"), MedalCounts { gold: 2, ..Default::default() });
    tallies.insert(PlayerId::from("bob"), MedalCounts { bronze: 1, ..Default::default() });
    store.write_medals(&game, &tallies).await.unwrap();

    tallies.remove(&PlayerId::from("bob"));
    store.write_medals(&game, &tallies).await.unwrap();

    let rows: Vec<(String, i32, i32)> = sqlx::query_as(
        "SELECT player_id, medal_count_gold, medal_count_bronze FROM player_game_data \
         WHERE game = $1 ORDER BY player_id",
    )
    .bind(game.as_str())
    .fetch_all(db.pool())
    .await
    .unwrap();
    assert_eq!(
        rows,
        vec![("alice".to_string(), 2, 0), ("bob".to_string(), 0, 0)]
    );
}

#[tokio::test]
#[ignore]
async fn test_time_trial_aggregation_keeps_fastest_run() {
    let db = setup().await;
    let source = PgScoreSource::new(db.pool().clone());
    seed_player(db.pool(), "alice", "alice").await;
    seed_player(db.pool(), "bob", "bob").await;

    let runs = [
        ("alice", 95, 10),
        ("alice", 80, 20),
        ("bob", 80, 5),
        ("bob", 120, 1),
    ];
    for (player_id, seconds, at) in runs {
        sqlx::query(
            "INSERT INTO player_time_trials (player_id, game, map_id, seconds, completed_at) \
             VALUES ($1, '2kki', 143, $2, $3)",
        )
        .bind(player_id)
        .bind(seconds)
        .bind(timestamp(at))
        .execute(db.pool())
        .await
        .unwrap();
    }

    let query = AggregationQuery::TimeTrial {
        game: GameId::from("2kki"),
        map_id: 143,
    };
    let scores = source.aggregate(&query, paging::MAX_ENTRIES).await.unwrap();
    let players: Vec<_> = scores
        .iter()
        .map(|s| (s.player_id.as_str(), s.value.as_int()))
        .collect();
    assert_eq!(players, vec![("bob", 80), ("alice", 80)]);
    assert_eq!(scores[0].achieved_at, timestamp(5));

    let maps = source.time_trial_map_ids(&GameId::from("2kki")).await.unwrap();
    assert_eq!(maps, vec![143]);
}

#[tokio::test]
#[ignore]
async fn test_session_lookup_ignores_expired_sessions() {
    let db = setup().await;
    let lookup = PgSessionLookup::new(db.pool().clone());
    seed_player(db.pool(), "alice", "alice").await;

    for (session_id, offset) in [("live", "1 hour"), ("stale", "-1 hour")] {
        sqlx::query(
            "INSERT INTO player_sessions (session_id, player_id, expiration) \
             VALUES ($1, 'alice', NOW() + $2::INTERVAL)",
        )
        .bind(session_id)
        .bind(offset)
        .execute(db.pool())
        .await
        .unwrap();
    }

    assert_eq!(
        lookup.player_for_token("live").await.unwrap(),
        Some(PlayerId::from("alice"))
    );
    assert_eq!(lookup.player_for_token("stale").await.unwrap(), None);
    assert_eq!(lookup.player_for_token("").await.unwrap(), None);
}
