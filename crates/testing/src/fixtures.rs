//! Test fixtures for generating domain values with realistic data.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fake::{faker::internet::en::Username, Fake};
use rankings_domain::{GameCatalog, GameId, PlayerId, PlayerScore, RankingValue};
use uuid::Uuid;

use crate::mocks::PlayerProfile;

/// UTC instant `seconds` after the Unix epoch
pub fn timestamp(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).single().unwrap_or_default()
}

/// A calendar date, panicking on invalid input
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// The default game catalog with `2kki` as primary
pub fn test_catalog() -> GameCatalog {
    GameCatalog::default()
}

/// A small catalog: primary `2kki` with time trials, plus `yume` and `flow`
pub fn small_catalog() -> GameCatalog {
    GameCatalog::new(
        vec![GameId::from("2kki"), GameId::from("yume"), GameId::from("flow")],
        GameId::from("2kki"),
        vec![GameId::from("2kki")],
    )
    .expect("valid test catalog")
}

/// A random player id
pub fn create_test_player_id() -> PlayerId {
    PlayerId::new(Uuid::new_v4().simple().to_string())
}

/// A player profile with a fake name
pub fn create_test_profile() -> PlayerProfile {
    let mut profile = PlayerProfile::named(Username().fake::<String>());
    profile.account_rank = (0..3).fake();
    profile.system_name = "0000000000".to_string();
    profile
}

/// `count` integer scores for random players with values `count..=1`
pub fn create_test_scores(count: usize) -> Vec<PlayerScore> {
    (0..count)
        .map(|i| {
            PlayerScore::new(
                create_test_player_id(),
                RankingValue::Int((count - i) as i64),
                timestamp(1_700_000_000 + i as i64),
            )
        })
        .collect()
}
