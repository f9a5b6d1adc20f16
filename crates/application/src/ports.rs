//! Ports implemented by the infrastructure layer.

use crate::aggregation::AggregationQuery;
use crate::ApplicationResult;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rankings_domain::{
    CategoryId, CategoryListing, EventPeriod, GameId, MedalCounts, PlayerId, PlayerScore, Ranking,
    RankingEntry, SubCategoryId,
};
use std::collections::HashMap;

/// Read-only access to raw achievement facts
#[async_trait]
pub trait ScoreSource: Send + Sync {
    /// Aggregate one value per player for `query`.
    ///
    /// Implementations may drop non-positive values and may return only the
    /// best `limit` players, provided they order by value, then earliest
    /// achievement, then player id.
    async fn aggregate(
        &self,
        query: &AggregationQuery,
        limit: usize,
    ) -> ApplicationResult<Vec<PlayerScore>>;

    /// Event periods run by `game`
    async fn event_periods(&self, game: &GameId) -> ApplicationResult<Vec<EventPeriod>>;

    /// Ordinal of the period active on `today`, if any
    async fn current_period_ordinal(&self, today: NaiveDate) -> ApplicationResult<Option<i32>>;

    /// Time-trial map ids with at least one run, best time first
    async fn time_trial_map_ids(&self, game: &GameId) -> ApplicationResult<Vec<i32>>;

    /// Distinct minigame ids with scores for `game`, sorted
    async fn minigame_ids(&self, game: &GameId) -> ApplicationResult<Vec<String>>;
}

/// Category row written by the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistration {
    pub category_id: CategoryId,
    pub game: Option<GameId>,
    pub ordinal: i32,
    pub periodic: bool,
}

/// Subcategory row written by the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCategoryRegistration {
    pub category_id: CategoryId,
    pub sub_category_id: SubCategoryId,
    pub game: Option<GameId>,
    pub ordinal: i32,
}

/// A stored entry with the category metadata needed to decide medal eligibility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedalCandidate {
    pub player_id: PlayerId,
    pub actual_position: u32,
    pub category_id: CategoryId,
    pub sub_category_id: SubCategoryId,
    pub category_game: Option<GameId>,
    pub sub_category_game: Option<GameId>,
    pub periodic: bool,
}

/// Persistent store for categories, leaderboard entries and medal counters
#[async_trait]
pub trait RankingStore: Send + Sync {
    async fn upsert_category(&self, registration: &CategoryRegistration) -> ApplicationResult<()>;

    async fn upsert_sub_category(
        &self,
        registration: &SubCategoryRegistration,
    ) -> ApplicationResult<()>;

    /// Atomically replace every entry of one (category, subcategory).
    ///
    /// Readers observe either the previous or the new complete set.
    async fn replace_entries(
        &self,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
        entries: &[RankingEntry],
    ) -> ApplicationResult<usize>;

    /// Categories visible to `game` in display order, with the subcategories holding entries
    async fn list_categories(&self, game: &GameId) -> ApplicationResult<Vec<CategoryListing>>;

    async fn player_actual_position(
        &self,
        player_id: &PlayerId,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
    ) -> ApplicationResult<Option<u32>>;

    /// One page of rankings ordered by actual position
    async fn rankings_page(
        &self,
        game: &GameId,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
        page: u32,
    ) -> ApplicationResult<Vec<Ranking>>;

    /// Entries within medal range whose category or subcategory could count for `game`
    async fn medal_candidates(&self, game: &GameId) -> ApplicationResult<Vec<MedalCandidate>>;

    /// Overwrite the medal counters of every player for `game`.
    ///
    /// Players absent from `tallies` are reset to zero.
    async fn write_medals(
        &self,
        game: &GameId,
        tallies: &HashMap<PlayerId, MedalCounts>,
    ) -> ApplicationResult<()>;
}

/// Resolves session tokens sent by clients
#[async_trait]
pub trait SessionLookup: Send + Sync {
    /// Player owning an unexpired session, if any
    async fn player_for_token(&self, token: &str) -> ApplicationResult<Option<PlayerId>>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current UTC date
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
