//! In-memory implementations of the application ports.
//!
//! Provides score sources and ranking stores for testing without a database.
//! Each mock can be told to fail so error paths can be exercised.

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use rankings_application::{
    AggregationQuery, ApplicationError, ApplicationResult, CategoryRegistration, MedalCandidate,
    RankingStore, ScoreSource, SessionLookup, SubCategoryRegistration,
};
use rankings_domain::{
    paging, CategoryId, CategoryListing, EventPeriod, GameId, MedalCounts, PlayerId, PlayerScore,
    Ranking, RankingEntry, RankingSubCategory, SubCategoryId,
};
use std::collections::{HashMap, HashSet};

fn unavailable(what: &str) -> ApplicationError {
    ApplicationError::StoreUnavailable(format!("{what} failed (injected)"))
}

/// Score source serving canned aggregation results
#[derive(Default)]
pub struct InMemoryScoreSource {
    scores: RwLock<HashMap<AggregationQuery, Vec<PlayerScore>>>,
    periods: RwLock<HashMap<GameId, Vec<EventPeriod>>>,
    time_trial_maps: RwLock<HashMap<GameId, Vec<i32>>>,
    minigames: RwLock<HashMap<GameId, Vec<String>>>,
    failing_queries: RwLock<HashSet<AggregationQuery>>,
    failing_period_games: RwLock<HashSet<GameId>>,
    queries: RwLock<Vec<AggregationQuery>>,
}

impl InMemoryScoreSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores returned for `query`
    pub fn set_scores(&self, query: AggregationQuery, scores: Vec<PlayerScore>) {
        self.scores.write().insert(query, scores);
    }

    pub fn set_periods(&self, game: impl Into<GameId>, periods: Vec<EventPeriod>) {
        self.periods.write().insert(game.into(), periods);
    }

    pub fn set_time_trial_maps(&self, game: impl Into<GameId>, map_ids: Vec<i32>) {
        self.time_trial_maps.write().insert(game.into(), map_ids);
    }

    pub fn set_minigames(&self, game: impl Into<GameId>, minigame_ids: Vec<&str>) {
        self.minigames.write().insert(
            game.into(),
            minigame_ids.into_iter().map(String::from).collect(),
        );
    }

    /// Make `query` fail with an unavailable-store error
    pub fn fail_query(&self, query: AggregationQuery) {
        self.failing_queries.write().insert(query);
    }

    /// Make period discovery fail for `game`
    pub fn fail_periods_for(&self, game: impl Into<GameId>) {
        self.failing_period_games.write().insert(game.into());
    }

    /// Every query aggregated so far, in call order
    pub fn aggregated_queries(&self) -> Vec<AggregationQuery> {
        self.queries.read().clone()
    }
}

#[async_trait]
impl ScoreSource for InMemoryScoreSource {
    async fn aggregate(
        &self,
        query: &AggregationQuery,
        _limit: usize,
    ) -> ApplicationResult<Vec<PlayerScore>> {
        self.queries.write().push(query.clone());
        if self.failing_queries.read().contains(query) {
            return Err(unavailable("aggregate"));
        }
        // Canned scores are unsorted; the ranker applies the limit
        Ok(self.scores.read().get(query).cloned().unwrap_or_default())
    }

    async fn event_periods(&self, game: &GameId) -> ApplicationResult<Vec<EventPeriod>> {
        if self.failing_period_games.read().contains(game) {
            return Err(unavailable("event periods"));
        }
        Ok(self.periods.read().get(game).cloned().unwrap_or_default())
    }

    async fn current_period_ordinal(&self, today: NaiveDate) -> ApplicationResult<Option<i32>> {
        let periods = self.periods.read();
        Ok(EventPeriod::current_ordinal(periods.values().flatten(), today))
    }

    async fn time_trial_map_ids(&self, game: &GameId) -> ApplicationResult<Vec<i32>> {
        Ok(self.time_trial_maps.read().get(game).cloned().unwrap_or_default())
    }

    async fn minigame_ids(&self, game: &GameId) -> ApplicationResult<Vec<String>> {
        let mut ids = self.minigames.read().get(game).cloned().unwrap_or_default();
        ids.sort();
        Ok(ids)
    }
}

/// Profile data joined into leaderboard pages
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerProfile {
    pub name: String,
    pub account_rank: i32,
    pub badge: String,
    pub system_name: String,
}

impl PlayerProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            account_rank: 0,
            badge: "null".to_string(),
            system_name: String::new(),
        }
    }

    /// Profile columns of a ranked player with no account row
    pub fn without_account() -> Self {
        Self::named("")
    }
}

/// Ranking store kept in process memory
#[derive(Default)]
pub struct InMemoryRankingStore {
    categories: RwLock<Vec<CategoryRegistration>>,
    sub_categories: RwLock<Vec<SubCategoryRegistration>>,
    entries: RwLock<HashMap<(CategoryId, SubCategoryId), Vec<RankingEntry>>>,
    profiles: RwLock<HashMap<PlayerId, PlayerProfile>>,
    accountless: RwLock<HashSet<PlayerId>>,
    medals: RwLock<HashMap<(GameId, PlayerId), MedalCounts>>,
    failing_categories: RwLock<HashSet<CategoryId>>,
    unavailable: RwLock<bool>,
}

impl InMemoryRankingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every entry replacement for `category_id` fail
    pub fn fail_replace_for(&self, category_id: impl Into<CategoryId>) {
        self.failing_categories.write().insert(category_id.into());
    }

    /// Make every read fail
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write() = unavailable;
    }

    pub fn set_profile(&self, player_id: impl Into<PlayerId>, profile: PlayerProfile) {
        self.profiles.write().insert(player_id.into(), profile);
    }

    /// Rank `player_id` without an account; pages show empty profile columns
    pub fn remove_account(&self, player_id: impl Into<PlayerId>) {
        self.accountless.write().insert(player_id.into());
    }

    /// Store entries directly, bypassing the engine
    pub fn seed_entries(&self, entries: Vec<RankingEntry>) {
        let mut stored = self.entries.write();
        for entry in entries {
            stored
                .entry((entry.category_id.clone(), entry.sub_category_id.clone()))
                .or_default()
                .push(entry);
        }
    }

    /// Stored entries of one leaderboard ordered by actual position
    pub fn entries(&self, category_id: &str, sub_category_id: &str) -> Vec<RankingEntry> {
        let key = (CategoryId::from(category_id), SubCategoryId::from(sub_category_id));
        let mut entries = self.entries.read().get(&key).cloned().unwrap_or_default();
        entries.sort_by_key(|e| e.actual_position);
        entries
    }

    pub fn medals(&self, game: &str, player_id: &str) -> Option<MedalCounts> {
        self.medals
            .read()
            .get(&(GameId::from(game), PlayerId::from(player_id)))
            .cloned()
    }

    pub fn categories(&self) -> Vec<CategoryRegistration> {
        self.categories.read().clone()
    }

    pub fn sub_categories(&self) -> Vec<SubCategoryRegistration> {
        self.sub_categories.read().clone()
    }

    fn check_available(&self) -> ApplicationResult<()> {
        if *self.unavailable.read() {
            return Err(unavailable("store"));
        }
        Ok(())
    }

    fn visible_to(owner: &Option<GameId>, game: &GameId) -> bool {
        owner.as_ref().map_or(true, |g| g == game)
    }
}

#[async_trait]
impl RankingStore for InMemoryRankingStore {
    async fn upsert_category(&self, registration: &CategoryRegistration) -> ApplicationResult<()> {
        self.check_available()?;
        let mut categories = self.categories.write();
        match categories
            .iter_mut()
            .find(|c| c.category_id == registration.category_id && c.game == registration.game)
        {
            Some(existing) => *existing = registration.clone(),
            None => categories.push(registration.clone()),
        }
        Ok(())
    }

    async fn upsert_sub_category(
        &self,
        registration: &SubCategoryRegistration,
    ) -> ApplicationResult<()> {
        self.check_available()?;
        let mut sub_categories = self.sub_categories.write();
        match sub_categories.iter_mut().find(|s| {
            s.category_id == registration.category_id
                && s.sub_category_id == registration.sub_category_id
                && s.game == registration.game
        }) {
            Some(existing) => existing.ordinal = registration.ordinal,
            None => sub_categories.push(registration.clone()),
        }
        Ok(())
    }

    async fn replace_entries(
        &self,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
        entries: &[RankingEntry],
    ) -> ApplicationResult<usize> {
        self.check_available()?;
        if self.failing_categories.read().contains(category_id) {
            return Err(unavailable("replace entries"));
        }
        self.entries.write().insert(
            (category_id.clone(), sub_category_id.clone()),
            entries.to_vec(),
        );
        Ok(entries.len())
    }

    async fn list_categories(&self, game: &GameId) -> ApplicationResult<Vec<CategoryListing>> {
        self.check_available()?;
        let mut categories: Vec<_> = self
            .categories
            .read()
            .iter()
            .filter(|c| Self::visible_to(&c.game, game))
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.ordinal);

        let mut sub_categories = self.sub_categories.read().clone();
        sub_categories.sort_by_key(|s| s.ordinal);
        let entries = self.entries.read();

        Ok(categories
            .into_iter()
            .map(|category| {
                let sub_categories = sub_categories
                    .iter()
                    .filter(|s| {
                        s.category_id == category.category_id && Self::visible_to(&s.game, game)
                    })
                    .filter_map(|s| {
                        let count = entries
                            .get(&(s.category_id.clone(), s.sub_category_id.clone()))
                            .map_or(0, Vec::len);
                        (count > 0).then(|| RankingSubCategory {
                            sub_category_id: s.sub_category_id.clone(),
                            game: s.game.clone(),
                            page_count: paging::page_count(count as u64),
                        })
                    })
                    .collect();
                CategoryListing {
                    category_id: category.category_id,
                    game: category.game,
                    sub_categories,
                }
            })
            .collect())
    }

    async fn player_actual_position(
        &self,
        player_id: &PlayerId,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
    ) -> ApplicationResult<Option<u32>> {
        self.check_available()?;
        Ok(self
            .entries
            .read()
            .get(&(category_id.clone(), sub_category_id.clone()))
            .and_then(|entries| entries.iter().find(|e| &e.player_id == player_id))
            .map(|e| e.actual_position))
    }

    async fn rankings_page(
        &self,
        game: &GameId,
        category_id: &CategoryId,
        sub_category_id: &SubCategoryId,
        page: u32,
    ) -> ApplicationResult<Vec<Ranking>> {
        self.check_available()?;
        let mut entries = self
            .entries
            .read()
            .get(&(category_id.clone(), sub_category_id.clone()))
            .cloned()
            .unwrap_or_default();
        entries.sort_by_key(|e| e.actual_position);

        let profiles = self.profiles.read();
        let accountless = self.accountless.read();
        let medals = self.medals.read();
        let (first, last) = paging::page_bounds(page);

        Ok(entries
            .into_iter()
            .filter(|e| (first..=last).contains(&e.actual_position))
            .map(|entry| {
                let profile = if accountless.contains(&entry.player_id) {
                    PlayerProfile::without_account()
                } else {
                    profiles
                        .get(&entry.player_id)
                        .cloned()
                        .unwrap_or_else(|| PlayerProfile::named(entry.player_id.as_str()))
                };
                let counts = medals
                    .get(&(game.clone(), entry.player_id.clone()))
                    .cloned()
                    .unwrap_or_default();
                Ranking {
                    position: entry.position,
                    name: profile.name,
                    account_rank: profile.account_rank,
                    badge: profile.badge,
                    system_name: profile.system_name,
                    medals: counts.as_array(),
                    value: entry.value,
                }
            })
            .collect())
    }

    async fn medal_candidates(&self, game: &GameId) -> ApplicationResult<Vec<MedalCandidate>> {
        self.check_available()?;
        let categories = self.categories.read();
        let sub_categories = self.sub_categories.read();
        let entries = self.entries.read();

        let mut candidates = Vec::new();
        for ((category_id, sub_category_id), rows) in entries.iter() {
            let Some(category) = categories
                .iter()
                .filter(|c| &c.category_id == category_id && Self::visible_to(&c.game, game))
                .max_by_key(|c| c.game.is_some())
            else {
                continue;
            };
            let Some(sub_category) = sub_categories.iter().find(|s| {
                &s.category_id == category_id
                    && &s.sub_category_id == sub_category_id
                    && Self::visible_to(&s.game, game)
            }) else {
                continue;
            };

            candidates.extend(
                rows.iter()
                    .filter(|e| e.actual_position <= 100)
                    .map(|e| MedalCandidate {
                        player_id: e.player_id.clone(),
                        actual_position: e.actual_position,
                        category_id: category_id.clone(),
                        sub_category_id: sub_category_id.clone(),
                        category_game: category.game.clone(),
                        sub_category_game: sub_category.game.clone(),
                        periodic: category.periodic,
                    }),
            );
        }
        Ok(candidates)
    }

    async fn write_medals(
        &self,
        game: &GameId,
        tallies: &HashMap<PlayerId, MedalCounts>,
    ) -> ApplicationResult<()> {
        self.check_available()?;
        let mut medals = self.medals.write();
        for ((medal_game, _), counts) in medals.iter_mut() {
            if medal_game == game {
                *counts = MedalCounts::default();
            }
        }
        for (player_id, counts) in tallies {
            medals.insert((game.clone(), player_id.clone()), counts.clone());
        }
        Ok(())
    }
}

/// Session lookup backed by a token map
#[derive(Default)]
pub struct InMemorySessionLookup {
    sessions: RwLock<HashMap<String, PlayerId>>,
}

impl InMemorySessionLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: impl Into<String>, player_id: impl Into<PlayerId>) {
        self.sessions.write().insert(token.into(), player_id.into());
    }

    /// Expire a session
    pub fn remove(&self, token: &str) {
        self.sessions.write().remove(token);
    }
}

#[async_trait]
impl SessionLookup for InMemorySessionLookup {
    async fn player_for_token(&self, token: &str) -> ApplicationResult<Option<PlayerId>> {
        Ok(self.sessions.read().get(token).cloned())
    }
}
