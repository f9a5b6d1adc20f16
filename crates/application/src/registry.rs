//! Category registry.
//!
//! The registry lists, per game, the ranking categories and subcategories to
//! maintain. It is discovered from the score source (event periods, time-trial
//! maps, minigames) and persisted so readers can list categories.

use crate::ports::{CategoryRegistration, RankingStore, ScoreSource, SubCategoryRegistration};
use rankings_domain::{
    CategoryKind, EventPeriod, GameCatalog, GameId, RankingCategory, RankingSubCategory,
    SubCategoryId,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Categories registered for one game, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct GameRegistry {
    pub game: GameId,
    pub categories: Vec<RankingCategory>,
}

impl GameRegistry {
    pub fn category(&self, kind: CategoryKind) -> Option<&RankingCategory> {
        self.categories.iter().find(|c| c.kind == kind)
    }
}

/// Registry for every configured game
#[derive(Debug, Clone)]
pub struct Registry {
    catalog: GameCatalog,
    games: Vec<GameRegistry>,
}

/// Counts from persisting a registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistSummary {
    pub categories: usize,
    pub sub_categories: usize,
    pub failures: usize,
}

impl Registry {
    pub fn new(catalog: GameCatalog, games: Vec<GameRegistry>) -> Self {
        Self { catalog, games }
    }

    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    /// Per-game registries in catalog order
    pub fn games(&self) -> &[GameRegistry] {
        &self.games
    }

    pub fn game(&self, game: &GameId) -> Option<&GameRegistry> {
        self.games.iter().find(|g| &g.game == game)
    }

    /// Category and subcategory rows to store.
    ///
    /// Shared periodic categories carry the same subcategories for every game
    /// running events, so only the primary game's copy is written.
    pub fn registrations(&self) -> (Vec<CategoryRegistration>, Vec<SubCategoryRegistration>) {
        let mut categories = Vec::new();
        let mut sub_categories = Vec::new();

        for registry in &self.games {
            let is_primary = self.catalog.is_primary(&registry.game);
            for (ordinal, category) in registry.categories.iter().enumerate() {
                if !category.separate_by_game
                    && category.periodic
                    && category.game.is_none()
                    && !is_primary
                {
                    continue;
                }
                let category_id = category.category_id();
                categories.push(CategoryRegistration {
                    category_id: category_id.clone(),
                    game: category.game.clone(),
                    ordinal: ordinal as i32,
                    periodic: category.periodic,
                });
                for (sub_ordinal, sub_category) in category.sub_categories.iter().enumerate() {
                    sub_categories.push(SubCategoryRegistration {
                        category_id: category_id.clone(),
                        sub_category_id: sub_category.sub_category_id.clone(),
                        game: sub_category.game.clone(),
                        ordinal: sub_ordinal as i32,
                    });
                }
            }
        }

        (categories, sub_categories)
    }

    /// Upsert every registration; individual failures are logged and skipped
    #[instrument(skip(self, store))]
    pub async fn persist(&self, store: &dyn RankingStore) -> PersistSummary {
        let (categories, sub_categories) = self.registrations();
        let mut summary = PersistSummary::default();

        for registration in &categories {
            match store.upsert_category(registration).await {
                Ok(()) => summary.categories += 1,
                Err(e) => {
                    summary.failures += 1;
                    warn!(
                        category_id = %registration.category_id,
                        error = %e,
                        "Failed to persist ranking category"
                    );
                }
            }
        }

        for registration in &sub_categories {
            match store.upsert_sub_category(registration).await {
                Ok(()) => summary.sub_categories += 1,
                Err(e) => {
                    summary.failures += 1;
                    warn!(
                        category_id = %registration.category_id,
                        sub_category_id = %registration.sub_category_id,
                        error = %e,
                        "Failed to persist ranking subcategory"
                    );
                }
            }
        }

        info!(
            categories = summary.categories,
            sub_categories = summary.sub_categories,
            failures = summary.failures,
            "Persisted ranking registry"
        );
        summary
    }
}

/// Discovers categories from the score source
pub struct RegistryBuilder {
    source: Arc<dyn ScoreSource>,
    catalog: GameCatalog,
}

impl RegistryBuilder {
    pub fn new(source: Arc<dyn ScoreSource>, catalog: GameCatalog) -> Self {
        Self { source, catalog }
    }

    /// Build the registry for every configured game
    pub async fn build(&self) -> Registry {
        let mut games = Vec::with_capacity(self.catalog.games().len());
        for game in self.catalog.games() {
            games.push(self.build_game(game).await);
        }
        Registry::new(self.catalog.clone(), games)
    }

    /// Build one game's categories.
    ///
    /// A failing discovery step drops only the categories it feeds.
    #[instrument(skip(self), fields(game = %game))]
    pub async fn build_game(&self, game: &GameId) -> GameRegistry {
        let mut categories = Vec::new();

        for kind in [CategoryKind::Bp, CategoryKind::BadgeCount] {
            let mut category = RankingCategory::shared(kind);
            category.push(RankingSubCategory::new(SubCategoryId::all(), None));
            category.push(RankingSubCategory::new(game.as_str(), Some(game.clone())));
            categories.push(category);
        }

        match self.source.event_periods(game).await {
            Ok(mut periods) if !periods.is_empty() => {
                periods.sort_by_key(|p| p.period_ordinal);
                categories.extend(self.periodic_categories(game, &periods));
            }
            Ok(_) => debug!("No event periods"),
            Err(e) => warn!(category = "exp", error = %e, "Failed to load event periods"),
        }

        if self.catalog.has_time_trials(game) {
            match self.source.time_trial_map_ids(game).await {
                Ok(map_ids) if !map_ids.is_empty() => {
                    let mut category = RankingCategory::owned_by(CategoryKind::TimeTrial, game.clone());
                    for map_id in map_ids {
                        category.push(RankingSubCategory::new(map_id.to_string(), Some(game.clone())));
                    }
                    categories.push(category);
                }
                Ok(_) => debug!("No time trial runs"),
                Err(e) => warn!(category = "timeTrial", error = %e, "Failed to load time trial maps"),
            }
        }

        match self.source.minigame_ids(game).await {
            Ok(minigame_ids) => {
                let mut category = RankingCategory::owned_by(CategoryKind::Minigame, game.clone());
                for minigame_id in minigame_ids {
                    category.push(RankingSubCategory::new(minigame_id, Some(game.clone())));
                }
                categories.push(category);
            }
            Err(e) => warn!(category = "minigame", error = %e, "Failed to load minigame ids"),
        }

        debug!(categories = categories.len(), "Built game registry");
        GameRegistry {
            game: game.clone(),
            categories,
        }
    }

    fn periodic_categories(&self, game: &GameId, periods: &[EventPeriod]) -> Vec<RankingCategory> {
        let multiple_periods = periods.len() > 1;
        let ordinals = |owner: Option<&GameId>| {
            let mut subs = Vec::with_capacity(periods.len() + 1);
            if multiple_periods {
                subs.push(RankingSubCategory::new(SubCategoryId::all(), owner.cloned()));
            }
            subs.extend(
                periods
                    .iter()
                    .map(|p| RankingSubCategory::new(p.period_ordinal.to_string(), owner.cloned())),
            );
            subs
        };

        let mut categories = Vec::new();

        for kind in [CategoryKind::Exp, CategoryKind::EventLocationCount] {
            let mut category = RankingCategory::shared(kind);
            category.sub_categories = ordinals(None);
            categories.push(category);
        }

        let mut free = RankingCategory::owned_by(CategoryKind::FreeEventLocationCount, game.clone());
        free.sub_categories = ordinals(Some(game));
        categories.push(free);

        if self.catalog.is_primary(game) {
            let mut completion =
                RankingCategory::owned_by(CategoryKind::EventLocationCompletion, game.clone());
            completion.sub_categories = ordinals(Some(game));
            categories.push(completion);
        }

        let mut vms = RankingCategory::shared(CategoryKind::EventVmCount);
        vms.sub_categories = periods
            .iter()
            .filter(|p| p.enable_vms)
            .map(|p| RankingSubCategory::new(p.period_ordinal.to_string(), None))
            .collect();
        if vms.sub_categories.len() > 1 {
            vms.sub_categories
                .insert(0, RankingSubCategory::new(SubCategoryId::all(), None));
        }
        categories.push(vms);

        categories
    }
}
