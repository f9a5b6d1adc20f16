//! Leaderboard read operations.

use crate::ports::RankingStore;
use crate::ApplicationResult;
use rankings_domain::{
    paging, CategoryId, CategoryKind, CategoryListing, GameCatalog, GameId, PlayerId, Ranking,
    SubCategoryId,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Serves category listings and leaderboard pages
#[derive(Clone)]
pub struct RankingQueryService {
    store: Arc<dyn RankingStore>,
    catalog: GameCatalog,
}

impl RankingQueryService {
    pub fn new(store: Arc<dyn RankingStore>, catalog: GameCatalog) -> Self {
        Self { store, catalog }
    }

    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    /// Categories visible to `game` with their non-empty subcategories
    #[instrument(skip(self))]
    pub async fn list_categories(&self, game: &str) -> ApplicationResult<Vec<CategoryListing>> {
        let game = self.catalog.require(game)?;
        let mut categories = self.store.list_categories(&game).await?;
        for category in &mut categories {
            for sub_category in &mut category.sub_categories {
                sub_category.page_count = sub_category.page_count.min(paging::MAX_PAGES);
            }
        }
        Ok(categories)
    }

    /// Page on which `player` appears; 1 when there is no player or no entry
    #[instrument(skip(self))]
    pub async fn player_page(
        &self,
        player: Option<&PlayerId>,
        category_id: &str,
        sub_category_id: &str,
    ) -> ApplicationResult<u32> {
        let Some(player) = player else {
            return Ok(1);
        };
        let (category_id, sub_category_id) = parse_ids(category_id, sub_category_id)?;

        let position = self
            .store
            .player_actual_position(player, &category_id, &sub_category_id)
            .await?;
        debug!(?position, "Resolved player position");

        Ok(position.map(paging::page_for_position).unwrap_or(1))
    }

    /// Up to 25 rankings of `page`, ordered by actual position
    #[instrument(skip(self))]
    pub async fn rankings_page(
        &self,
        game: &str,
        category_id: &str,
        sub_category_id: &str,
        page: u32,
    ) -> ApplicationResult<Vec<Ranking>> {
        let game: GameId = self.catalog.require(game)?;
        let (category_id, sub_category_id) = parse_ids(category_id, sub_category_id)?;
        let page = page.max(1);

        if page > paging::MAX_PAGES {
            return Ok(Vec::new());
        }

        self.store
            .rankings_page(&game, &category_id, &sub_category_id, page)
            .await
    }
}

fn parse_ids(
    category_id: &str,
    sub_category_id: &str,
) -> ApplicationResult<(CategoryId, SubCategoryId)> {
    CategoryKind::parse_storage_id(category_id)?;
    if sub_category_id.is_empty() {
        return Err(crate::ApplicationError::InvalidInput(
            "subcategory not specified".to_string(),
        ));
    }
    Ok((
        CategoryId::new(category_id),
        SubCategoryId::new(sub_category_id),
    ))
}
