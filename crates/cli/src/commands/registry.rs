//! Category registry inspection

use anyhow::{Context, Result};
use rankings_application::PersistSummary;
use rankings_domain::RankingCategory;
use serde::Serialize;
use tracing::info;

use crate::commands::CommandContext;
use crate::output::{Render, TableFormatter};

/// Discovered registry of one game
#[derive(Debug, Serialize)]
pub struct RegistryReport {
    pub game: String,
    pub categories: Vec<RankingCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persisted: Option<PersistedCounts>,
}

/// Rows written when persisting the registry
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PersistedCounts {
    pub categories: usize,
    pub sub_categories: usize,
    pub failures: usize,
}

impl From<PersistSummary> for PersistedCounts {
    fn from(summary: PersistSummary) -> Self {
        Self {
            categories: summary.categories,
            sub_categories: summary.sub_categories,
            failures: summary.failures,
        }
    }
}

impl Render for RegistryReport {
    fn render_table(&self) -> Result<String> {
        let rows = self
            .categories
            .iter()
            .map(|category| {
                vec![
                    category.category_id().to_string(),
                    if category.periodic { "yes" } else { "no" }.to_string(),
                    category
                        .sub_categories
                        .iter()
                        .map(|s| s.sub_category_id.to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                ]
            })
            .collect();

        let mut out = TableFormatter::simple(vec!["Category", "Periodic", "Subcategories"], rows);
        if let Some(persisted) = &self.persisted {
            out.push_str(&format!(
                "\nPersisted {} categories and {} subcategories ({} failures)",
                persisted.categories, persisted.sub_categories, persisted.failures
            ));
        }
        Ok(out)
    }
}

/// Discover the registry for `game`, optionally persisting every game's registry
pub async fn show(ctx: &CommandContext, game: &str, persist: bool) -> Result<RegistryReport> {
    let game = ctx.catalog.require(game)?;

    let (categories, persisted) = if persist {
        let registry = ctx.builder.build().await;
        let summary = registry.persist(ctx.engine.store().as_ref()).await;
        info!(
            categories = summary.categories,
            sub_categories = summary.sub_categories,
            failures = summary.failures,
            "Persisted category registry"
        );
        let categories = registry
            .game(&game)
            .map(|g| g.categories.clone())
            .context("Game missing from the built registry")?;
        (categories, Some(summary.into()))
    } else {
        (ctx.builder.build_game(&game).await.categories, None)
    };

    Ok(RegistryReport {
        game: game.to_string(),
        categories,
        persisted,
    })
}
