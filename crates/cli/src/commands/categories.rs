//! Category listing

use anyhow::Result;
use rankings_domain::CategoryListing;
use serde::Serialize;

use crate::commands::CommandContext;
use crate::output::{Render, TableFormatter};

/// Categories visible to one game
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct CategoryList(pub Vec<CategoryListing>);

impl Render for CategoryList {
    fn render_table(&self) -> Result<String> {
        let mut rows = Vec::new();
        for category in &self.0 {
            let game = category.game.as_ref().map_or("-", |g| g.as_str()).to_string();
            if category.sub_categories.is_empty() {
                rows.push(vec![category.category_id.to_string(), game, "-".to_string(), "0".to_string()]);
                continue;
            }
            for sub in &category.sub_categories {
                rows.push(vec![
                    category.category_id.to_string(),
                    game.clone(),
                    sub.sub_category_id.to_string(),
                    sub.page_count.to_string(),
                ]);
            }
        }
        Ok(TableFormatter::simple(
            vec!["Category", "Game", "Subcategory", "Pages"],
            rows,
        ))
    }
}

/// List ranking categories for a game
pub async fn list(ctx: &CommandContext, game: &str) -> Result<CategoryList> {
    Ok(CategoryList(ctx.queries.list_categories(game).await?))
}
