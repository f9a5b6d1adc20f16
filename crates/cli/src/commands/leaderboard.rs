//! Leaderboard page display

use anyhow::Result;
use rankings_common::parse_page;
use rankings_domain::{PlayerId, Ranking};
use serde::Serialize;

use crate::commands::CommandContext;
use crate::output::{Render, TableFormatter};

/// Selects the page to show
#[derive(Debug, Clone, Default)]
pub struct PageSelector {
    /// Raw page number; malformed values mean page 1
    pub page: Option<String>,
    /// Show the page this player appears on instead
    pub player: Option<String>,
}

/// One page of a leaderboard
#[derive(Debug, Serialize)]
pub struct LeaderboardPage {
    pub game: String,
    pub category_id: String,
    pub sub_category_id: String,
    pub page: u32,
    pub rankings: Vec<Ranking>,
}

impl Render for LeaderboardPage {
    fn render_table(&self) -> Result<String> {
        let title = format!(
            "{} / {} / {} - page {}",
            self.game, self.category_id, self.sub_category_id, self.page
        );
        if self.rankings.is_empty() {
            return Ok(format!("{}\nNo entries on this page.", title));
        }

        let rows = self
            .rankings
            .iter()
            .map(|r| {
                vec![
                    format!("#{}", r.position),
                    r.name.clone(),
                    r.account_rank.to_string(),
                    r.medals
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("/"),
                    r.value.to_string(),
                ]
            })
            .collect();

        Ok(format!(
            "{}\n{}",
            title,
            TableFormatter::simple(vec!["Pos", "Player", "Rank", "Medals (B/S/G/P/D)", "Value"], rows)
        ))
    }
}

/// Fetch one leaderboard page
pub async fn show(
    ctx: &CommandContext,
    game: &str,
    category_id: &str,
    sub_category_id: &str,
    selector: PageSelector,
) -> Result<LeaderboardPage> {
    let page = match &selector.player {
        Some(player) => {
            let player = PlayerId::new(player.as_str());
            ctx.queries
                .player_page(Some(&player), category_id, sub_category_id)
                .await?
        }
        None => parse_page(selector.page.as_deref()),
    };

    let rankings = ctx
        .queries
        .rankings_page(game, category_id, sub_category_id, page)
        .await?;

    Ok(LeaderboardPage {
        game: game.to_string(),
        category_id: category_id.to_string(),
        sub_category_id: sub_category_id.to_string(),
        page,
        rankings,
    })
}
