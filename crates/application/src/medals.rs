//! Medal tallying.
//!
//! A player's medal counters for a game are derived from every leaderboard
//! entry that applies to that game: entries of shared categories and of the
//! game's own categories. For periodic categories only the `all`
//! subcategory and the current period count.

use crate::ports::MedalCandidate;
use rankings_domain::{GameId, MedalCounts, PlayerId};
use std::collections::HashMap;

/// Derives per-player medal counters from leaderboard positions
#[derive(Debug, Clone, Default)]
pub struct MedalTallier {
    current_period: Option<i32>,
}

impl MedalTallier {
    pub fn new(current_period: Option<i32>) -> Self {
        Self { current_period }
    }

    /// Whether `candidate` counts toward `game`'s medals
    pub fn is_eligible(&self, candidate: &MedalCandidate, game: &GameId) -> bool {
        let game_matches = |owner: &Option<GameId>| owner.as_ref().map_or(true, |g| g == game);
        if !game_matches(&candidate.category_game) || !game_matches(&candidate.sub_category_game) {
            return false;
        }
        if !candidate.periodic {
            return true;
        }
        candidate.sub_category_id.is_all()
            || (self.current_period.is_some()
                && candidate.sub_category_id.period_ordinal() == self.current_period)
    }

    /// Tally medals for `game`.
    ///
    /// Every player with at least one eligible entry appears in the result,
    /// even when none of their entries reach a medal band.
    pub fn tally<'a>(
        &self,
        game: &GameId,
        candidates: impl IntoIterator<Item = &'a MedalCandidate>,
    ) -> HashMap<PlayerId, MedalCounts> {
        let mut tallies: HashMap<PlayerId, MedalCounts> = HashMap::new();
        for candidate in candidates {
            if !self.is_eligible(candidate, game) {
                continue;
            }
            tallies
                .entry(candidate.player_id.clone())
                .or_default()
                .record(candidate.actual_position);
        }
        tallies
    }
}
