//! Supported games and the primary game.

use crate::errors::{DomainError, DomainResult};
use crate::identifiers::GameId;
use serde::{Deserialize, Serialize};

/// Games served by a deployment.
///
/// The primary game computes the cross-game `all` subcategories and owns the
/// categories that only exist once (`eventLocationCompletion`, time trials).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCatalog {
    games: Vec<GameId>,
    primary: GameId,
    time_trial_games: Vec<GameId>,
}

impl GameCatalog {
    /// Build a catalog; the primary game and time-trial games must be listed in `games`
    pub fn new(
        games: Vec<GameId>,
        primary: GameId,
        time_trial_games: Vec<GameId>,
    ) -> DomainResult<Self> {
        if !games.contains(&primary) {
            return Err(DomainError::UnsupportedGame(primary.into_inner()));
        }
        if let Some(unknown) = time_trial_games.iter().find(|g| !games.contains(g)) {
            return Err(DomainError::UnsupportedGame(unknown.to_string()));
        }
        Ok(Self {
            games,
            primary,
            time_trial_games,
        })
    }

    /// Games in configured order
    pub fn games(&self) -> &[GameId] {
        &self.games
    }

    /// The primary game
    pub fn primary(&self) -> &GameId {
        &self.primary
    }

    pub fn is_primary(&self, game: &GameId) -> bool {
        &self.primary == game
    }

    pub fn contains(&self, game: &GameId) -> bool {
        self.games.contains(game)
    }

    /// Whether the game exposes time-trial runs
    pub fn has_time_trials(&self, game: &GameId) -> bool {
        self.time_trial_games.contains(game)
    }

    /// Look up a game by name, failing for games outside the catalog
    pub fn require(&self, game: &str) -> DomainResult<GameId> {
        self.games
            .iter()
            .find(|g| g.as_str() == game)
            .cloned()
            .ok_or_else(|| DomainError::UnsupportedGame(game.to_string()))
    }
}

impl Default for GameCatalog {
    fn default() -> Self {
        let games = [
            "2kki",
            "amillusion",
            "braingirl",
            "deepdreams",
            "flow",
            "muma",
            "prayers",
            "someday",
            "unevendream",
            "yume",
        ]
        .into_iter()
        .map(GameId::from)
        .collect();

        Self {
            games,
            primary: GameId::from("2kki"),
            time_trial_games: vec![GameId::from("2kki")],
        }
    }
}
