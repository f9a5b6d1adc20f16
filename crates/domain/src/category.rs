//! Ranking categories and subcategories.

use crate::errors::{DomainError, DomainResult};
use crate::identifiers::{CategoryId, GameId, SubCategoryId};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Kind of achievement a category ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryKind {
    /// Sum of badge points
    Bp,
    /// Number of unlocked, non-hidden badges
    BadgeCount,
    /// Experience earned from event completions
    Exp,
    /// Completed event locations
    EventLocationCount,
    /// Completed player-chosen ("free") event locations
    FreeEventLocationCount,
    /// Share of the game's event locations a player has completed
    EventLocationCompletion,
    /// Completed vending machine events
    EventVmCount,
    /// Best time on a time-trial map
    TimeTrial,
    /// Best minigame score
    Minigame,
}

impl CategoryKind {
    pub fn all() -> &'static [CategoryKind] {
        &[
            Self::Bp,
            Self::BadgeCount,
            Self::Exp,
            Self::EventLocationCount,
            Self::FreeEventLocationCount,
            Self::EventLocationCompletion,
            Self::EventVmCount,
            Self::TimeTrial,
            Self::Minigame,
        ]
    }

    /// Category id as stored and exposed over the API
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bp => "bp",
            Self::BadgeCount => "badgeCount",
            Self::Exp => "exp",
            Self::EventLocationCount => "eventLocationCount",
            Self::FreeEventLocationCount => "freeEventLocationCount",
            Self::EventLocationCompletion => "eventLocationCompletion",
            Self::EventVmCount => "eventVmCount",
            Self::TimeTrial => "timeTrial",
            Self::Minigame => "minigame",
        }
    }

    /// Value representation of the category's entries
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Self::EventLocationCompletion => ValueKind::Float,
            _ => ValueKind::Int,
        }
    }

    /// Order in which better values sort
    pub fn sort_direction(&self) -> SortDirection {
        match self {
            Self::TimeTrial => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }

    /// Periodic categories have one subcategory per event period
    pub fn is_periodic(&self) -> bool {
        matches!(
            self,
            Self::Exp
                | Self::EventLocationCount
                | Self::FreeEventLocationCount
                | Self::EventLocationCompletion
                | Self::EventVmCount
        )
    }

    /// Categories stored once per game under `<id>_<game>`
    pub fn is_separate_by_game(&self) -> bool {
        matches!(self, Self::FreeEventLocationCount)
    }

    /// Resolve a storage id such as `bp` or `freeEventLocationCount_2kki`.
    ///
    /// Returns the kind and, for per-game categories, the game encoded in the id.
    pub fn parse_storage_id(id: &str) -> DomainResult<(CategoryKind, Option<GameId>)> {
        if let Ok(kind) = id.parse::<CategoryKind>() {
            return Ok((kind, None));
        }
        if let Some((prefix, game)) = id.split_once('_') {
            if let Ok(kind) = prefix.parse::<CategoryKind>() {
                if kind.is_separate_by_game() && !game.is_empty() {
                    return Ok((kind, Some(GameId::from(game))));
                }
            }
        }
        Err(DomainError::UnknownCategory(id.to_string()))
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

/// Storage representation of ranking values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Int,
    Float,
}

/// Direction in which ranking values improve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Lower is better
    Ascending,
    /// Higher is better
    Descending,
}

/// A ranking category as built by the registry for one game
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingCategory {
    pub kind: CategoryKind,
    /// Owning game; `None` for categories shared by every game
    #[serde(serialize_with = "serialize_game")]
    pub game: Option<GameId>,
    pub periodic: bool,
    pub separate_by_game: bool,
    pub sub_categories: Vec<RankingSubCategory>,
}

impl RankingCategory {
    /// A category shared by all games
    pub fn shared(kind: CategoryKind) -> Self {
        Self {
            kind,
            game: None,
            periodic: kind.is_periodic(),
            separate_by_game: false,
            sub_categories: Vec::new(),
        }
    }

    /// A category owned by one game
    pub fn owned_by(kind: CategoryKind, game: GameId) -> Self {
        Self {
            kind,
            game: Some(game),
            periodic: kind.is_periodic(),
            separate_by_game: kind.is_separate_by_game(),
            sub_categories: Vec::new(),
        }
    }

    /// Storage id, suffixed with the game for per-game categories
    pub fn category_id(&self) -> CategoryId {
        match (&self.game, self.separate_by_game) {
            (Some(game), true) => CategoryId::new(format!("{}_{}", self.kind.as_str(), game)),
            _ => CategoryId::new(self.kind.as_str()),
        }
    }

    pub fn push(&mut self, sub_category: RankingSubCategory) {
        self.sub_categories.push(sub_category);
    }
}

/// A subcategory of a ranking category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingSubCategory {
    pub sub_category_id: SubCategoryId,
    /// Game the subcategory is restricted to; `None` when visible to every game
    #[serde(serialize_with = "serialize_game", deserialize_with = "deserialize_game")]
    pub game: Option<GameId>,
    /// `min(40, ceil(entries / 25))`; zero until read back from the store
    pub page_count: u32,
}

impl RankingSubCategory {
    pub fn new(sub_category_id: impl Into<SubCategoryId>, game: Option<GameId>) -> Self {
        Self {
            sub_category_id: sub_category_id.into(),
            game,
            page_count: 0,
        }
    }
}

/// A category as listed to readers: storage id plus the subcategories holding entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListing {
    pub category_id: CategoryId,
    #[serde(serialize_with = "serialize_game", deserialize_with = "deserialize_game")]
    pub game: Option<GameId>,
    pub sub_categories: Vec<RankingSubCategory>,
}

// Shared categories carry an empty game on the wire.
fn serialize_game<S: Serializer>(game: &Option<GameId>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(game.as_ref().map(GameId::as_str).unwrap_or(""))
}

fn deserialize_game<'de, D>(deserializer: D) -> Result<Option<GameId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok((!raw.is_empty()).then(|| GameId::new(raw)))
}
