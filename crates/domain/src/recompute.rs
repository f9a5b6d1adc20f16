//! Units of recomputation work.

use crate::category::{CategoryKind, RankingCategory, RankingSubCategory};
use crate::errors::{DomainError, DomainResult};
use crate::identifiers::{CategoryId, GameId, SubCategoryId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One (game, category, subcategory) leaderboard to rebuild
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecomputeUnit {
    /// Game whose data scopes game-bound categories
    pub game: GameId,
    pub category_id: CategoryId,
    pub kind: CategoryKind,
    pub sub_category_id: SubCategoryId,
    pub periodic: bool,
}

impl RecomputeUnit {
    /// Unit for a registered category/subcategory pair
    pub fn for_registered(
        game: &GameId,
        category: &RankingCategory,
        sub_category: &RankingSubCategory,
    ) -> Self {
        let game = category
            .game
            .clone()
            .or_else(|| sub_category.game.clone())
            .unwrap_or_else(|| game.clone());
        Self {
            game,
            category_id: category.category_id(),
            kind: category.kind,
            sub_category_id: sub_category.sub_category_id.clone(),
            periodic: category.periodic,
        }
    }

    /// Unit from raw identifiers, as given on the command line.
    ///
    /// A game suffix in the category id must agree with `game`.
    pub fn parse(category_id: &str, sub_category_id: &str, game: GameId) -> DomainResult<Self> {
        let (kind, suffix_game) = CategoryKind::parse_storage_id(category_id)?;
        if kind.is_separate_by_game() && suffix_game.is_none() {
            return Err(DomainError::GameRequired(format!("{category_id}_<game>")));
        }
        if let Some(suffix_game) = suffix_game {
            if suffix_game != game {
                return Err(DomainError::invalid_sub_category(
                    category_id,
                    sub_category_id,
                    format!("category belongs to game '{suffix_game}', not '{game}'"),
                ));
            }
        }
        if sub_category_id.is_empty() {
            return Err(DomainError::invalid_sub_category(
                category_id,
                sub_category_id,
                "subcategory must not be empty",
            ));
        }
        Ok(Self {
            game,
            category_id: CategoryId::new(category_id),
            kind,
            sub_category_id: SubCategoryId::new(sub_category_id),
            periodic: kind.is_periodic(),
        })
    }
}

impl fmt::Display for RecomputeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.game, self.category_id, self.sub_category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shared_category() {
        let unit = RecomputeUnit::parse("exp", "12", GameId::from("2kki")).unwrap();
        assert_eq!(unit.kind, CategoryKind::Exp);
        assert!(unit.periodic);
        assert_eq!(unit.to_string(), "2kki/exp/12");
    }

    #[test]
    fn test_parse_rejects_mismatched_game_suffix() {
        let result = RecomputeUnit::parse("freeEventLocationCount_yume", "all", GameId::from("flow"));
        assert!(matches!(result, Err(DomainError::InvalidSubCategory { .. })));
    }

    #[test]
    fn test_parse_requires_suffix_for_per_game_category() {
        let result = RecomputeUnit::parse("freeEventLocationCount", "all", GameId::from("flow"));
        assert!(matches!(result, Err(DomainError::GameRequired(_))));
    }

    #[test]
    fn test_registered_unit_uses_owning_game() {
        let mut category =
            RankingCategory::owned_by(CategoryKind::FreeEventLocationCount, GameId::from("yume"));
        category.push(RankingSubCategory::new("3", Some(GameId::from("yume"))));
        let unit = RecomputeUnit::for_registered(
            &GameId::from("2kki"),
            &category,
            &category.sub_categories[0],
        );
        assert_eq!(unit.game.as_str(), "yume");
        assert_eq!(unit.category_id.as_str(), "freeEventLocationCount_yume");
    }
}
