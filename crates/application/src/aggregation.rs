//! Aggregation queries.
//!
//! Each category kind aggregates a different fact table. A query names the
//! kind and carries its filters as typed values; the score source turns it
//! into a single parameterized statement.

use rankings_domain::{
    CategoryKind, DomainError, DomainResult, GameId, RecomputeUnit, SortDirection, ValueKind,
};
use serde::{Deserialize, Serialize};

/// One aggregation over raw achievement facts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AggregationQuery {
    /// Unlocked non-hidden badges, optionally for one game's badges
    BadgeCount { game: Option<GameId> },
    /// Badge points, optionally for one game's badges
    BadgePoints { game: Option<GameId> },
    /// Exp from event-location and vending machine completions
    Exp { period: Option<i32> },
    /// Completed event locations
    EventLocationCount { period: Option<i32> },
    /// Completed free event locations of one game
    FreeEventLocationCount { game: GameId, period: Option<i32> },
    /// Distinct completed locations over all locations of one game
    EventLocationCompletion { game: GameId, period: Option<i32> },
    /// Completed vending machine events
    EventVmCount { period: Option<i32> },
    /// Best (lowest) time on one map of one game
    TimeTrial { game: GameId, map_id: i32 },
    /// Best (highest) score in one minigame. Minigame ids are shared by
    /// every game that hosts them.
    Minigame { minigame_id: String },
}

impl AggregationQuery {
    /// Build the query for a recompute unit.
    ///
    /// `all` leaves the query unfiltered. Other subcategories are a game id
    /// for badge categories, a period ordinal for periodic categories, a map
    /// id for time trials and a minigame id for minigames.
    pub fn for_unit(unit: &RecomputeUnit) -> DomainResult<Self> {
        let sub = &unit.sub_category_id;
        let game_filter = || (!sub.is_all()).then(|| GameId::new(sub.as_str()));
        let period = || -> DomainResult<Option<i32>> {
            if sub.is_all() {
                return Ok(None);
            }
            sub.period_ordinal().map(Some).ok_or_else(|| {
                DomainError::invalid_sub_category(
                    unit.category_id.as_str(),
                    sub.as_str(),
                    "expected a period ordinal or 'all'",
                )
            })
        };

        let query = match unit.kind {
            CategoryKind::BadgeCount => Self::BadgeCount {
                game: game_filter(),
            },
            CategoryKind::Bp => Self::BadgePoints {
                game: game_filter(),
            },
            CategoryKind::Exp => Self::Exp { period: period()? },
            CategoryKind::EventLocationCount => Self::EventLocationCount { period: period()? },
            CategoryKind::FreeEventLocationCount => Self::FreeEventLocationCount {
                game: unit.game.clone(),
                period: period()?,
            },
            CategoryKind::EventLocationCompletion => Self::EventLocationCompletion {
                game: unit.game.clone(),
                period: period()?,
            },
            CategoryKind::EventVmCount => Self::EventVmCount { period: period()? },
            CategoryKind::TimeTrial => Self::TimeTrial {
                game: unit.game.clone(),
                map_id: sub.as_str().parse().map_err(|_| {
                    DomainError::invalid_sub_category(
                        unit.category_id.as_str(),
                        sub.as_str(),
                        "expected a numeric map id",
                    )
                })?,
            },
            CategoryKind::Minigame => {
                if sub.is_all() {
                    return Err(DomainError::invalid_sub_category(
                        unit.category_id.as_str(),
                        sub.as_str(),
                        "minigame rankings have no 'all' subcategory",
                    ));
                }
                Self::Minigame {
                    minigame_id: sub.as_str().to_string(),
                }
            }
        };
        Ok(query)
    }

    pub fn kind(&self) -> CategoryKind {
        match self {
            Self::BadgeCount { .. } => CategoryKind::BadgeCount,
            Self::BadgePoints { .. } => CategoryKind::Bp,
            Self::Exp { .. } => CategoryKind::Exp,
            Self::EventLocationCount { .. } => CategoryKind::EventLocationCount,
            Self::FreeEventLocationCount { .. } => CategoryKind::FreeEventLocationCount,
            Self::EventLocationCompletion { .. } => CategoryKind::EventLocationCompletion,
            Self::EventVmCount { .. } => CategoryKind::EventVmCount,
            Self::TimeTrial { .. } => CategoryKind::TimeTrial,
            Self::Minigame { .. } => CategoryKind::Minigame,
        }
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.kind().sort_direction()
    }

    pub fn value_kind(&self) -> ValueKind {
        self.kind().value_kind()
    }

    /// Period ordinal filter, for periodic queries
    pub fn period(&self) -> Option<i32> {
        match self {
            Self::Exp { period }
            | Self::EventLocationCount { period }
            | Self::FreeEventLocationCount { period, .. }
            | Self::EventLocationCompletion { period, .. }
            | Self::EventVmCount { period } => *period,
            _ => None,
        }
    }

    /// Game filter, when the query is scoped to one game
    pub fn game(&self) -> Option<&GameId> {
        match self {
            Self::BadgeCount { game } | Self::BadgePoints { game } => game.as_ref(),
            Self::FreeEventLocationCount { game, .. }
            | Self::EventLocationCompletion { game, .. }
            | Self::TimeTrial { game, .. } => Some(game),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(category: &str, sub: &str, game: &str) -> RecomputeUnit {
        RecomputeUnit::parse(category, sub, GameId::from(game)).unwrap()
    }

    #[test]
    fn test_badge_subcategory_is_game_filter() {
        let all = AggregationQuery::for_unit(&unit("bp", "all", "2kki")).unwrap();
        assert_eq!(all, AggregationQuery::BadgePoints { game: None });

        let scoped = AggregationQuery::for_unit(&unit("badgeCount", "yume", "yume")).unwrap();
        assert_eq!(
            scoped,
            AggregationQuery::BadgeCount {
                game: Some(GameId::from("yume"))
            }
        );
    }

    #[test]
    fn test_periodic_subcategory_is_period_filter() {
        let query = AggregationQuery::for_unit(&unit("exp", "14", "2kki")).unwrap();
        assert_eq!(query, AggregationQuery::Exp { period: Some(14) });
        assert_eq!(query.period(), Some(14));

        let all = AggregationQuery::for_unit(&unit("eventVmCount", "all", "2kki")).unwrap();
        assert_eq!(all.period(), None);
    }

    #[test]
    fn test_periodic_subcategory_must_be_numeric() {
        let result = AggregationQuery::for_unit(&unit("eventLocationCount", "summer", "2kki"));
        assert!(matches!(result, Err(DomainError::InvalidSubCategory { .. })));
    }

    #[test]
    fn test_free_locations_scoped_to_category_game() {
        let query =
            AggregationQuery::for_unit(&unit("freeEventLocationCount_yume", "3", "yume")).unwrap();
        assert_eq!(
            query,
            AggregationQuery::FreeEventLocationCount {
                game: GameId::from("yume"),
                period: Some(3)
            }
        );
    }

    #[test]
    fn test_time_trial_requires_map_id() {
        let query = AggregationQuery::for_unit(&unit("timeTrial", "143", "2kki")).unwrap();
        assert_eq!(
            query,
            AggregationQuery::TimeTrial {
                game: GameId::from("2kki"),
                map_id: 143
            }
        );
        assert_eq!(query.sort_direction(), SortDirection::Ascending);

        assert!(AggregationQuery::for_unit(&unit("timeTrial", "all", "2kki")).is_err());
    }

    #[test]
    fn test_minigame_is_keyed_by_minigame_id() {
        let yume = AggregationQuery::for_unit(&unit("minigame", "rby", "yume")).unwrap();
        let flow = AggregationQuery::for_unit(&unit("minigame", "rby", "flow")).unwrap();
        assert_eq!(yume, flow);
        assert_eq!(yume.game(), None);
        assert!(AggregationQuery::for_unit(&unit("minigame", "all", "yume")).is_err());
    }

    #[test]
    fn test_completion_is_float() {
        let query =
            AggregationQuery::for_unit(&unit("eventLocationCompletion", "all", "2kki")).unwrap();
        assert_eq!(query.value_kind(), ValueKind::Float);
    }
}
