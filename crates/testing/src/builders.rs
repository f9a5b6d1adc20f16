//! Fluent builder pattern for constructing test data.
//!
//! This module provides builders for scores, event periods and complete
//! stored leaderboards.

use chrono::{Duration, NaiveDate};
use rankings_application::{assign_ranks, normalize_positions};
use rankings_domain::{
    paging::MAX_ENTRIES, CategoryId, EventPeriod, PlayerId, PlayerScore, RankingEntry,
    RankingValue, SortDirection, SubCategoryId,
};

use crate::fixtures::timestamp;

/// Builder for creating PlayerScore test instances
#[derive(Clone)]
pub struct ScoreBuilder {
    player_id: PlayerId,
    value: RankingValue,
    achieved_at: i64,
}

impl ScoreBuilder {
    pub fn new(player_id: impl Into<PlayerId>) -> Self {
        Self {
            player_id: player_id.into(),
            value: RankingValue::Int(1),
            achieved_at: 0,
        }
    }

    pub fn int(mut self, value: i64) -> Self {
        self.value = RankingValue::Int(value);
        self
    }

    pub fn float(mut self, value: f64) -> Self {
        self.value = RankingValue::Float(value);
        self
    }

    /// Seconds since the Unix epoch at which the value was reached
    pub fn at(mut self, seconds: i64) -> Self {
        self.achieved_at = seconds;
        self
    }

    pub fn build(self) -> PlayerScore {
        PlayerScore::new(self.player_id, self.value, timestamp(self.achieved_at))
    }
}

/// Builder for creating EventPeriod test instances
#[derive(Clone)]
pub struct EventPeriodBuilder {
    ordinal: i32,
    start_date: NaiveDate,
    days: i64,
    enable_vms: bool,
}

impl EventPeriodBuilder {
    pub fn new(ordinal: i32) -> Self {
        Self {
            ordinal,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            days: 30,
            enable_vms: false,
        }
    }

    pub fn starting(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    pub fn lasting(mut self, days: i64) -> Self {
        self.days = days;
        self
    }

    pub fn with_vms(mut self) -> Self {
        self.enable_vms = true;
        self
    }

    pub fn build(self) -> EventPeriod {
        EventPeriod {
            period_ordinal: self.ordinal,
            start_date: self.start_date,
            end_date: self.start_date + Duration::days(self.days),
            enable_vms: self.enable_vms,
        }
    }
}

/// Builder for a ranked and normalized leaderboard
#[derive(Clone)]
pub struct LeaderboardBuilder {
    category_id: CategoryId,
    sub_category_id: SubCategoryId,
    scores: Vec<PlayerScore>,
    direction: SortDirection,
}

impl LeaderboardBuilder {
    pub fn new(category_id: impl Into<CategoryId>, sub_category_id: impl Into<SubCategoryId>) -> Self {
        Self {
            category_id: category_id.into(),
            sub_category_id: sub_category_id.into(),
            scores: Vec::new(),
            direction: SortDirection::Descending,
        }
    }

    /// Add `count` players named `player-0001..` with strictly decreasing values
    pub fn with_players(mut self, count: usize) -> Self {
        let offset = self.scores.len();
        self.scores.extend((0..count).map(|i| {
            ScoreBuilder::new(format!("player-{:04}", offset + i + 1))
                .int((count - i) as i64 * 10)
                .at(i as i64)
                .build()
        }));
        self
    }

    pub fn with_score(mut self, score: PlayerScore) -> Self {
        self.scores.push(score);
        self
    }

    /// Lower values rank first
    pub fn ascending(mut self) -> Self {
        self.direction = SortDirection::Ascending;
        self
    }

    pub fn build(self) -> Vec<RankingEntry> {
        normalize_positions(
            &self.category_id,
            &self.sub_category_id,
            assign_ranks(self.scores, self.direction, MAX_ENTRIES),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaderboard_builder_orders_players() {
        let entries = LeaderboardBuilder::new("bp", "all").with_players(3).build();
        let players: Vec<_> = entries.iter().map(|e| e.player_id.as_str()).collect();
        assert_eq!(players, vec!["player-0001", "player-0002", "player-0003"]);
    }

    #[test]
    fn test_period_builder_end_is_exclusive() {
        let period = EventPeriodBuilder::new(3).lasting(7).build();
        assert!(period.contains(period.start_date + Duration::days(6)));
        assert!(!period.contains(period.end_date));
    }
}
