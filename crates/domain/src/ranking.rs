//! Ranking values, computed entries and the leaderboard read model.

use crate::category::{SortDirection, ValueKind};
use crate::identifiers::{CategoryId, PlayerId, SubCategoryId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A ranked value; the variant is fixed per category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RankingValue {
    Int(i64),
    Float(f64),
}

impl RankingValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
        }
    }

    /// Non-positive values are never ranked
    pub fn is_positive(&self) -> bool {
        match self {
            Self::Int(v) => *v > 0,
            Self::Float(v) => *v > 0.0,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(v) => *v as f64,
            Self::Float(v) => *v,
        }
    }

    /// Integer value, zero for float values
    pub fn as_int(&self) -> i64 {
        match self {
            Self::Int(v) => *v,
            Self::Float(_) => 0,
        }
    }

    /// Total order where the better value sorts first under `direction`
    pub fn rank_cmp(&self, other: &Self, direction: SortDirection) -> Ordering {
        let natural = match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            _ => self.as_f64().total_cmp(&other.as_f64()),
        };
        match direction {
            SortDirection::Ascending => natural,
            SortDirection::Descending => natural.reverse(),
        }
    }
}

impl std::fmt::Display for RankingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.4}"),
        }
    }
}

/// One player's aggregated value for a ranking, before positions are assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub value: RankingValue,
    /// When the player reached this value; earlier wins ties
    pub achieved_at: DateTime<Utc>,
}

impl PlayerScore {
    pub fn new(player_id: impl Into<PlayerId>, value: RankingValue, achieved_at: DateTime<Utc>) -> Self {
        Self {
            player_id: player_id.into(),
            value,
            achieved_at,
        }
    }
}

/// A stored leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub category_id: CategoryId,
    pub sub_category_id: SubCategoryId,
    /// Competition rank; tied values share a position
    pub position: u32,
    /// Gapless 1-based order used for paging and medals
    pub actual_position: u32,
    pub player_id: PlayerId,
    pub value: RankingValue,
    pub timestamp: DateTime<Utc>,
}

/// A leaderboard row joined with player profile and medal data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub position: u32,
    pub name: String,
    /// Account rank shown next to the name
    #[serde(rename = "rank")]
    pub account_rank: i32,
    pub badge: String,
    pub system_name: String,
    /// Bronze, silver, gold, platinum and diamond counts
    pub medals: [u32; 5],
    pub value: RankingValue,
}
