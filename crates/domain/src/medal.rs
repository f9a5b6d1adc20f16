//! Medal bands awarded from leaderboard positions.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Medal tiers, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medal {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Medal {
    pub fn all() -> &'static [Medal] {
        &[
            Self::Bronze,
            Self::Silver,
            Self::Gold,
            Self::Platinum,
            Self::Diamond,
        ]
    }

    /// Actual positions earning this medal.
    ///
    /// Platinum overlaps gold: second and third place earn both.
    pub fn band(&self) -> RangeInclusive<u32> {
        match self {
            Self::Bronze => 31..=100,
            Self::Silver => 11..=30,
            Self::Gold => 2..=10,
            Self::Platinum => 2..=3,
            Self::Diamond => 1..=1,
        }
    }
}

/// Per-player medal counters for one game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalCounts {
    pub bronze: u32,
    pub silver: u32,
    pub gold: u32,
    pub platinum: u32,
    pub diamond: u32,
}

impl MedalCounts {
    /// Count the medals earned by one entry at `actual_position`
    pub fn record(&mut self, actual_position: u32) {
        for medal in Medal::all() {
            if medal.band().contains(&actual_position) {
                *self.slot(*medal) += 1;
            }
        }
    }

    pub fn get(&self, medal: Medal) -> u32 {
        match medal {
            Medal::Bronze => self.bronze,
            Medal::Silver => self.silver,
            Medal::Gold => self.gold,
            Medal::Platinum => self.platinum,
            Medal::Diamond => self.diamond,
        }
    }

    fn slot(&mut self, medal: Medal) -> &mut u32 {
        match medal {
            Medal::Bronze => &mut self.bronze,
            Medal::Silver => &mut self.silver,
            Medal::Gold => &mut self.gold,
            Medal::Platinum => &mut self.platinum,
            Medal::Diamond => &mut self.diamond,
        }
    }

    /// Counters in display order: bronze, silver, gold, platinum, diamond
    pub fn as_array(&self) -> [u32; 5] {
        [
            self.bronze,
            self.silver,
            self.gold,
            self.platinum,
            self.diamond,
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.as_array().iter().all(|c| *c == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts_for(position: u32) -> MedalCounts {
        let mut counts = MedalCounts::default();
        counts.record(position);
        counts
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(counts_for(1).as_array(), [0, 0, 0, 0, 1]);
        assert_eq!(counts_for(2).as_array(), [0, 0, 1, 1, 0]);
        assert_eq!(counts_for(3).as_array(), [0, 0, 1, 1, 0]);
        assert_eq!(counts_for(4).as_array(), [0, 0, 1, 0, 0]);
        assert_eq!(counts_for(10).as_array(), [0, 0, 1, 0, 0]);
        assert_eq!(counts_for(11).as_array(), [0, 1, 0, 0, 0]);
        assert_eq!(counts_for(30).as_array(), [0, 1, 0, 0, 0]);
        assert_eq!(counts_for(31).as_array(), [1, 0, 0, 0, 0]);
        assert_eq!(counts_for(100).as_array(), [1, 0, 0, 0, 0]);
        assert!(counts_for(101).is_empty());
    }
}
