//! Event periods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dated event period run by a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPeriod {
    /// Ordinal of the period, shared by all games running it
    pub period_ordinal: i32,
    /// First day of the period (inclusive)
    pub start_date: NaiveDate,
    /// Day the period ends (exclusive)
    pub end_date: NaiveDate,
    /// Whether vending machine events ran during this period for the game
    pub enable_vms: bool,
}

impl EventPeriod {
    /// Whether `today` falls in `[start_date, end_date)`
    pub fn contains(&self, today: NaiveDate) -> bool {
        self.start_date <= today && today < self.end_date
    }

    /// Ordinal of the period containing `today`, if any
    pub fn current_ordinal<'a>(
        periods: impl IntoIterator<Item = &'a EventPeriod>,
        today: NaiveDate,
    ) -> Option<i32> {
        periods
            .into_iter()
            .find(|p| p.contains(today))
            .map(|p| p.period_ordinal)
    }
}
