//! Units of work executed during a recompute cycle

use rankings_domain::{GameId, RecomputeUnit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Job type enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Job {
    /// Rebuild one leaderboard
    Recompute(RecomputeUnit),
    /// Overwrite a game's medal counters from its stored leaderboards
    TallyMedals {
        game: GameId,
        current_period: Option<i32>,
    },
}

impl Job {
    /// Game the job runs for
    pub fn game(&self) -> &GameId {
        match self {
            Job::Recompute(unit) => &unit.game,
            Job::TallyMedals { game, .. } => game,
        }
    }

    pub fn is_recompute(&self) -> bool {
        matches!(self, Job::Recompute(_))
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::Recompute(unit) => write!(f, "recompute {}", unit),
            Job::TallyMedals { game, .. } => write!(f, "tally medals {}", game),
        }
    }
}
