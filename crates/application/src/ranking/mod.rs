//! Turning aggregated scores into leaderboard entries.
//!
//! The assigner gives every player a competition rank; the normalizer then
//! lays ranked players out in a gapless order for paging and medals.

mod assigner;
mod normalizer;

pub use assigner::{assign_ranks, RankedScore};
pub use normalizer::normalize_positions;
