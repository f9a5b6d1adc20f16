use rankings_domain::{PlayerScore, SortDirection};
use std::cmp::Ordering;

/// A score with its competition rank
#[derive(Debug, Clone, PartialEq)]
pub struct RankedScore {
    pub score: PlayerScore,
    /// 1 + number of players with a strictly better value
    pub position: u32,
}

/// Order in which ranked rows are read: better value, then earlier achievement, then player id
pub(crate) fn ranking_order(a: &PlayerScore, b: &PlayerScore, direction: SortDirection) -> Ordering {
    a.value
        .rank_cmp(&b.value, direction)
        .then_with(|| a.achieved_at.cmp(&b.achieved_at))
        .then_with(|| a.player_id.cmp(&b.player_id))
}

/// Assign competition ranks ("1224" ranking).
///
/// Players with a non-positive value are never ranked. At most `limit` rows
/// are kept; because rows are consumed best first, every kept rank is exact.
pub fn assign_ranks(
    mut scores: Vec<PlayerScore>,
    direction: SortDirection,
    limit: usize,
) -> Vec<RankedScore> {
    scores.retain(|s| s.value.is_positive());
    scores.sort_by(|a, b| ranking_order(a, b, direction));
    scores.truncate(limit);

    let mut ranked: Vec<RankedScore> = Vec::with_capacity(scores.len());
    for (index, score) in scores.into_iter().enumerate() {
        let position = match ranked.last() {
            Some(prev) if prev.score.value.rank_cmp(&score.value, direction) == Ordering::Equal => {
                prev.position
            }
            _ => index as u32 + 1,
        };
        ranked.push(RankedScore { score, position });
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rankings_domain::RankingValue;

    fn score(player: &str, value: i64, ts: i64) -> PlayerScore {
        PlayerScore::new(
            player,
            RankingValue::Int(value),
            Utc.timestamp_opt(ts, 0).unwrap(),
        )
    }

    fn positions(ranked: &[RankedScore]) -> Vec<(&str, u32)> {
        ranked
            .iter()
            .map(|r| (r.score.player_id.as_str(), r.position))
            .collect()
    }

    #[test]
    fn test_ties_share_position_and_next_skips() {
        let ranked = assign_ranks(
            vec![
                score("a", 50, 10),
                score("b", 80, 10),
                score("c", 50, 5),
                score("d", 20, 1),
            ],
            SortDirection::Descending,
            1000,
        );
        assert_eq!(positions(&ranked), vec![("b", 1), ("c", 2), ("a", 2), ("d", 4)]);
    }

    #[test]
    fn test_ascending_time_trial() {
        let ranked = assign_ranks(
            vec![score("A", 30, 100), score("B", 30, 50), score("C", 45, 200)],
            SortDirection::Ascending,
            1000,
        );
        assert_eq!(positions(&ranked), vec![("B", 1), ("A", 1), ("C", 3)]);
    }

    #[test]
    fn test_non_positive_values_are_dropped() {
        let ranked = assign_ranks(
            vec![score("a", 3, 1), score("b", 0, 1), score("c", -2, 1)],
            SortDirection::Descending,
            1000,
        );
        assert_eq!(positions(&ranked), vec![("a", 1)]);
    }

    #[test]
    fn test_limit_keeps_best_rows() {
        let scores = (1..=1500).map(|i| score(&format!("p{i:04}"), i, 0)).collect();
        let ranked = assign_ranks(scores, SortDirection::Descending, 1000);
        assert_eq!(ranked.len(), 1000);
        assert_eq!(ranked[0].score.value, RankingValue::Int(1500));
        assert_eq!(ranked[999].position, 1000);
    }

    #[test]
    fn test_float_values() {
        let ranked = assign_ranks(
            vec![
                PlayerScore::new("x", RankingValue::Float(0.5), Utc.timestamp_opt(0, 0).unwrap()),
                PlayerScore::new("y", RankingValue::Float(0.75), Utc.timestamp_opt(0, 0).unwrap()),
                PlayerScore::new("z", RankingValue::Float(0.0), Utc.timestamp_opt(0, 0).unwrap()),
            ],
            SortDirection::Descending,
            1000,
        );
        assert_eq!(positions(&ranked), vec![("y", 1), ("x", 2)]);
    }

    proptest! {
        #[test]
        fn prop_position_is_one_plus_strictly_better(
            values in proptest::collection::vec(-5i64..50, 0..200)
        ) {
            let scores: Vec<_> = values
                .iter()
                .enumerate()
                .map(|(i, v)| score(&format!("p{i:03}"), *v, i as i64 % 7))
                .collect();
            let ranked = assign_ranks(scores, SortDirection::Descending, 1000);

            for row in &ranked {
                let better = ranked
                    .iter()
                    .filter(|other| other.score.value.as_int() > row.score.value.as_int())
                    .count() as u32;
                prop_assert_eq!(row.position, better + 1);
                prop_assert!(row.score.value.is_positive());
            }
        }

        #[test]
        fn prop_truncation_preserves_ranks(
            values in proptest::collection::vec(1i64..20, 0..120),
            limit in 1usize..60
        ) {
            let scores: Vec<_> = values
                .iter()
                .enumerate()
                .map(|(i, v)| score(&format!("p{i:03}"), *v, 0))
                .collect();
            let full = assign_ranks(scores.clone(), SortDirection::Ascending, 1000);
            let cut = assign_ranks(scores, SortDirection::Ascending, limit);
            prop_assert_eq!(&full[..cut.len()], &cut[..]);
        }
    }
}
