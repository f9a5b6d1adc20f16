use super::assigner::RankedScore;
use rankings_domain::{paging::MAX_ENTRIES, CategoryId, RankingEntry, SubCategoryId};

/// Number ranked rows 1..N by (position, earliest achievement).
///
/// The player id breaks ties that share both position and timestamp so the
/// result does not depend on input order.
pub fn normalize_positions(
    category_id: &CategoryId,
    sub_category_id: &SubCategoryId,
    mut ranked: Vec<RankedScore>,
) -> Vec<RankingEntry> {
    ranked.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.score.achieved_at.cmp(&b.score.achieved_at))
            .then_with(|| a.score.player_id.cmp(&b.score.player_id))
    });
    ranked.truncate(MAX_ENTRIES);

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, row)| RankingEntry {
            category_id: category_id.clone(),
            sub_category_id: sub_category_id.clone(),
            position: row.position,
            actual_position: index as u32 + 1,
            player_id: row.score.player_id,
            value: row.score.value,
            timestamp: row.score.achieved_at,
        })
        .collect()
}
