//! Leaderboard page arithmetic.
//!
//! Leaderboards are shown 25 rows at a time and never exceed 40 pages, so at
//! most 1000 entries are kept per subcategory.

/// Rows per leaderboard page
pub const PAGE_SIZE: u32 = 25;

/// Highest page a leaderboard exposes
pub const MAX_PAGES: u32 = 40;

/// Entries kept per (category, subcategory)
pub const MAX_ENTRIES: usize = (PAGE_SIZE * MAX_PAGES) as usize;

/// Rows written per insert statement
pub const INSERT_BATCH_SIZE: usize = 1000;

/// Number of pages needed to show `entry_count` entries, capped at [`MAX_PAGES`]
pub fn page_count(entry_count: u64) -> u32 {
    let pages = entry_count.div_ceil(u64::from(PAGE_SIZE));
    pages.min(u64::from(MAX_PAGES)) as u32
}

/// Page holding the entry at `actual_position` (1-based).
///
/// Positions past the last page fold back to page 1.
pub fn page_for_position(actual_position: u32) -> u32 {
    if actual_position == 0 {
        return 1;
    }
    let page = (actual_position - 1) / PAGE_SIZE + 1;
    if page > MAX_PAGES {
        1
    } else {
        page
    }
}

/// Normalize a requested page: anything below 1 becomes 1
pub fn normalize_page(page: i64) -> u32 {
    if page < 1 {
        1
    } else {
        page.min(i64::from(u32::MAX)) as u32
    }
}

/// Inclusive range of actual positions shown on `page`
pub fn page_bounds(page: u32) -> (u32, u32) {
    let first = (page.max(1) - 1).saturating_mul(PAGE_SIZE).saturating_add(1);
    (first, first.saturating_add(PAGE_SIZE - 1))
}
