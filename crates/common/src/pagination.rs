//! Page parameter handling.
//!
//! Leaderboard pages are requested by number. Clients send missing,
//! non-numeric or negative values, and every one of those falls back to the
//! first page instead of being rejected.

use rankings_domain::paging;
use serde::{Deserialize, Serialize};

/// Default page number (1-indexed)
const DEFAULT_PAGE: u32 = 1;

/// Raw page parameter as received from a query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageParams {
    /// Page number (1-indexed); kept raw so malformed input can default
    #[serde(default)]
    pub page: Option<String>,
}

impl PageParams {
    /// The requested page, defaulting to 1
    pub fn page(&self) -> u32 {
        parse_page(self.page.as_deref())
    }
}

/// Parse a page parameter leniently
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .map(paging::normalize_page)
        .unwrap_or(DEFAULT_PAGE)
}
