//! Paginated listing results

use serde::{Deserialize, Serialize};

use super::market::UnifiedMarket;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedMarketsResult {
    /// Markets on this page
    pub data: Vec<UnifiedMarket>,
    /// Size of the full listing the page was cut from
    pub total: usize,
    /// Token for the next page, absent on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl PaginatedMarketsResult {
    /// A complete, unpaginated result.
    pub fn complete(data: Vec<UnifiedMarket>) -> Self {
        Self {
            total: data.len(),
            data,
            next_cursor: None,
        }
    }

    /// Whether another page exists.
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}
