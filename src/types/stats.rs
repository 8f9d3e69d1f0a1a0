use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Usage counters shared by the whole service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClickStats {
    pub total_clicks: u64,
    pub clicks_by_url: HashMap<String, u64>,
    /// Time of the last completed sync in epoch milliseconds.
    pub last_sync: Option<i64>,
    pub search_count: u64,
}

impl ClickStats {
    /// Click count recorded for `url`, zero when never visited.
    pub fn clicks_for(&self, url: &str) -> u64 {
        self.clicks_by_url.get(url).copied().unwrap_or(0)
    }

    /// Sum of all per-URL click counters, saturating at `u64::MAX`.
    pub fn url_click_total(&self) -> u64 {
        self.clicks_by_url
            .values()
            .fold(0, |total, &n| total.saturating_add(n))
    }
}
