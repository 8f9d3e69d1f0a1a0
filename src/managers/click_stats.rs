//! Click statistics owned by the service.
//!
//! `ClickStatsManager` is created from the key-value store at startup and
//! writes itself back after every mutation. Concurrent writers are not
//! coordinated: the last flush wins.

use log::warn;

use crate::managers::kv_store::{load_json, save_json, KeyValueStore, STATS_KEY};
use crate::types::errors::StoreError;
use crate::types::stats::ClickStats;

pub struct ClickStatsManager {
    stats: ClickStats,
}

impl ClickStatsManager {
    /// Wraps already-loaded stats.
    pub fn new(stats: ClickStats) -> Self {
        Self { stats }
    }

    /// Loads the persisted stats, starting from zero when none exist.
    ///
    /// A stored value that no longer decodes is discarded with a warning.
    pub fn load(kv: &dyn KeyValueStore) -> Result<Self, StoreError> {
        match load_json::<ClickStats>(kv, STATS_KEY) {
            Ok(stats) => Ok(Self::new(stats.unwrap_or_default())),
            Err(StoreError::SerializationError(msg)) => {
                warn!("discarding unreadable click stats: {}", msg);
                Ok(Self::new(ClickStats::default()))
            }
            Err(e) => Err(e),
        }
    }

    pub fn stats(&self) -> &ClickStats {
        &self.stats
    }

    /// Persists the current stats.
    pub fn flush(&self, kv: &dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(kv, STATS_KEY, &self.stats)
    }

    /// Counts one completed navigation to `url`.
    pub fn record_visit(&mut self, kv: &dyn KeyValueStore, url: &str) -> Result<(), StoreError> {
        self.stats.total_clicks = self.stats.total_clicks.saturating_add(1);
        let clicks = self.stats.clicks_by_url.entry(url.to_string()).or_insert(0);
        *clicks = clicks.saturating_add(1);
        self.flush(kv)
    }

    /// Counts one search performed in the library view.
    pub fn increment_search(&mut self, kv: &dyn KeyValueStore) -> Result<(), StoreError> {
        self.stats.search_count = self.stats.search_count.saturating_add(1);
        self.flush(kv)
    }

    /// Records the completion time of a sync.
    pub fn mark_synced(&mut self, kv: &dyn KeyValueStore, at_millis: i64) -> Result<(), StoreError> {
        self.stats.last_sync = Some(at_millis);
        self.flush(kv)
    }
}
