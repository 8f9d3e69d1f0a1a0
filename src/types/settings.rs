use serde::{Deserialize, Serialize};

use crate::platform;

/// Service configuration, persisted as `settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncSettings {
    /// Period of the background alarm sync.
    pub sync_interval_minutes: u64,
    /// How many domains a snapshot keeps in its ranking.
    pub top_domain_limit: usize,
    /// Whether an alarm-triggered sync shows a notification.
    pub notify_on_alarm: bool,
    /// Directory where exports are written.
    pub export_dir: String,
    /// SQLite database holding the bookmark tree and the key-value store.
    pub database_path: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        let data_dir = platform::get_data_dir();
        Self {
            sync_interval_minutes: 60,
            top_domain_limit: 20,
            notify_on_alarm: true,
            export_dir: data_dir.join("exports").to_string_lossy().to_string(),
            database_path: data_dir.join("marksync.db").to_string_lossy().to_string(),
        }
    }
}
