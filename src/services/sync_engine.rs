//! Snapshot Builder.
//!
//! Every sync re-reads the whole bookmark tree, recomputes the snapshot from
//! scratch and overwrites the persisted one. Nothing is merged with earlier
//! snapshots, so concurrent syncs simply race and the last write wins.

use chrono::Utc;
use log::{error, info, warn};

use crate::managers::bookmark_store::BookmarkStore;
use crate::managers::click_stats::ClickStatsManager;
use crate::managers::kv_store::{load_json, save_json, KeyValueStore, SNAPSHOT_KEY};
use crate::services::analyzer::analyze;
use crate::services::presenter::Presenter;
use crate::services::reader::flatten_tree;
use crate::types::bookmark::BookmarkNode;
use crate::types::errors::{StoreError, SyncError};
use crate::types::settings::SyncSettings;
use crate::types::snapshot::{Snapshot, SyncReason};
use crate::types::stats::ClickStats;

/// Title of the notification shown after an alarm sync.
pub const SYNC_NOTIFICATION_TITLE: &str = "Bookmarks Synced";

/// Builds a snapshot from a bookmark tree without touching any store.
pub fn build_snapshot(
    roots: &[BookmarkNode],
    stats: &ClickStats,
    reason: SyncReason,
    now_millis: i64,
    top_domain_limit: usize,
) -> Snapshot {
    let items = flatten_tree(roots, stats);
    let analysis = analyze(&items, top_domain_limit);
    Snapshot {
        timestamp: now_millis,
        reason,
        count: items.len(),
        duplicate_groups: analysis.duplicates.len(),
        duplicates: analysis.duplicates,
        top_domains: analysis.top_domains,
        oldest_bookmark: analysis.oldest,
        newest_bookmark: analysis.newest,
        items,
    }
}

/// Body of the alarm notification.
pub fn notification_message(snapshot: &Snapshot) -> String {
    format!(
        "{} bookmarks synced\n{} duplicates found",
        snapshot.count, snapshot.duplicate_groups
    )
}

/// Drives a sync against borrowed collaborators.
pub struct SyncEngine<'a> {
    bookmarks: &'a dyn BookmarkStore,
    kv: &'a dyn KeyValueStore,
    presenter: &'a dyn Presenter,
    top_domain_limit: usize,
    notify_on_alarm: bool,
}

impl<'a> SyncEngine<'a> {
    pub fn new(
        bookmarks: &'a dyn BookmarkStore,
        kv: &'a dyn KeyValueStore,
        presenter: &'a dyn Presenter,
        settings: &SyncSettings,
    ) -> Self {
        Self {
            bookmarks,
            kv,
            presenter,
            top_domain_limit: settings.top_domain_limit,
            notify_on_alarm: settings.notify_on_alarm,
        }
    }

    pub fn bookmarks(&self) -> &'a dyn BookmarkStore {
        self.bookmarks
    }

    pub fn kv(&self) -> &'a dyn KeyValueStore {
        self.kv
    }

    /// Reads the tree, rebuilds the snapshot and persists it along with `lastSync`.
    ///
    /// A failed read leaves the stored snapshot untouched. Failing to store
    /// `lastSync` is logged and does not fail the sync.
    pub fn sync(
        &self,
        reason: SyncReason,
        stats: &mut ClickStatsManager,
    ) -> Result<Snapshot, SyncError> {
        let roots = self
            .bookmarks
            .get_tree()
            .map_err(|e| SyncError::ReadFailed(e.to_string()))?;
        let now = Utc::now().timestamp_millis();
        let snapshot = build_snapshot(&roots, stats.stats(), reason, now, self.top_domain_limit);

        save_json(self.kv, SNAPSHOT_KEY, &snapshot)
            .map_err(|e| SyncError::PersistFailed(e.to_string()))?;
        // lastSync is best effort once the snapshot is stored.
        if let Err(e) = stats.mark_synced(self.kv, now) {
            warn!("sync ({}): could not record last sync time: {}", reason, e);
        }

        info!(
            "sync ({}): {} bookmarks, {} duplicate groups",
            reason, snapshot.count, snapshot.duplicate_groups
        );

        if reason == SyncReason::Alarm && self.notify_on_alarm {
            let message = notification_message(&snapshot);
            if let Err(e) = self.presenter.notify(SYNC_NOTIFICATION_TITLE, &message) {
                warn!("sync notification failed: {}", e);
            }
        }

        Ok(snapshot)
    }

    /// Runs a sync and logs instead of propagating a failure.
    pub fn run_sync(&self, reason: SyncReason, stats: &mut ClickStatsManager) -> Option<Snapshot> {
        match self.sync(reason, stats) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                error!("sync ({}) failed: {}", reason, e);
                None
            }
        }
    }

    /// The last persisted snapshot, if any sync has completed.
    pub fn load_snapshot(&self) -> Result<Option<Snapshot>, StoreError> {
        load_snapshot(self.kv)
    }
}

/// Reads the persisted snapshot from `kv`.
pub fn load_snapshot(kv: &dyn KeyValueStore) -> Result<Option<Snapshot>, StoreError> {
    load_json(kv, SNAPSHOT_KEY)
}
