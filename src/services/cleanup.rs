//! Duplicate cleanup.
//!
//! Works on the live tree rather than the last snapshot, so bookmarks added
//! since the last sync are considered too. Removal is sequential and a
//! failure on one entry does not stop the others.

use log::{info, warn};

use crate::managers::click_stats::ClickStatsManager;
use crate::services::analyzer::group_by_url;
use crate::services::reader::flatten_tree;
use crate::services::sync_engine::SyncEngine;
use crate::types::bookmark::BookmarkEntry;
use crate::types::errors::StoreError;
use crate::types::snapshot::SyncReason;

/// Outcome of a cleanup run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Entries actually removed by this run.
    pub deleted: usize,
    /// Entries that were gone before removal was attempted.
    pub already_gone: usize,
    /// Entries whose removal failed for another reason.
    pub failed: usize,
}

/// Picks which entries to remove, group by group, in the order they would be removed.
///
/// Each duplicate group is sorted by creation time (missing times count as
/// zero, ties keep tree order). Keep-first retains the earliest member,
/// keep-last the latest.
pub fn plan_removals(entries: &[BookmarkEntry], keep_first: bool) -> Vec<&BookmarkEntry> {
    let mut removals = Vec::new();
    for (_, mut members) in group_by_url(entries) {
        if members.len() < 2 {
            continue;
        }
        members.sort_by_key(|entry| entry.date_added.unwrap_or(0));
        let doomed = if keep_first {
            &members[1..]
        } else {
            &members[..members.len() - 1]
        };
        removals.extend_from_slice(doomed);
    }
    removals
}

/// Removes duplicate bookmarks, then takes a `cleanup` snapshot.
///
/// Fails only when the tree itself cannot be read; in that case nothing is
/// removed and no snapshot is taken.
pub fn delete_duplicates(
    engine: &SyncEngine,
    stats: &mut ClickStatsManager,
    keep_first: bool,
) -> Result<CleanupReport, StoreError> {
    let roots = engine.bookmarks().get_tree()?;
    let entries = flatten_tree(&roots, stats.stats());
    let mut report = CleanupReport::default();

    for entry in plan_removals(&entries, keep_first) {
        match engine.bookmarks().remove(&entry.id) {
            Ok(()) => report.deleted += 1,
            Err(StoreError::NotFound(_)) => report.already_gone += 1,
            Err(e) => {
                warn!("could not remove duplicate {} ({}): {}", entry.id, entry.url, e);
                report.failed += 1;
            }
        }
    }

    info!(
        "cleanup (keep {}): {} removed, {} already gone, {} failed",
        if keep_first { "first" } else { "last" },
        report.deleted,
        report.already_gone,
        report.failed
    );

    engine.run_sync(SyncReason::Cleanup, stats);
    Ok(report)
}
