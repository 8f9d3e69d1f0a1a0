use std::fmt;

use serde::{Deserialize, Serialize};

use super::bookmark::BookmarkEntry;

/// What caused a snapshot to be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncReason {
    Install,
    Manual,
    Alarm,
    Cleanup,
}

impl SyncReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncReason::Install => "install",
            SyncReason::Manual => "manual",
            SyncReason::Alarm => "alarm",
            SyncReason::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for SyncReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All entries sharing one (trimmed) URL. Only built when more than one entry shares it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub url: String,
    pub items: Vec<BookmarkEntry>,
    pub count: usize,
}

/// Number of entries pointing at one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSummary {
    pub domain: String,
    pub count: usize,
}

/// The persisted, fully recomputed view of the bookmark tree.
///
/// A new snapshot replaces the previous one wholesale; nothing is merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
    pub reason: SyncReason,
    pub count: usize,
    pub duplicate_groups: usize,
    pub duplicates: Vec<DuplicateGroup>,
    pub top_domains: Vec<DomainSummary>,
    pub oldest_bookmark: Option<BookmarkEntry>,
    pub newest_bookmark: Option<BookmarkEntry>,
    pub items: Vec<BookmarkEntry>,
}
