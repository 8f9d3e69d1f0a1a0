//! Library view logic.
//!
//! Read-only queries over the last snapshot for the management page and the
//! popup. Click counts always come from the live stats, so a visit shows up
//! before the next sync.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::services::analyzer::{duplicate_key, group_by_url, rank_domains, OrderedGroups};
use crate::types::bookmark::BookmarkEntry;
use crate::types::command::{BookmarkQuery, SortKey};
use crate::types::snapshot::{DomainSummary, Snapshot};
use crate::types::stats::ClickStats;

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;
/// Domains listed in the statistics view.
pub const STATISTICS_TOP_DOMAINS: usize = 10;
/// Duplicate groups previewed in the statistics view.
pub const DUPLICATE_PREVIEWS: usize = 5;

/// One row of the library listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: BookmarkEntry,
    /// Whole days since creation, absent when the creation time is unknown.
    pub age_days: Option<i64>,
    pub is_duplicate: bool,
}

/// Number of entries in one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderCount {
    pub folder_path: String,
    pub count: usize,
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn matches(entry: &BookmarkEntry, query: &BookmarkQuery, text: &str, folder_text: &str) -> bool {
    if let Some(folder) = &query.folder {
        if &entry.folder_path != folder {
            return false;
        }
    }
    if !text.is_empty()
        && !contains_ci(&entry.title, text)
        && !contains_ci(&entry.url, text)
        && !contains_ci(&entry.domain, text)
    {
        return false;
    }
    if !folder_text.is_empty() && !contains_ci(&entry.folder_path, folder_text) {
        return false;
    }
    if let Some(domain) = &query.domain {
        if &entry.domain != domain {
            return false;
        }
    }
    true
}

fn compare(a: &EntryView, b: &EntryView, sort: SortKey) -> Ordering {
    match sort {
        SortKey::None => Ordering::Equal,
        SortKey::Title => a.entry.title.to_lowercase().cmp(&b.entry.title.to_lowercase()),
        SortKey::Recent => b
            .entry
            .date_added
            .unwrap_or(0)
            .cmp(&a.entry.date_added.unwrap_or(0)),
        SortKey::Clicks => b.entry.clicks.cmp(&a.entry.clicks),
        SortKey::Domain => a.entry.domain.cmp(&b.entry.domain),
    }
}

/// Filters and sorts the snapshot entries. Sorting is stable.
pub fn query(
    snapshot: &Snapshot,
    stats: &ClickStats,
    query: &BookmarkQuery,
    now_millis: i64,
) -> Vec<EntryView> {
    let mut url_counts: HashMap<&str, usize> = HashMap::new();
    for entry in &snapshot.items {
        *url_counts.entry(duplicate_key(&entry.url)).or_insert(0) += 1;
    }

    let text = query.text.trim().to_lowercase();
    let folder_text = query.folder_text.trim().to_lowercase();

    let mut rows: Vec<EntryView> = snapshot
        .items
        .iter()
        .filter(|entry| matches(entry, query, &text, &folder_text))
        .map(|entry| {
            let is_duplicate = url_counts
                .get(duplicate_key(&entry.url))
                .map_or(false, |&n| n > 1);
            let mut entry = entry.clone();
            entry.clicks = stats.clicks_for(&entry.url);
            EntryView {
                age_days: entry
                    .date_added
                    .map(|d| now_millis.saturating_sub(d).div_euclid(DAY_MILLIS)),
                is_duplicate,
                entry,
            }
        })
        .filter(|row| !query.duplicates_only || row.is_duplicate)
        .collect();

    rows.sort_by(|a, b| compare(a, b, query.sort));
    rows
}

/// Folders with their entry counts, sorted by path.
pub fn folder_counts(snapshot: &Snapshot) -> Vec<FolderCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in &snapshot.items {
        *counts.entry(entry.folder_path.as_str()).or_insert(0) += 1;
    }
    let mut folders: Vec<FolderCount> = counts
        .into_iter()
        .map(|(path, count)| FolderCount {
            folder_path: path.to_string(),
            count,
        })
        .collect();
    folders.sort_by(|a, b| a.folder_path.cmp(&b.folder_path));
    folders
}

/// Distinct domains, sorted.
pub fn domains(snapshot: &Snapshot) -> Vec<String> {
    let mut all: Vec<String> = snapshot.items.iter().map(|e| e.domain.clone()).collect();
    all.sort();
    all.dedup();
    all
}

/// "Just now", "{m}m ago" or "{h}h ago" for the time since `timestamp`.
pub fn relative_age_label(timestamp_millis: i64, now_millis: i64) -> String {
    let minutes = now_millis.saturating_sub(timestamp_millis).div_euclid(60_000);
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else {
        format!("{}h ago", minutes / 60)
    }
}

/// Figures shown in the popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupSummary {
    pub has_data: bool,
    pub total_bookmarks: usize,
    pub duplicate_groups: usize,
    /// Size of the snapshot's domain ranking, capped by its limit.
    pub domains: usize,
    pub total_clicks: u64,
    pub last_sync_label: Option<String>,
}

pub fn popup_summary(snapshot: Option<&Snapshot>, stats: &ClickStats, now_millis: i64) -> PopupSummary {
    let total_clicks = stats.url_click_total();
    match snapshot {
        Some(s) => PopupSummary {
            has_data: true,
            total_bookmarks: s.count,
            duplicate_groups: s.duplicate_groups,
            domains: s.top_domains.len(),
            total_clicks,
            last_sync_label: Some(relative_age_label(s.timestamp, now_millis)),
        },
        None => PopupSummary {
            has_data: false,
            total_bookmarks: 0,
            duplicate_groups: 0,
            domains: 0,
            total_clicks,
            last_sync_label: None,
        },
    }
}

/// A duplicated URL and the folders holding its copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatePreview {
    pub url: String,
    pub count: usize,
    pub folders: Vec<String>,
}

/// The statistics dialog of the library page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStatistics {
    pub total_bookmarks: usize,
    pub duplicate_urls: usize,
    pub unique_domains: usize,
    pub total_clicks: u64,
    pub top_domains: Vec<DomainSummary>,
    pub oldest_bookmark: Option<BookmarkEntry>,
    pub newest_bookmark: Option<BookmarkEntry>,
    pub duplicate_previews: Vec<DuplicatePreview>,
    /// Duplicate groups beyond the previews.
    pub more_duplicates: usize,
}

pub fn statistics(snapshot: &Snapshot, stats: &ClickStats) -> LibraryStatistics {
    let duplicates: Vec<_> = group_by_url(&snapshot.items)
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .collect();

    let mut by_domain = OrderedGroups::new();
    for entry in &snapshot.items {
        by_domain.push(entry.domain.as_str(), entry);
    }
    let domain_counts: Vec<DomainSummary> = by_domain
        .into_groups()
        .into_iter()
        .map(|(domain, members)| DomainSummary {
            domain: domain.to_string(),
            count: members.len(),
        })
        .collect();
    let unique_domains = domain_counts.len();

    let duplicate_previews = duplicates
        .iter()
        .take(DUPLICATE_PREVIEWS)
        .map(|(url, members)| DuplicatePreview {
            url: url.to_string(),
            count: members.len(),
            folders: members.iter().map(|e| e.folder_path.clone()).collect(),
        })
        .collect();

    LibraryStatistics {
        total_bookmarks: snapshot.items.len(),
        duplicate_urls: duplicates.len(),
        unique_domains,
        total_clicks: stats.url_click_total(),
        top_domains: rank_domains(domain_counts, STATISTICS_TOP_DOMAINS),
        oldest_bookmark: snapshot.oldest_bookmark.clone(),
        newest_bookmark: snapshot.newest_bookmark.clone(),
        duplicate_previews,
        more_duplicates: duplicates.len().saturating_sub(DUPLICATE_PREVIEWS),
    }
}
