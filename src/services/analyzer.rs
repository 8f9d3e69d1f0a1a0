//! Duplicate Analyzer.
//!
//! Groups flattened entries by URL and by domain. Duplicate detection is an
//! exact string match after trimming surrounding whitespace: trailing
//! slashes, query order and letter case are significant.

use std::collections::HashMap;

use crate::types::bookmark::BookmarkEntry;
use crate::types::snapshot::{DomainSummary, DuplicateGroup};

/// Default number of domains kept in a ranking.
pub const DEFAULT_TOP_DOMAINS: usize = 20;

/// Key under which an entry is grouped for duplicate detection.
pub fn duplicate_key(url: &str) -> &str {
    url.trim()
}

/// Groups keyed by string, kept in first-seen order.
pub struct OrderedGroups<'a> {
    index: HashMap<&'a str, usize>,
    groups: Vec<(&'a str, Vec<&'a BookmarkEntry>)>,
}

impl<'a> OrderedGroups<'a> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    pub fn push(&mut self, key: &'a str, entry: &'a BookmarkEntry) {
        match self.index.get(key) {
            Some(&slot) => self.groups[slot].1.push(entry),
            None => {
                self.index.insert(key, self.groups.len());
                self.groups.push((key, vec![entry]));
            }
        }
    }

    pub fn into_groups(self) -> Vec<(&'a str, Vec<&'a BookmarkEntry>)> {
        self.groups
    }
}

impl<'a> Default for OrderedGroups<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Entries grouped by [`duplicate_key`], first-seen order.
pub fn group_by_url(entries: &[BookmarkEntry]) -> Vec<(&str, Vec<&BookmarkEntry>)> {
    let mut groups = OrderedGroups::new();
    for entry in entries {
        groups.push(duplicate_key(&entry.url), entry);
    }
    groups.into_groups()
}

/// Everything the snapshot derives from the entry list.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub duplicates: Vec<DuplicateGroup>,
    pub top_domains: Vec<DomainSummary>,
    pub oldest: Option<BookmarkEntry>,
    pub newest: Option<BookmarkEntry>,
}

/// Builds the URL and domain groupings in a single pass over `entries`.
pub fn analyze(entries: &[BookmarkEntry], top_domain_limit: usize) -> Analysis {
    let mut by_url = OrderedGroups::new();
    let mut by_domain = OrderedGroups::new();
    for entry in entries {
        by_url.push(duplicate_key(&entry.url), entry);
        by_domain.push(entry.domain.as_str(), entry);
    }

    let duplicates = by_url
        .into_groups()
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(url, members)| DuplicateGroup {
            url: url.to_string(),
            count: members.len(),
            items: members.into_iter().cloned().collect(),
        })
        .collect();

    let counts = by_domain
        .into_groups()
        .into_iter()
        .map(|(domain, members)| DomainSummary {
            domain: domain.to_string(),
            count: members.len(),
        })
        .collect();

    Analysis {
        duplicates,
        top_domains: rank_domains(counts, top_domain_limit),
        oldest: oldest_entry(entries).cloned(),
        newest: newest_entry(entries).cloned(),
    }
}

/// Sorts by descending count, keeping first-seen order among ties, and truncates.
pub fn rank_domains(mut summaries: Vec<DomainSummary>, limit: usize) -> Vec<DomainSummary> {
    // sort_by is stable, which is what keeps ties in first-seen order.
    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries.truncate(limit);
    summaries
}

/// Linear reduction over creation times. An entry without a timestamp only
/// wins when no entry has one; ties keep the earlier entry.
fn pick_by_date<F>(entries: &[BookmarkEntry], replaces: F) -> Option<&BookmarkEntry>
where
    F: Fn(i64, i64) -> bool,
{
    entries.iter().fold(None, |best: Option<&BookmarkEntry>, entry| match best {
        None => Some(entry),
        Some(current) => match (entry.date_added, current.date_added) {
            (Some(candidate), Some(held)) if replaces(candidate, held) => Some(entry),
            (Some(_), None) => Some(entry),
            _ => Some(current),
        },
    })
}

pub fn oldest_entry(entries: &[BookmarkEntry]) -> Option<&BookmarkEntry> {
    pick_by_date(entries, |candidate, held| candidate < held)
}

pub fn newest_entry(entries: &[BookmarkEntry]) -> Option<&BookmarkEntry> {
    pick_by_date(entries, |candidate, held| candidate > held)
}
