//! Bookmark Reader.
//!
//! Flattens a bookmark tree into entries in pre-order, annotating each one
//! with its folder path, depth, domain and click count. The walk keeps its
//! own stack so deep folder hierarchies cannot exhaust the call stack.

use url::Url;

use crate::types::bookmark::{BookmarkEntry, BookmarkNode};
use crate::types::stats::ClickStats;

/// Domain used when a URL does not parse or carries no host.
pub const UNKNOWN_DOMAIN: &str = "unknown";
/// Folder path of entries without a named ancestor folder.
pub const ROOT_FOLDER: &str = "Root";

/// Lowercased host of `url` without leading `www.` labels, or `"unknown"`.
pub fn extract_domain(url: &str) -> String {
    let host = match Url::parse(url) {
        Ok(parsed) => parsed.host_str().map(|h| h.to_lowercase()),
        Err(_) => None,
    };
    match host {
        Some(h) => {
            let stripped = h.trim_start_matches("www.");
            if stripped.is_empty() {
                UNKNOWN_DOMAIN.to_string()
            } else {
                stripped.to_string()
            }
        }
        None => UNKNOWN_DOMAIN.to_string(),
    }
}

struct Frame<'a> {
    node: &'a BookmarkNode,
    depth: usize,
    /// Named ancestor folders joined by `/`; empty at the top.
    path: String,
}

/// Lazy pre-order iterator over the bookmarks of a tree.
pub struct TreeWalker<'a> {
    stack: Vec<Frame<'a>>,
    stats: &'a ClickStats,
}

impl<'a> TreeWalker<'a> {
    pub fn new(roots: &'a [BookmarkNode], stats: &'a ClickStats) -> Self {
        let stack = roots
            .iter()
            .rev()
            .map(|node| Frame {
                node,
                depth: 0,
                path: String::new(),
            })
            .collect();
        Self { stack, stats }
    }

    fn push_children(&mut self, frame: &Frame<'a>) {
        if frame.node.children.is_empty() {
            return;
        }
        let child_path = match (frame.path.is_empty(), frame.node.title.is_empty()) {
            (_, true) => frame.path.clone(),
            (true, false) => frame.node.title.clone(),
            (false, false) => format!("{}/{}", frame.path, frame.node.title),
        };
        for child in frame.node.children.iter().rev() {
            self.stack.push(Frame {
                node: child,
                depth: frame.depth + 1,
                path: child_path.clone(),
            });
        }
    }

    fn to_entry(&self, frame: &Frame<'a>, url: &str) -> BookmarkEntry {
        let node = frame.node;
        BookmarkEntry {
            id: node.id.clone(),
            title: if node.title.is_empty() {
                url.to_string()
            } else {
                node.title.clone()
            },
            url: url.to_string(),
            domain: extract_domain(url),
            folder_path: if frame.path.is_empty() {
                ROOT_FOLDER.to_string()
            } else {
                frame.path.clone()
            },
            date_added: node.date_added,
            depth: frame.depth,
            clicks: self.stats.clicks_for(url),
        }
    }
}

impl<'a> Iterator for TreeWalker<'a> {
    type Item = BookmarkEntry;

    fn next(&mut self) -> Option<BookmarkEntry> {
        while let Some(frame) = self.stack.pop() {
            self.push_children(&frame);
            if let Some(url) = frame.node.url.as_deref() {
                return Some(self.to_entry(&frame, url));
            }
        }
        None
    }
}

/// Collects every bookmark of the tree in pre-order.
pub fn flatten_tree(roots: &[BookmarkNode], stats: &ClickStats) -> Vec<BookmarkEntry> {
    TreeWalker::new(roots, stats).collect()
}
