use serde::{Deserialize, Serialize};

/// A node of the bookmark tree as handed out by a bookmark store.
///
/// A node carrying a `url` is a bookmark; a node without one is a folder.
/// The shape mirrors the browser `getTree()` payload so trees exported by a
/// browser can be imported verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Creation time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    /// Builds a folder node.
    pub fn folder(id: &str, title: &str, children: Vec<BookmarkNode>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: None,
            date_added: None,
            children,
        }
    }

    /// Builds a bookmark (leaf) node.
    pub fn bookmark(id: &str, title: &str, url: &str, date_added: Option<i64>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: Some(url.to_string()),
            date_added,
            children: Vec::new(),
        }
    }

    pub fn is_bookmark(&self) -> bool {
        self.url.is_some()
    }
}

/// A flattened, enriched bookmark as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub folder_path: String,
    pub date_added: Option<i64>,
    pub depth: usize,
    pub clicks: u64,
}
