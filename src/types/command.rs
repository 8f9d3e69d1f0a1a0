use serde::{Deserialize, Serialize};

/// A request delivered over the command bus.
///
/// Serialized with an internal `type` tag, e.g.
/// `{"type":"deleteDuplicates","keepFirst":true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    Ping,
    ManualSync,
    GetStorage,
    GetStats,
    IncrementSearch,
    #[serde(rename = "downloadJSON")]
    DownloadJson,
    #[serde(rename = "exportCSV")]
    ExportCsv,
    #[serde(rename = "exportHTML")]
    ExportHtml,
    DeleteDuplicates {
        #[serde(rename = "keepFirst", default)]
        keep_first: bool,
    },
    RecordVisit {
        url: String,
    },
    RenameBookmark {
        id: String,
        title: String,
    },
    RemoveBookmark {
        id: String,
    },
    QueryBookmarks {
        #[serde(default)]
        query: BookmarkQuery,
    },
    GetSummary,
    GetStatistics,
    GetSettings,
    SetSetting {
        key: String,
        value: serde_json::Value,
    },
    ResetSettings,
}

/// Sort order for the library listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Keep snapshot (tree) order.
    #[default]
    None,
    Title,
    Recent,
    Clicks,
    Domain,
}

/// Filters applied to the library listing. Empty fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookmarkQuery {
    /// Case-insensitive match against title, URL and domain.
    pub text: String,
    /// Exact folder path.
    pub folder: Option<String>,
    /// Case-insensitive match against the folder path.
    pub folder_text: String,
    /// Exact domain.
    pub domain: Option<String>,
    pub duplicates_only: bool,
    pub sort: SortKey,
}
