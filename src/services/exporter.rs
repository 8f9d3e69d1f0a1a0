//! Exporters for snapshots: pretty JSON, CSV and Netscape bookmark HTML.
//!
//! Renderers are pure and return the document text; saving is left to a
//! [`Presenter`](crate::services::presenter::Presenter).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::info;
use serde_json::{json, Value};

use crate::services::presenter::Presenter;
use crate::types::bookmark::BookmarkEntry;
use crate::types::errors::ExportError;
use crate::types::snapshot::Snapshot;

const CSV_HEADER: &str = "Title,URL,Folder,Date Added,Domain\n";

/// Pretty-printed JSON of the snapshot, or an empty document stamped with `now_millis`.
pub fn snapshot_json(snapshot: Option<&Snapshot>, now_millis: i64) -> Result<String, ExportError> {
    let value: Value = match snapshot {
        Some(s) => {
            serde_json::to_value(s).map_err(|e| ExportError::SerializationError(e.to_string()))?
        }
        None => json!({ "timestamp": now_millis, "items": [] }),
    };
    serde_json::to_string_pretty(&value).map_err(|e| ExportError::SerializationError(e.to_string()))
}

fn utc_from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

/// `bookmarks-YYYY-MM-DD-HH-MM-SS.json`, from the snapshot time in UTC.
pub fn json_filename(timestamp_millis: i64) -> String {
    format!(
        "bookmarks-{}.json",
        utc_from_millis(timestamp_millis).format("%Y-%m-%d-%H-%M-%S")
    )
}

pub fn csv_filename(now_millis: i64) -> String {
    format!("bookmarks-{}.csv", now_millis)
}

pub fn html_filename(now_millis: i64) -> String {
    format!("bookmarks-{}.html", now_millis)
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-01-02T03:04:05.006Z`.
pub fn iso_timestamp(millis: i64) -> String {
    utc_from_millis(millis).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// CSV with the header `Title,URL,Folder,Date Added,Domain`.
///
/// Every data field is double-quoted with embedded quotes doubled. Rows end
/// with `\n`; the last row has no terminator.
pub fn entries_csv(entries: &[BookmarkEntry]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for entry in entries {
        let date = entry.date_added.map(iso_timestamp).unwrap_or_default();
        writer
            .write_record([
                entry.title.as_str(),
                entry.url.as_str(),
                entry.folder_path.as_str(),
                date.as_str(),
                entry.domain.as_str(),
            ])
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;
    let body = String::from_utf8(bytes).map_err(|e| ExportError::SerializationError(e.to_string()))?;

    let mut out = String::with_capacity(CSV_HEADER.len() + body.len());
    out.push_str(CSV_HEADER);
    out.push_str(body.strip_suffix('\n').unwrap_or(&body));
    if entries.is_empty() {
        out.pop();
    }
    Ok(out)
}

/// Escapes `& < > "` for HTML text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Netscape bookmark file that browsers can import.
///
/// `ADD_DATE` is in whole seconds; entries without a creation time use `now_millis`.
pub fn netscape_html(entries: &[BookmarkEntry], now_millis: i64) -> String {
    let mut out = String::from(
        "<!DOCTYPE NETSCAPE-Bookmark-file-1>\n\
         <META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">\n\
         <TITLE>Bookmarks</TITLE>\n\
         <H1>Bookmarks</H1>\n\
         <DL><p>\n",
    );
    for entry in entries {
        let added = entry.date_added.unwrap_or(now_millis).div_euclid(1000);
        out.push_str(&format!(
            "    <DT><A HREF=\"{}\" ADD_DATE=\"{}\">{}</A>\n",
            escape_html(&entry.url),
            added,
            escape_html(&entry.title)
        ));
    }
    out.push_str("</DL><p>");
    out
}

/// Supported export documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Html,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "html" => Ok(ExportFormat::Html),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("json"),
            ExportFormat::Csv => f.write_str("csv"),
            ExportFormat::Html => f.write_str("html"),
        }
    }
}

/// Renders `snapshot` in `format` and hands it to the presenter. Returns the download id.
///
/// Without a snapshot the documents are empty rather than an error.
pub fn export(
    format: ExportFormat,
    snapshot: Option<&Snapshot>,
    presenter: &dyn Presenter,
    now_millis: i64,
) -> Result<String, ExportError> {
    let items: &[BookmarkEntry] = snapshot.map(|s| s.items.as_slice()).unwrap_or(&[]);
    let (filename, contents) = match format {
        ExportFormat::Json => {
            let stamp = snapshot.map_or(now_millis, |s| s.timestamp);
            (json_filename(stamp), snapshot_json(snapshot, now_millis)?)
        }
        ExportFormat::Csv => (csv_filename(now_millis), entries_csv(items)?),
        ExportFormat::Html => (html_filename(now_millis), netscape_html(items, now_millis)),
    };
    let download_id = presenter
        .save_file(&filename, &contents)
        .map_err(|e| ExportError::SaveFailed(e.to_string()))?;
    info!("exported {} entries as {} to {}", items.len(), format, download_id);
    Ok(download_id)
}
