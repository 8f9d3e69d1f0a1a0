//! Command handler for the marksync command bus.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! Commands arrive as JSON objects tagged by `type`; `handle_command`
//! matches every variant of [`Command`] and answers with a JSON value.

use std::sync::Mutex;

use chrono::Utc;
use serde_json::{json, Value};

use crate::app::{lock_app, App};
use crate::services::exporter::ExportFormat;
use crate::services::library_view;
use crate::types::command::Command;
use crate::types::snapshot::SyncReason;

/// Decodes a `{"type": ...}` object into a [`Command`].
pub fn parse_command(value: &Value) -> Result<Command, String> {
    let kind = value
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("missing command type")?;
    serde_json::from_value(value.clone()).map_err(|e| format!("invalid command '{}': {}", kind, e))
}

/// Parses and dispatches one command object.
pub fn handle_request(app: &Mutex<App>, value: &Value) -> Result<Value, String> {
    let command = parse_command(value)?;
    handle_command(app, command)
}

fn export(app: &Mutex<App>, format: ExportFormat) -> Result<Value, String> {
    let a = lock_app(app);
    let download_id = a.export(format).map_err(|e| e.to_string())?;
    Ok(json!({"ok": true, "downloadId": download_id}))
}

/// Dispatches a command to the application.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_command(app: &Mutex<App>, command: Command) -> Result<Value, String> {
    match command {
        // ─── Ping ───
        Command::Ping => Ok(json!({"pong": true})),

        // ─── Sync ───
        Command::ManualSync => {
            let mut a = lock_app(app);
            let ok = a.run_sync(SyncReason::Manual).is_some();
            Ok(json!({"ok": ok}))
        }
        Command::GetStorage => {
            let a = lock_app(app);
            let snapshot = a.load_snapshot().map_err(|e| e.to_string())?;
            serde_json::to_value(snapshot).map_err(|e| e.to_string())
        }

        // ─── Stats ───
        Command::GetStats => {
            let a = lock_app(app);
            serde_json::to_value(a.stats()).map_err(|e| e.to_string())
        }
        Command::IncrementSearch => {
            let mut a = lock_app(app);
            a.increment_search().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        Command::RecordVisit { url } => {
            if url.trim().is_empty() {
                return Err("missing url".to_string());
            }
            let mut a = lock_app(app);
            a.record_visit(&url).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Export ───
        Command::DownloadJson => export(app, ExportFormat::Json),
        Command::ExportCsv => export(app, ExportFormat::Csv),
        Command::ExportHtml => export(app, ExportFormat::Html),

        // ─── Cleanup ───
        Command::DeleteDuplicates { keep_first } => {
            let mut a = lock_app(app);
            let report = a.delete_duplicates(keep_first).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "deleted": report.deleted}))
        }

        // ─── Bookmarks ───
        Command::RenameBookmark { id, title } => {
            let mut a = lock_app(app);
            let changed = a.rename_bookmark(&id, &title).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "changed": changed}))
        }
        Command::RemoveBookmark { id } => {
            let mut a = lock_app(app);
            a.remove_bookmark(&id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Library ───
        Command::QueryBookmarks { query } => {
            let a = lock_app(app);
            let snapshot = a.load_snapshot().map_err(|e| e.to_string())?;
            match snapshot {
                Some(s) => {
                    let now = Utc::now().timestamp_millis();
                    let items = library_view::query(&s, a.stats(), &query, now);
                    Ok(json!({
                        "items": items,
                        "folders": library_view::folder_counts(&s),
                        "domains": library_view::domains(&s),
                    }))
                }
                None => Ok(json!({"items": [], "folders": [], "domains": []})),
            }
        }
        Command::GetSummary => {
            let a = lock_app(app);
            let snapshot = a.load_snapshot().map_err(|e| e.to_string())?;
            let summary =
                library_view::popup_summary(snapshot.as_ref(), a.stats(), Utc::now().timestamp_millis());
            serde_json::to_value(summary).map_err(|e| e.to_string())
        }
        Command::GetStatistics => {
            let a = lock_app(app);
            let snapshot = a.load_snapshot().map_err(|e| e.to_string())?;
            let statistics = snapshot.map(|s| library_view::statistics(&s, a.stats()));
            serde_json::to_value(statistics).map_err(|e| e.to_string())
        }

        // ─── Settings ───
        Command::GetSettings => {
            let a = lock_app(app);
            serde_json::to_value(a.settings()).map_err(|e| e.to_string())
        }
        Command::SetSetting { key, value } => {
            let mut a = lock_app(app);
            a.set_setting(&key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        Command::ResetSettings => {
            let mut a = lock_app(app);
            a.reset_settings().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
    }
}
