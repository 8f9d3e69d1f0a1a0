//! Unit tests for the command handler, covering every command dispatched by `handle_command`.
//!
//! These tests run commands through the same code path used by the
//! `marksync-rpc` binary, using a temporary on-disk SQLite database.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

use serde_json::{json, Value};
use tempfile::TempDir;

use marksync::app::{lock_app, App};
use marksync::rpc_handler::{handle_request, parse_command};
use marksync::services::settings_engine::SettingsEngine;
use marksync::types::command::{BookmarkQuery, Command, SortKey};
use marksync::types::settings::SyncSettings;

/// Create a fresh App backed by a temp directory.
fn setup() -> (Mutex<App>, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let settings = SyncSettings {
        database_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        export_dir: tmp.path().join("exports").to_string_lossy().to_string(),
        ..SyncSettings::default()
    };
    let config = tmp.path().join("settings.json").to_string_lossy().to_string();
    let engine = SettingsEngine::with_settings(Some(config), settings);
    let app = App::new(engine).expect("Failed to init App");
    {
        let store = app.bookmark_store();
        let bar = store.add_folder(None, "Bar").unwrap();
        store.add_bookmark(Some(&bar), "A", "https://a.com", Some(100)).unwrap();
        store.add_bookmark(Some(&bar), "A2", "https://a.com", Some(300)).unwrap();
        store.add_bookmark(Some(&bar), "A3", "https://a.com", Some(200)).unwrap();
        store.add_bookmark(None, "B & C", "https://b.org", None).unwrap();
    }
    (Mutex::new(app), tmp)
}

fn call(app: &Mutex<App>, command: Value) -> Value {
    handle_request(app, &command).unwrap()
}

// ─── Parsing ───

#[test]
fn test_parse_command_variants() {
    assert_eq!(parse_command(&json!({"type": "ping"})).unwrap(), Command::Ping);
    assert_eq!(parse_command(&json!({"type": "downloadJSON"})).unwrap(), Command::DownloadJson);
    assert_eq!(
        parse_command(&json!({"type": "deleteDuplicates", "keepFirst": true})).unwrap(),
        Command::DeleteDuplicates { keep_first: true }
    );
    assert_eq!(
        parse_command(&json!({"type": "deleteDuplicates"})).unwrap(),
        Command::DeleteDuplicates { keep_first: false }
    );
    assert_eq!(
        parse_command(&json!({"type": "queryBookmarks", "query": {"text": "a", "sort": "clicks"}})).unwrap(),
        Command::QueryBookmarks {
            query: BookmarkQuery {
                text: "a".to_string(),
                sort: SortKey::Clicks,
                ..BookmarkQuery::default()
            }
        }
    );
}

#[test]
fn test_unknown_or_untyped_command_is_error() {
    let (app, _tmp) = setup();
    let err = handle_request(&app, &json!({"type": "fly"})).unwrap_err();
    assert!(err.contains("invalid command 'fly'"));
    let err = handle_request(&app, &json!({"keepFirst": true})).unwrap_err();
    assert!(err.contains("missing command type"));
}

// ─── Ping ───

#[test]
fn test_ping() {
    let (app, _tmp) = setup();
    assert_eq!(call(&app, json!({"type": "ping"})), json!({"pong": true}));
}

// ─── Sync ───

#[test]
fn test_get_storage_is_null_before_sync() {
    let (app, _tmp) = setup();
    assert_eq!(call(&app, json!({"type": "getStorage"})), Value::Null);
}

#[test]
fn test_manual_sync_then_get_storage() {
    let (app, _tmp) = setup();
    assert_eq!(call(&app, json!({"type": "manualSync"})), json!({"ok": true}));
    let storage = call(&app, json!({"type": "getStorage"}));
    assert_eq!(storage["reason"], "manual");
    assert_eq!(storage["count"], 4);
    assert_eq!(storage["duplicateGroups"], 1);
    assert_eq!(storage["items"].as_array().unwrap().len(), 4);
}

#[test]
fn test_startup_runs_install_sync_once() {
    let (app, _tmp) = setup();
    assert!(app.lock().unwrap().startup().unwrap());
    assert_eq!(call(&app, json!({"type": "getStorage"}))["reason"], "install");
    call(&app, json!({"type": "manualSync"}));
    assert!(!app.lock().unwrap().startup().unwrap());
    assert_eq!(call(&app, json!({"type": "getStorage"}))["reason"], "manual");
}

// ─── Stats ───

#[test]
fn test_stats_commands() {
    let (app, _tmp) = setup();
    call(&app, json!({"type": "incrementSearch"}));
    call(&app, json!({"type": "recordVisit", "url": "https://a.com"}));
    let stats = call(&app, json!({"type": "getStats"}));
    assert_eq!(stats["searchCount"], 1);
    assert_eq!(stats["totalClicks"], 1);
    assert_eq!(stats["clicksByUrl"]["https://a.com"], 1);
    assert_eq!(stats["lastSync"], Value::Null);

    assert!(handle_request(&app, &json!({"type": "recordVisit", "url": " "})).is_err());
}

// ─── Cleanup ───

#[test]
fn test_delete_duplicates_keep_first() {
    let (app, _tmp) = setup();
    let res = call(&app, json!({"type": "deleteDuplicates", "keepFirst": true}));
    assert_eq!(res, json!({"ok": true, "deleted": 2}));

    let storage = call(&app, json!({"type": "getStorage"}));
    assert_eq!(storage["reason"], "cleanup");
    assert_eq!(storage["count"], 2);
    let a = storage["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["url"] == "https://a.com")
        .unwrap();
    assert_eq!(a["dateAdded"], 100);
}

#[test]
fn test_delete_duplicates_keep_last() {
    let (app, _tmp) = setup();
    call(&app, json!({"type": "deleteDuplicates", "keepFirst": false}));
    let storage = call(&app, json!({"type": "getStorage"}));
    let dates: Vec<&Value> = storage["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| i["url"] == "https://a.com")
        .map(|i| &i["dateAdded"])
        .collect();
    assert_eq!(dates, vec![&json!(300)]);
}

// ─── Export ───

#[test]
fn test_exports_write_files() {
    let (app, tmp) = setup();
    call(&app, json!({"type": "manualSync"}));

    for kind in ["downloadJSON", "exportCSV", "exportHTML"] {
        let res = call(&app, json!({"type": kind}));
        assert_eq!(res["ok"], true);
        let path = res["downloadId"].as_str().unwrap();
        assert!(std::path::Path::new(path).exists(), "{} should exist", path);
    }
    let written = std::fs::read_dir(tmp.path().join("exports")).unwrap().count();
    assert_eq!(written, 3);
}

#[test]
fn test_export_json_without_snapshot() {
    let (app, _tmp) = setup();
    let res = call(&app, json!({"type": "downloadJSON"}));
    let text = std::fs::read_to_string(res["downloadId"].as_str().unwrap()).unwrap();
    let doc: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc["items"], json!([]));
    assert!(doc["timestamp"].is_i64());
}

// ─── Bookmarks ───

#[test]
fn test_rename_and_remove_refresh_snapshot() {
    let (app, _tmp) = setup();
    call(&app, json!({"type": "manualSync"}));
    let storage = call(&app, json!({"type": "getStorage"}));
    let id = storage["items"][3]["id"].as_str().unwrap().to_string();

    call(&app, json!({"type": "renameBookmark", "id": id, "title": "Renamed"}));
    let storage = call(&app, json!({"type": "getStorage"}));
    assert_eq!(storage["items"][3]["title"], "Renamed");

    call(&app, json!({"type": "removeBookmark", "id": id}));
    assert_eq!(call(&app, json!({"type": "getStorage"}))["count"], 3);

    let err = handle_request(&app, &json!({"type": "removeBookmark", "id": id})).unwrap_err();
    assert!(err.contains("Bookmark not found"));
}

#[test]
fn test_rename_with_same_title_is_a_no_op() {
    let (app, _tmp) = setup();
    call(&app, json!({"type": "manualSync"}));
    let before = call(&app, json!({"type": "getStorage"}));
    let id = before["items"][3]["id"].as_str().unwrap().to_string();

    let res = call(&app, json!({"type": "renameBookmark", "id": id, "title": "B & C"}));
    assert_eq!(res, json!({"ok": true, "changed": false}));
    let after = call(&app, json!({"type": "getStorage"}));
    assert_eq!(after["timestamp"], before["timestamp"]);

    let res = call(&app, json!({"type": "renameBookmark", "id": id, "title": "B and C"}));
    assert_eq!(res, json!({"ok": true, "changed": true}));
}

#[test]
fn test_rename_unknown_bookmark_fails() {
    let (app, _tmp) = setup();
    let err = handle_request(
        &app,
        &json!({"type": "renameBookmark", "id": "missing", "title": "X"}),
    )
    .unwrap_err();
    assert!(err.contains("Bookmark not found"));
}

// ─── Library ───

#[test]
fn test_query_bookmarks() {
    let (app, _tmp) = setup();
    let empty = call(&app, json!({"type": "queryBookmarks"}));
    assert_eq!(empty["items"], json!([]));

    call(&app, json!({"type": "manualSync"}));
    let res = call(&app, json!({"type": "queryBookmarks", "query": {"duplicatesOnly": true}}));
    assert_eq!(res["items"].as_array().unwrap().len(), 3);
    assert_eq!(res["items"][0]["isDuplicate"], true);
    assert_eq!(res["items"][0]["folderPath"], "Bar");
    assert_eq!(res["domains"], json!(["a.com", "b.org"]));
    assert_eq!(res["folders"][0]["folderPath"], "Bar");
}

#[test]
fn test_summary_and_statistics() {
    let (app, _tmp) = setup();
    let summary = call(&app, json!({"type": "getSummary"}));
    assert_eq!(summary["hasData"], false);
    assert_eq!(call(&app, json!({"type": "getStatistics"})), Value::Null);

    call(&app, json!({"type": "manualSync"}));
    let summary = call(&app, json!({"type": "getSummary"}));
    assert_eq!(summary["hasData"], true);
    assert_eq!(summary["totalBookmarks"], 4);
    assert_eq!(summary["lastSyncLabel"], "Just now");

    let statistics = call(&app, json!({"type": "getStatistics"}));
    assert_eq!(statistics["duplicateUrls"], 1);
    assert_eq!(statistics["duplicatePreviews"][0]["count"], 3);
}

// ─── Settings ───

#[test]
fn test_get_and_set_settings() {
    let (app, tmp) = setup();
    let settings = call(&app, json!({"type": "getSettings"}));
    assert_eq!(settings["top_domain_limit"], 20);

    let res = call(&app, json!({"type": "setSetting", "key": "top_domain_limit", "value": 1}));
    assert_eq!(res, json!({"ok": true}));
    assert!(tmp.path().join("settings.json").exists());

    call(&app, json!({"type": "manualSync"}));
    let storage = call(&app, json!({"type": "getStorage"}));
    assert_eq!(storage["topDomains"].as_array().unwrap().len(), 1);

    call(&app, json!({"type": "resetSettings"}));
    assert_eq!(call(&app, json!({"type": "getSettings"}))["top_domain_limit"], 20);
}

#[test]
fn test_set_setting_rejects_bad_input() {
    let (app, _tmp) = setup();
    let err = handle_request(&app, &json!({"type": "setSetting", "key": "nope", "value": 1})).unwrap_err();
    assert!(err.contains("Invalid settings key"));

    let err = handle_request(
        &app,
        &json!({"type": "setSetting", "key": "sync_interval_minutes", "value": 0}),
    )
    .unwrap_err();
    assert!(err.contains("Invalid settings value"));
    assert_eq!(call(&app, json!({"type": "getSettings"}))["sync_interval_minutes"], 60);
}

// ─── Failure isolation ───

#[test]
fn test_extreme_dates_do_not_break_later_commands() {
    let (app, _tmp) = setup();
    {
        let a = lock_app(&app);
        let store = a.bookmark_store();
        store.add_bookmark(None, "Ancient", "https://old.example", Some(i64::MIN)).unwrap();
        store.add_bookmark(None, "Future", "https://new.example", Some(i64::MAX)).unwrap();
    }
    assert_eq!(call(&app, json!({"type": "manualSync"}))["ok"], true);

    let res = call(&app, json!({"type": "queryBookmarks", "query": {"sort": "recent"}}));
    let items = res["items"].as_array().unwrap();
    assert_eq!(items.len(), 6);
    assert_eq!(items[0]["title"], "Future");
    let ancient = items.iter().find(|i| i["title"] == "Ancient").unwrap();
    assert!(ancient["ageDays"].as_i64().unwrap() > 0);

    call(&app, json!({"type": "exportHTML"}));
    call(&app, json!({"type": "exportCSV"}));
    assert_eq!(call(&app, json!({"type": "manualSync"}))["ok"], true);
    assert_eq!(call(&app, json!({"type": "getSummary"}))["totalBookmarks"], 6);
}

#[test]
fn test_commands_recover_after_a_panic_while_locked() {
    let (app, _tmp) = setup();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _guard = app.lock().unwrap();
        panic!("command failed midway");
    }));
    assert!(result.is_err());
    assert!(app.is_poisoned());

    assert_eq!(call(&app, json!({"type": "manualSync"}))["ok"], true);
    assert_eq!(call(&app, json!({"type": "getStats"}))["searchCount"], 0);
    assert!(!app.is_poisoned());
}
