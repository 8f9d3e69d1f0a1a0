//! Unit tests for the settings engine.

use std::fs;

use serde_json::json;
use tempfile::TempDir;

use marksync::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use marksync::types::errors::SettingsError;
use marksync::types::settings::SyncSettings;

fn engine_in(dir: &TempDir) -> SettingsEngine {
    let path = dir.path().join("settings.json").to_string_lossy().to_string();
    SettingsEngine::new(Some(path))
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    engine.load().unwrap();
    engine.set_value("sync_interval_minutes", json!(15)).unwrap();
    engine.set_value("export_dir", json!("/tmp/exports")).unwrap();

    let mut engine2 = engine_in(&dir);
    let loaded = engine2.load().unwrap();
    assert_eq!(loaded.sync_interval_minutes, 15);
    assert_eq!(loaded.export_dir, "/tmp/exports");
}

#[test]
fn test_get_config_path() {
    let engine = SettingsEngine::new(Some("/tmp/test_settings.json".to_string()));
    assert_eq!(engine.get_config_path(), "/tmp/test_settings.json");
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    engine.load().unwrap();
    engine.set_value("notify_on_alarm", json!(false)).unwrap();
    assert!(!engine.get_settings().notify_on_alarm);

    engine.reset().unwrap();
    assert!(engine.get_settings().notify_on_alarm);
    assert!(engine_in(&dir).load().unwrap().notify_on_alarm);
}

#[test]
fn test_set_value_unknown_key() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    engine.load().unwrap();
    assert!(matches!(
        engine.set_value("theme", json!("dark")),
        Err(SettingsError::InvalidKey(_))
    ));
    assert!(matches!(engine.set_value("", json!(1)), Err(SettingsError::InvalidKey(_))));
}

#[test]
fn test_set_value_wrong_type() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    engine.load().unwrap();
    let result = engine.set_value("top_domain_limit", json!("many"));
    assert!(matches!(result, Err(SettingsError::InvalidValue(_))));
    assert_eq!(engine.get_settings().top_domain_limit, 20);
}

#[test]
fn test_load_malformed_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("settings.json"), "{ invalid json }").unwrap();
    let mut engine = engine_in(&dir);
    assert!(matches!(engine.load(), Err(SettingsError::SerializationError(_))));
}

#[test]
fn test_default_settings_values() {
    let defaults = SyncSettings::default();
    assert_eq!(defaults.sync_interval_minutes, 60);
    assert_eq!(defaults.top_domain_limit, 20);
    assert!(defaults.notify_on_alarm);
    assert!(defaults.export_dir.ends_with("exports"));
    assert!(defaults.database_path.ends_with("marksync.db"));
}
