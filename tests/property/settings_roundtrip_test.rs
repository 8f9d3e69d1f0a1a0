//! Property-based tests for settings persistence.
//!
//! Any valid settings written through `set_value` load back unchanged from disk.

use marksync::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use proptest::prelude::*;
use serde_json::json;
use tempfile::TempDir;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn settings_roundtrip(
        interval in 1u64..10_000,
        limit in 0usize..100,
        notify in any::<bool>(),
        export_dir in "/[a-z]{1,8}(/[a-z]{1,8}){0,3}",
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json").to_string_lossy().to_string();

        let mut engine = SettingsEngine::new(Some(path.clone()));
        engine.load().unwrap();
        engine.set_value("sync_interval_minutes", json!(interval)).unwrap();
        engine.set_value("top_domain_limit", json!(limit)).unwrap();
        engine.set_value("notify_on_alarm", json!(notify)).unwrap();
        engine.set_value("export_dir", json!(export_dir)).unwrap();

        let mut reloaded = SettingsEngine::new(Some(path));
        let loaded = reloaded.load().unwrap();
        prop_assert_eq!(&loaded, engine.get_settings());
        prop_assert_eq!(loaded.sync_interval_minutes, interval);
        prop_assert_eq!(loaded.top_domain_limit, limit);
        prop_assert_eq!(loaded.notify_on_alarm, notify);
        prop_assert_eq!(loaded.export_dir, export_dir);
    }
}
