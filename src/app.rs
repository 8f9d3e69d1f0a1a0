//! App Core for marksync.
//!
//! Central struct holding the database, the settings engine, the click
//! statistics and the presenter. Stores borrow the connection, so they are created on
//! demand through `bookmark_store()` and `kv_store()`.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use log::{debug, info, warn};
use serde_json::json;

use crate::database::connection::Database;
use crate::managers::bookmark_store::{BookmarkStore, SqliteBookmarkStore};
use crate::managers::click_stats::ClickStatsManager;
use crate::managers::kv_store::{KeyValueStore, SqliteKeyValueStore, INSTALL_KEY};
use crate::services::cleanup::{self, CleanupReport};
use crate::services::exporter::{self, ExportFormat};
use crate::services::presenter::{FsPresenter, Presenter};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::sync_engine::{self, SyncEngine};
use crate::types::errors::{ExportError, SettingsError, StoreError, SyncError};
use crate::types::settings::SyncSettings;
use crate::types::snapshot::{Snapshot, SyncReason};
use crate::types::stats::ClickStats;

/// Central application state shared by the command handler and the scheduler.
pub struct App {
    pub db: Database,
    pub settings_engine: SettingsEngine,
    stats: ClickStatsManager,
    presenter: Box<dyn Presenter + Send>,
}

/// Locks the shared App, recovering it if a previous holder panicked.
pub fn lock_app(app: &Mutex<App>) -> MutexGuard<'_, App> {
    app.lock().unwrap_or_else(|poisoned| {
        warn!("a command panicked while holding the app state, continuing");
        app.clear_poison();
        poisoned.into_inner()
    })
}

impl App {
    /// Opens the database named by the engine's settings and writes exports
    /// to its export directory.
    pub fn new(settings_engine: SettingsEngine) -> Result<Self, Box<dyn std::error::Error>> {
        let settings = settings_engine.get_settings();
        let db = Database::open(&settings.database_path)?;
        let presenter = Box::new(FsPresenter::new(&settings.export_dir));
        Ok(Self::with_parts(db, settings_engine, presenter)?)
    }

    /// Assembles an App from already-built parts and loads the click stats.
    pub fn with_parts(
        db: Database,
        settings_engine: SettingsEngine,
        presenter: Box<dyn Presenter + Send>,
    ) -> Result<Self, StoreError> {
        let stats = ClickStatsManager::load(&SqliteKeyValueStore::new(db.connection()))?;
        Ok(Self {
            db,
            settings_engine,
            stats,
            presenter,
        })
    }

    pub fn settings(&self) -> &SyncSettings {
        self.settings_engine.get_settings()
    }

    /// Updates one setting and saves the settings file.
    ///
    /// `top_domain_limit` and `notify_on_alarm` apply from the next sync;
    /// `sync_interval_minutes` applies after a restart.
    pub fn set_setting(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        self.settings_engine.set_value(key, value)?;
        info!("setting {} updated", key);
        Ok(())
    }

    pub fn reset_settings(&mut self) -> Result<(), SettingsError> {
        self.settings_engine.reset()
    }

    pub fn bookmark_store(&self) -> SqliteBookmarkStore<'_> {
        SqliteBookmarkStore::new(self.db.connection())
    }

    pub fn kv_store(&self) -> SqliteKeyValueStore<'_> {
        SqliteKeyValueStore::new(self.db.connection())
    }

    pub fn stats(&self) -> &ClickStats {
        self.stats.stats()
    }

    pub fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }

    /// Takes a snapshot now and propagates any failure.
    pub fn sync(&mut self, reason: SyncReason) -> Result<Snapshot, SyncError> {
        let bookmarks = SqliteBookmarkStore::new(self.db.connection());
        let kv = SqliteKeyValueStore::new(self.db.connection());
        let engine = SyncEngine::new(
            &bookmarks,
            &kv,
            self.presenter.as_ref(),
            self.settings_engine.get_settings(),
        );
        engine.sync(reason, &mut self.stats)
    }

    /// Takes a snapshot now; a failure is logged and the previous snapshot kept.
    pub fn run_sync(&mut self, reason: SyncReason) -> Option<Snapshot> {
        let bookmarks = SqliteBookmarkStore::new(self.db.connection());
        let kv = SqliteKeyValueStore::new(self.db.connection());
        let engine = SyncEngine::new(
            &bookmarks,
            &kv,
            self.presenter.as_ref(),
            self.settings_engine.get_settings(),
        );
        engine.run_sync(reason, &mut self.stats)
    }

    /// Runs the install sync the first time the service starts against a database.
    ///
    /// Returns whether the install sync was attempted. The install marker is
    /// written even when that sync fails; later ticks take over.
    pub fn startup(&mut self) -> Result<bool, StoreError> {
        if self.kv_store().get(INSTALL_KEY)?.is_some() {
            return Ok(false);
        }
        info!("first start, taking install snapshot");
        self.run_sync(SyncReason::Install);
        self.kv_store()
            .set(INSTALL_KEY, &json!(Utc::now().timestamp_millis()))?;
        Ok(true)
    }

    pub fn delete_duplicates(&mut self, keep_first: bool) -> Result<CleanupReport, StoreError> {
        let bookmarks = SqliteBookmarkStore::new(self.db.connection());
        let kv = SqliteKeyValueStore::new(self.db.connection());
        let engine = SyncEngine::new(
            &bookmarks,
            &kv,
            self.presenter.as_ref(),
            self.settings_engine.get_settings(),
        );
        cleanup::delete_duplicates(&engine, &mut self.stats, keep_first)
    }

    pub fn load_snapshot(&self) -> Result<Option<Snapshot>, StoreError> {
        sync_engine::load_snapshot(&self.kv_store())
    }

    pub fn record_visit(&mut self, url: &str) -> Result<(), StoreError> {
        let kv = SqliteKeyValueStore::new(self.db.connection());
        self.stats.record_visit(&kv, url)
    }

    pub fn increment_search(&mut self) -> Result<(), StoreError> {
        let kv = SqliteKeyValueStore::new(self.db.connection());
        self.stats.increment_search(&kv)
    }

    /// Renames a bookmark and refreshes the snapshot. Returns whether the
    /// title changed; an identical title leaves the store and snapshot alone.
    pub fn rename_bookmark(&mut self, id: &str, title: &str) -> Result<bool, StoreError> {
        let store = self.bookmark_store();
        let node = store
            .get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if node.title == title {
            debug!("rename of {} skipped, title unchanged", id);
            return Ok(false);
        }
        store.update_title(id, title)?;
        self.run_sync(SyncReason::Manual);
        Ok(true)
    }

    /// Removes a bookmark and refreshes the snapshot.
    pub fn remove_bookmark(&mut self, id: &str) -> Result<(), StoreError> {
        self.bookmark_store().remove(id)?;
        self.run_sync(SyncReason::Manual);
        Ok(())
    }

    /// Exports the last snapshot. Returns the download id.
    pub fn export(&self, format: ExportFormat) -> Result<String, ExportError> {
        let snapshot = self.load_snapshot().unwrap_or_else(|e| {
            warn!("exporting without snapshot: {}", e);
            None
        });
        exporter::export(
            format,
            snapshot.as_ref(),
            self.presenter.as_ref(),
            Utc::now().timestamp_millis(),
        )
    }
}
