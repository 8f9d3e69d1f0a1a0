//! Key-value store for marksync.
//!
//! The snapshot, the click statistics and the install marker live here as
//! JSON values under fixed keys.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::types::errors::StoreError;

/// Key holding the latest [`Snapshot`](crate::types::snapshot::Snapshot).
pub const SNAPSHOT_KEY: &str = "auto_bookmark_sync_v1";
/// Key holding the [`ClickStats`](crate::types::stats::ClickStats).
pub const STATS_KEY: &str = "bookmark_stats";
/// Key written once the install sync has run.
pub const INSTALL_KEY: &str = "installed_at";

/// Persistent storage of JSON values under string keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError>;
}

/// Reads `key` and decodes it into `T`.
pub fn load_json<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match kv.get(key)? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StoreError::SerializationError(format!("{}: {}", key, e))),
        None => Ok(None),
    }
}

/// Encodes `value` and writes it under `key`.
pub fn save_json<T: Serialize>(kv: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError> {
    let encoded =
        serde_json::to_value(value).map_err(|e| StoreError::SerializationError(e.to_string()))?;
    kv.set(key, &encoded)
}

/// Key-value store backed by the `kv_store` table.
pub struct SqliteKeyValueStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteKeyValueStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> KeyValueStore for SqliteKeyValueStore<'a> {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StoreError::SerializationError(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let text =
            serde_json::to_string(value).map_err(|e| StoreError::SerializationError(e.to_string()))?;
        let now = chrono::Utc::now().timestamp_millis();
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, text, now],
        )?;
        Ok(())
    }
}
