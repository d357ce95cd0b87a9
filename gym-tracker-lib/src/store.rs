//src/store.rs
//! Key-value persistence behind the tracker.
//!
//! Every record is stored whole under one key; callers merge in memory and
//! write the complete value back.
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::config::APP_DIR;

pub const SESSION_KEY: &str = "active_session";
pub const HISTORY_KEY: &str = "workout_history";
pub const DEFAULTS_KEY: &str = "exercise_defaults";

const DB_FILE_NAME: &str = "gym-tracker.sqlite";
const DATA_ENV_VAR: &str = "GYM_TRACKER_DATA_DIR";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file")]
    Io(#[from] std::io::Error),
    #[error("Database query failed for key '{0}': {1}")]
    QueryFailed(String, rusqlite::Error),
    #[error("Database write failed for key '{0}': {1}")]
    WriteFailed(String, rusqlite::Error),
    #[error("Failed to encode record for key '{0}': {1}")]
    Encode(String, serde_json::Error),
}

/// Durable byte storage addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    /// Replaces the whole value stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Reads and decodes a JSON record. A record that fails to decode is
/// reported and treated as absent.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_slice(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, error = %e, "discarding malformed record");
            Ok(None)
        }
    }
}

/// Encodes a record as JSON and writes it under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_vec(value).map_err(|e| StoreError::Encode(key.to_string(), e))?;
    store.set(key, &raw)
}

/// Gets the path to the SQLite database file within the app's data directory.
/// Exposed at crate root as `get_db_path_util`
pub fn get_db_path() -> Result<PathBuf, StoreError> {
    let app_dir = match std::env::var(DATA_ENV_VAR).ok() {
        Some(dir) => PathBuf::from(dir),
        None => dirs::data_dir().ok_or(StoreError::DataDir)?.join(APP_DIR),
    };
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(DB_FILE_NAME))
}

/// SQLite-backed store holding every record in a single table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (and initializes if needed) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(StoreError::Connection)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Connection)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        init_db(&conn)?;
        Ok(Self { conn })
    }
}

/// Creates the key-value table if it doesn't exist.
pub fn init_db(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY NOT NULL,
            value BLOB NOT NULL
        )",
        [],
    )
    .map_err(StoreError::Connection)?;
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::QueryFailed(key.to_string(), e))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|e| StoreError::WriteFailed(key.to_string(), e))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(|e| StoreError::WriteFailed(key.to_string(), e))?;
        Ok(())
    }
}

/// Volatile store, used by tests and for embedding without a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
