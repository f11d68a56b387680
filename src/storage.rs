use chrono::Local;
use log::{debug, error, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::config::GameSettings;
use crate::game::{GameState, GameStats};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable string key-value storage backing the persisted records
pub trait KeyValueStore: std::fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Remove every key in `keys` as a single logical operation.
    fn remove(&mut self, keys: &[&str]) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        (**self).remove(keys)
    }
}

/// SQLite-backed store, one row per key
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`, creating parent directories as needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        Ok(SqliteStore { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        for key in keys {
            tx.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// Volatile store for tests and for running without a writable data directory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        for key in keys {
            self.entries.remove(*key);
        }
        Ok(())
    }
}

/// A JSON document stored under a fixed key, with a default used on miss
pub trait Record: Serialize + DeserializeOwned + Default {
    const KEY: &'static str;
}

impl Record for GameState {
    const KEY: &'static str = "gameState";
}

impl Record for GameSettings {
    const KEY: &'static str = "gameSettings";
}

impl Record for GameStats {
    const KEY: &'static str = "gameStats";
}

pub const RECORD_KEYS: [&str; 3] = [GameState::KEY, GameSettings::KEY, GameStats::KEY];

/// Loads and saves records over a key-value store.
///
/// Nothing here returns an error: failed loads fall back to the record's
/// default and failed writes are logged and dropped.
#[derive(Debug)]
pub struct Storage<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load<R: Record>(&self) -> R {
        match self.store.get(R::KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<R>(&raw) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Discarding unreadable {} record: {}", R::KEY, e);
                    R::default()
                }
            },
            Ok(None) => {
                debug!("No stored {}, using default", R::KEY);
                R::default()
            }
            Err(e) => {
                error!("Error loading {}: {}", R::KEY, e);
                R::default()
            }
        }
    }

    pub fn save<R: Record>(&mut self, record: &R) {
        let raw = match serde_json::to_string(record) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error serializing {}: {}", R::KEY, e);
                return;
            }
        };

        if let Err(e) = self.store.set(R::KEY, &raw) {
            error!("Error saving {}: {}", R::KEY, e);
        }
    }

    pub fn clear_all(&mut self) {
        if let Err(e) = self.store.remove(&RECORD_KEYS) {
            error!("Error clearing all data: {}", e);
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
