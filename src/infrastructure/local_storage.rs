//! Local SQLite storage backing the key-value store.
//!
//! A single `kv` table holds every key; each write is one
//! `INSERT OR REPLACE`, which SQLite applies atomically.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{AppError, Result};
use crate::infrastructure::kv_store::KeyValueStore;

/// Summary of a stored key, for status output.
#[derive(Debug, Clone)]
pub struct StoredKey {
    pub key: String,
    pub size_bytes: usize,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Local storage repository using SQLite.
pub struct LocalStorage {
    conn: Connection,
}

impl LocalStorage {
    /// Opens or creates the local storage database.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or schema creation fails.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create storage directory", e))?;
        }

        let conn = Connection::open(path).map_err(AppError::database)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(AppError::database)?;

        let storage = Self { conn };
        storage.init_schema()?;

        tracing::debug!(path = %path.display(), "Opened local storage");

        Ok(storage)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    /// Returns error if schema creation fails.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(AppError::database)?;
        let storage = Self { conn };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
            )
            .map_err(AppError::database)?;

        Ok(())
    }

    /// List stored keys with their value sizes.
    ///
    /// # Errors
    /// Returns error if the query fails.
    pub fn list_keys(&self) -> Result<Vec<StoredKey>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, length(CAST(value AS BLOB)), updated_at FROM kv ORDER BY key")
            .map_err(AppError::database)?;

        let rows = stmt
            .query_map([], |row| {
                let updated_str: Option<String> = row.get(2)?;
                let updated_at = updated_str
                    .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                    .map(|dt| dt.with_timezone(&Utc));

                Ok(StoredKey {
                    key: row.get(0)?,
                    size_bytes: usize::try_from(row.get::<_, i64>(1)?).unwrap_or(0),
                    updated_at,
                })
            })
            .map_err(AppError::database)?;

        let mut keys = Vec::new();
        for row in rows {
            match row {
                Ok(entry) => keys.push(entry),
                Err(e) => tracing::warn!("Failed to read row: {}", e),
            }
        }

        Ok(keys)
    }

    /// Get total storage size in bytes.
    ///
    /// # Errors
    /// Returns error if the database file cannot be inspected.
    pub fn get_storage_size(&self) -> Result<u64> {
        let path = match self.conn.path() {
            Some(p) if !p.is_empty() => Path::new(p),
            _ => return Ok(0),
        };
        let metadata = std::fs::metadata(path)
            .map_err(|e| AppError::io("Failed to get storage size", e))?;
        Ok(metadata.len())
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(AppError::database)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .map_err(AppError::database)?;

        tracing::trace!(key, bytes = value.len(), "Stored item");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .map_err(AppError::database)?;

        tracing::trace!(key, "Removed item");
        Ok(())
    }
}
