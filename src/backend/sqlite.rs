// SQLite-backed key/value storage

use super::Backend;
use crate::error::Result;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

/// Single `kv` table in a SQLite database
pub struct SqliteBackend {
    db: Connection,
}

impl SqliteBackend {
    /// Open or create the database file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let db = Connection::open(path)?;
        let backend = Self { db };
        backend.create_schema()?;
        Ok(backend)
    }

    /// Database that lives only as long as the backend
    pub fn open_in_memory() -> Result<Self> {
        let backend = Self {
            db: Connection::open_in_memory()?,
        };
        backend.create_schema()?;
        Ok(backend)
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating kv schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }
}

impl Backend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.db.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let changed = self.db.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(changed > 0)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.db.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}
