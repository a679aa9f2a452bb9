// Persistent string-keyed storage the store writes through

mod file;
mod memory;
mod sqlite;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use crate::error::Result;

/// Key/value substrate holding one JSON string per key
///
/// Implementations only move strings around. Encoding, table layout and
/// key naming belong to the store.
pub trait Backend {
    /// Value stored under `key`, or `None` if the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: String) -> Result<()>;

    /// Remove `key`. Returns true if it existed.
    fn remove(&mut self, key: &str) -> Result<bool>;

    /// All keys currently stored, sorted
    fn keys(&self) -> Result<Vec<String>>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}
