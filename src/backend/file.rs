// Directory-of-files backend, one JSON file per key

use super::Backend;
use crate::error::{Result, StoreError};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const LOCK_SUFFIX: &str = "lock";

/// Stores each key as `{dir}/{key}.json`
///
/// A write goes to `{key}.json.tmp`, is synced, then renamed over the key
/// file, so the key file always holds a complete value. Writers to the same
/// key serialize on an exclusive lock of `{key}.json.lock`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open the directory, creating it if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        Self::validate_key(key)?;
        Ok(self.dir.join(format!("{}.{}", key, EXTENSION)))
    }

    fn sibling(path: &Path, suffix: &str) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }

    fn write_tmp(tmp_path: &Path, value: &str) -> Result<()> {
        let mut tmp = File::create(tmp_path)?;
        tmp.write_all(value.as_bytes())?;
        tmp.sync_all()?;
        Ok(())
    }

    fn validate_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::Storage("Key cannot be empty".to_string()));
        }
        if key.starts_with('.') || key.contains(['/', '\\']) {
            return Err(StoreError::Storage(format!("Key not usable as a file name: {}", key)));
        }
        Ok(())
    }
}

impl Backend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;

        let mut file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut content = String::new();
        file.read_to_string(&mut content)?;

        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = Self::sibling(&path, TMP_SUFFIX);

        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(Self::sibling(&path, LOCK_SUFFIX))?;
        lock.lock_exclusive()?;

        let written = Self::write_tmp(&tmp_path, &value)
            .and_then(|()| fs::rename(&tmp_path, &path).map_err(StoreError::from));
        if let Err(e) = written {
            warn!(file = ?path, error = %e, "Write failed, key file left unchanged");
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        debug!(file = ?path, bytes = value.len(), "Wrote key file");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(dir = ?self.dir, error = ?e, "Failed to read directory entry, skipping");
                    continue;
                }
            };
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some(EXTENSION) {
                continue;
            }

            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}
