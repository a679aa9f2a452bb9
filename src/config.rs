// Store configuration loaded from YAML

use crate::backend::{Backend, FileBackend, MemoryBackend, SqliteBackend};
use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_STORE_NAME: &str = "cloudkart_db";
pub const FORMAT_VERSION: &str = "1.0";
pub const DEFAULT_SESSION_KEY: &str = "cloudkart_current_user";
pub const DEFAULT_TABLES: [&str; 7] = [
    "products",
    "users",
    "orders",
    "categories",
    "reviews",
    "wishlist",
    "cart",
];

/// Store configuration
///
/// ```yaml
/// store_name: cloudkart_db        # prefix of every table key
/// version: "1.0"
/// session_key: cloudkart_current_user
/// tables: [products, users, orders, categories, reviews, wishlist, cart]
/// backend:
///   kind: sqlite                  # memory, sqlite or file
///   path: ~/.local/share/kartstore/kartstore.db
/// ```
///
/// Every key is optional; a missing file yields the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix of every table key: `{store_name}_{table}`
    pub store_name: String,

    /// Format version, informational only
    pub version: String,

    /// Tables created by `ensure_tables` and covered by stats, export and clear
    pub tables: Vec<String>,

    /// Key holding the logged-in user
    pub session_key: String,

    pub backend: BackendConfig,
}

/// Which substrate the store writes through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    Memory {
        #[serde(default)]
        quota: Option<usize>,
    },
    Sqlite {
        path: PathBuf,
    },
    File {
        dir: PathBuf,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Sqlite {
            path: default_data_dir().join("kartstore.db"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_name: DEFAULT_STORE_NAME.to_string(),
            version: FORMAT_VERSION.to_string(),
            tables: DEFAULT_TABLES.iter().map(|t| t.to_string()).collect(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            backend: BackendConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`
    ///
    /// Returns the default configuration if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        let path = expand_path(path);

        if !path.exists() {
            debug!(path = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| StoreError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let config = Self::from_yaml(&contents)?;
        info!(path = ?path, store = %config.store_name, "Loaded config");
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let mut config: Config =
            serde_yaml::from_str(contents).map_err(|e| StoreError::Config(format!("Invalid config: {}", e)))?;
        config.backend = config.backend.expanded();
        Ok(config)
    }

    /// Construct the configured backend
    pub fn open_backend(&self) -> Result<Box<dyn Backend>> {
        let backend: Box<dyn Backend> = match &self.backend {
            BackendConfig::Memory { quota: Some(quota) } => Box::new(MemoryBackend::with_quota(*quota)),
            BackendConfig::Memory { quota: None } => Box::new(MemoryBackend::new()),
            BackendConfig::Sqlite { path } => Box::new(SqliteBackend::open(path)?),
            BackendConfig::File { dir } => Box::new(FileBackend::open(dir)?),
        };
        Ok(backend)
    }
}

impl BackendConfig {
    fn expanded(self) -> Self {
        match self {
            BackendConfig::Sqlite { path } => BackendConfig::Sqlite {
                path: expand_path(&path),
            },
            BackendConfig::File { dir } => BackendConfig::File { dir: expand_path(&dir) },
            memory => memory,
        }
    }
}

/// Replace a leading `~/` with the home directory
pub fn expand_path(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    }
    path.to_path_buf()
}

/// Per-user data directory, falling back to the working directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kartstore")
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kartstore")
        .join("config.yml")
}
