//! Store configuration for the LabInsight application
//!
//! Reports are persisted through a key-value store. Two backends exist:
//! - SQLite (default, file-backed)
//! - In-memory (tests and fallback when the SQLite file cannot be opened)

use std::env;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::repository::{InMemoryStore, KeyValueStore};
#[cfg(feature = "sqlite")]
use crate::repository::SqliteStore;

/// Supported store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// Process-local map, lost on restart
    Memory,
    /// SQLite database (file-based)
    #[cfg(feature = "sqlite")]
    Sqlite,
}

impl FromStr for StoreType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StoreType::Memory),
            #[cfg(feature = "sqlite")]
            "sqlite" => Ok(StoreType::Sqlite),
            _ => Err(DatabaseError::UnsupportedStoreType(s.to_string())),
        }
    }
}

/// SQLite connection pool used by the file-backed store
#[cfg(feature = "sqlite")]
pub type SqlitePool = r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>;

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    #[cfg(feature = "sqlite")]
    SqliteError(#[from] rusqlite::Error),

    /// SQLite connection pool error
    #[error("SQLite connection pool error: {0}")]
    #[cfg(feature = "sqlite")]
    SqlitePoolError(#[from] r2d2::Error),

    /// Filesystem error while preparing the database location
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported store type
    #[error("Unsupported store type: {0}")]
    UnsupportedStoreType(String),

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store backend (sqlite, memory)
    pub store_type: StoreType,
    /// Path to SQLite database file
    pub sqlite_path: String,
    /// Maximum number of pooled SQLite connections
    pub pool_size: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

/// Default location of the SQLite database file
pub const DEFAULT_SQLITE_PATH: &str = "./data/lab_insight.db";

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            #[cfg(feature = "sqlite")]
            store_type: StoreType::Sqlite,
            #[cfg(not(feature = "sqlite"))]
            store_type: StoreType::Memory,
            sqlite_path: DEFAULT_SQLITE_PATH.to_string(),
            pool_size: 4,
            timeout_seconds: 30,
        }
    }
}

impl StoreConfig {
    /// Configuration for a process-local store
    pub fn in_memory() -> Self {
        Self {
            store_type: StoreType::Memory,
            ..Self::default()
        }
    }

    /// Create a new store configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let defaults = Self::default();

        let store_type = match env::var("STORE_TYPE") {
            Ok(value) => value.parse::<StoreType>()?,
            Err(_) => defaults.store_type,
        };

        let sqlite_path = env::var("STORE_SQLITE_PATH").unwrap_or_else(|_| {
            info!("No STORE_SQLITE_PATH provided, will use default path: {}", DEFAULT_SQLITE_PATH);
            defaults.sqlite_path.clone()
        });

        let pool_size = env::var("STORE_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(defaults.pool_size);

        let timeout_seconds = env::var("STORE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_seconds);

        info!("Store configuration: type={:?}, pool_size={}, timeout={}s",
            store_type, pool_size, timeout_seconds);

        Ok(StoreConfig {
            store_type,
            sqlite_path,
            pool_size,
            timeout_seconds,
        })
    }
}

/// Build the SQLite connection pool and bring the schema up to date
#[cfg(feature = "sqlite")]
pub fn create_sqlite_pool(config: &StoreConfig) -> Result<SqlitePool, DatabaseError> {
    use rusqlite::OpenFlags;
    use std::fs;
    use std::path::Path;

    info!("Initializing SQLite database at: {}", config.sqlite_path);

    if let Some(parent) = Path::new(&config.sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            fs::create_dir_all(parent)?;
        }
    }

    let manager = r2d2_sqlite::SqliteConnectionManager::file(&config.sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    let pool = r2d2::Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    let conn = pool.get()?;
    crate::database::migrations::run_sqlite_migrations(&conn)
        .map_err(DatabaseError::MigrationError)?;

    info!("SQLite connection pool created successfully");
    Ok(pool)
}

/// Create and open the store described by the configuration.
///
/// A SQLite store that cannot be opened degrades to the in-memory store so
/// callers always get a usable backend.
pub async fn create_store(config: &StoreConfig) -> Arc<dyn KeyValueStore> {
    match config.store_type {
        StoreType::Memory => {
            info!("Using in-memory report store");
            Arc::new(InMemoryStore::new())
        }
        #[cfg(feature = "sqlite")]
        StoreType::Sqlite => {
            let store = SqliteStore::new(config.clone());
            match store.open().await {
                Ok(()) => Arc::new(store),
                Err(e) => {
                    warn!("Failed to open SQLite store ({}), falling back to in-memory store", e);
                    Arc::new(InMemoryStore::new())
                }
            }
        }
    }
}
