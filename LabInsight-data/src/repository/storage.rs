use std::sync::RwLock;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::OptionalExtension;
use tracing::{debug, info};

use crate::database::{create_sqlite_pool, SqlitePool, StoreConfig};
use super::errors::RepositoryError;
use super::store::KeyValueStore;

/// SQLite-backed key-value store
///
/// Each key is one row in `kv_store`; writes are single-statement upserts so
/// a collection is replaced atomically.
#[derive(Debug)]
pub struct SqliteStore {
    config: StoreConfig,
    pool: RwLock<Option<SqlitePool>>,
}

impl SqliteStore {
    /// Create a store for the configured database file. Call `open` before use.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            pool: RwLock::new(None),
        }
    }

    fn pool(&self) -> Result<SqlitePool, RepositoryError> {
        let guard = self.pool.read()?;
        guard
            .clone()
            .ok_or_else(|| RepositoryError::StoreClosed(self.config.sqlite_path.clone()))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn open(&self) -> Result<(), RepositoryError> {
        let mut guard = self.pool.write()?;
        if guard.is_none() {
            let pool = create_sqlite_pool(&self.config)?;
            *guard = Some(pool);
            info!("Opened SQLite store at {}", self.config.sqlite_path);
        }
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        debug!("Reading key from SQLite store: {}", key);
        let pool = self.pool()?;
        let conn = pool.get()?;

        let value = conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;

        Ok(value)
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        debug!("Writing key to SQLite store: {} ({} bytes)", key, value.len());
        let pool = self.pool()?;
        let conn = pool.get()?;

        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            (key, value, Utc::now().to_rfc3339()),
        )?;

        Ok(())
    }

    async fn close(&self) -> Result<(), RepositoryError> {
        let mut guard = self.pool.write()?;
        if guard.take().is_some() {
            info!("Closed SQLite store at {}", self.config.sqlite_path);
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(dir: &tempfile::TempDir) -> StoreConfig {
        StoreConfig {
            sqlite_path: dir.path().join("kv.db").to_string_lossy().to_string(),
            ..StoreConfig::default()
        }
    }

    #[tokio::test]
    async fn test_write_then_read_survives_reopen() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        let store = SqliteStore::new(temp_config(&tmp));
        store.open().await.unwrap();

        store.write("health_reports", "[1]").await.unwrap();
        store.write("health_reports", "[2,1]").await.unwrap();
        store.close().await.unwrap();

        let reopened = SqliteStore::new(temp_config(&tmp));
        reopened.open().await.unwrap();
        assert_eq!(reopened.read("health_reports").await.unwrap().as_deref(), Some("[2,1]"));
        assert_eq!(reopened.read("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_use_before_open_fails() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        let store = SqliteStore::new(temp_config(&tmp));

        let err = store.read("health_reports").await.unwrap_err();
        assert!(matches!(err, RepositoryError::StoreClosed(_)));
    }
}
