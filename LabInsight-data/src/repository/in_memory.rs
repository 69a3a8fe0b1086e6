use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;

use super::errors::RepositoryError;
use super::store::KeyValueStore;

/// In-memory key-value store
///
/// Clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    closed: Arc<AtomicBool>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    fn ensure_open(&self) -> Result<(), RepositoryError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(RepositoryError::StoreClosed("memory".to_string()))
        } else {
            Ok(())
        }
    }

    /// Create a store pre-populated with a raw value, useful for seeding
    /// corrupt or legacy payloads in tests
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn open(&self) -> Result<(), RepositoryError> {
        self.closed.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        self.ensure_open()?;
        let entries = self.entries.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.ensure_open()?;
        let mut entries = self.entries.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<(), RepositoryError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
