use async_trait::async_trait;

use super::errors::RepositoryError;

/// Minimal key-value storage contract used for report persistence.
///
/// Values are opaque strings (the report collection is stored as one JSON
/// array under a single key). Writers follow last-writer-wins; there is no
/// locking across read-modify-write cycles.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Prepare the backend (create files, run migrations). Idempotent.
    async fn open(&self) -> Result<(), RepositoryError>;

    /// Read the value stored under `key`, if any
    async fn read(&self, key: &str) -> Result<Option<String>, RepositoryError>;

    /// Replace the value stored under `key` atomically
    async fn write(&self, key: &str, value: &str) -> Result<(), RepositoryError>;

    /// Release backend resources. Reads and writes fail until reopened.
    async fn close(&self) -> Result<(), RepositoryError>;

    /// Short backend name for logs and health checks
    fn backend(&self) -> &'static str;
}
