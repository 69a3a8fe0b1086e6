use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::models::report::StoredReport;
use super::errors::RepositoryError;
use super::in_memory::InMemoryStore;
use super::store::KeyValueStore;

/// The single key holding the serialized report collection
pub const REPORTS_KEY: &str = "health_reports";

/// Repository trait for analysed reports
#[async_trait]
pub trait ReportRepositoryTrait: Send + Sync {
    /// Prepend a report to the collection and persist the whole collection
    async fn save(&self, report: StoredReport) -> Result<(), RepositoryError>;

    /// All reports, newest first. Missing or corrupt data yields an empty list.
    async fn list(&self) -> Vec<StoredReport>;

    /// First report with the given id
    async fn get_by_id(&self, id: &str) -> Option<StoredReport>;

    /// Remove a report by id. Returns whether anything was removed.
    async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;
}

/// Report repository over a key-value store
#[derive(Debug, Clone)]
pub struct ReportRepository {
    store: Arc<dyn KeyValueStore>,
}

impl Default for ReportRepository {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl ReportRepository {
    /// Create a repository over an opened store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Create a repository backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Strict load: surfaces read and decode failures
    async fn load(&self) -> Result<Vec<StoredReport>, RepositoryError> {
        match self.store.read(REPORTS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Load for a read-modify-write cycle. A corrupt payload starts a fresh
    /// collection; any other failure aborts so the stored data is never overwritten.
    async fn load_for_update(&self) -> Result<Vec<StoredReport>, RepositoryError> {
        match self.load().await {
            Err(RepositoryError::Serialization(e)) => {
                warn!("Discarding unreadable report collection: {}", e);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    async fn persist(&self, reports: &[StoredReport]) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(reports)?;
        self.store.write(REPORTS_KEY, &raw).await
    }
}

#[async_trait]
impl ReportRepositoryTrait for ReportRepository {
    async fn save(&self, report: StoredReport) -> Result<(), RepositoryError> {
        let mut reports = self.load_for_update().await?;

        if reports.iter().any(|r| r.id == report.id) {
            return Err(RepositoryError::Validation(format!(
                "Report with id {} already exists",
                report.id
            )));
        }

        debug!("Saving report {} ({} already stored)", report.id, reports.len());
        reports.insert(0, report);
        self.persist(&reports).await
    }

    async fn list(&self) -> Vec<StoredReport> {
        match self.load().await {
            Ok(reports) => reports,
            Err(e) => {
                error!("Error getting reports from {} store: {}", self.store.backend(), e);
                Vec::new()
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Option<StoredReport> {
        self.list().await.into_iter().find(|r| r.id == id)
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let reports = self.load_for_update().await?;
        let before = reports.len();
        let remaining: Vec<StoredReport> = reports.into_iter().filter(|r| r.id != id).collect();

        if remaining.len() == before {
            warn!("Delete requested for unknown report {}", id);
            return Ok(false);
        }

        self.persist(&remaining).await?;
        Ok(true)
    }
}

/// Mock report repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Repository that keeps reports in a vector and can be told to fail writes
    #[derive(Default)]
    pub struct MockReportRepository {
        reports: Mutex<Vec<StoredReport>>,
        fail_writes: bool,
    }

    impl MockReportRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository with predefined reports (newest first)
        pub fn with_reports(reports: Vec<StoredReport>) -> Self {
            Self {
                reports: Mutex::new(reports),
                fail_writes: false,
            }
        }

        /// Make every save and delete fail
        pub fn with_write_failure(mut self) -> Self {
            self.fail_writes = true;
            self
        }
    }

    #[async_trait]
    impl ReportRepositoryTrait for MockReportRepository {
        async fn save(&self, report: StoredReport) -> Result<(), RepositoryError> {
            if self.fail_writes {
                return Err(RepositoryError::MutexLock("mock is configured to fail writes".to_string()));
            }
            let mut reports = self.reports.lock()?;
            reports.insert(0, report);
            Ok(())
        }

        async fn list(&self) -> Vec<StoredReport> {
            self.reports.lock().map(|r| r.clone()).unwrap_or_default()
        }

        async fn get_by_id(&self, id: &str) -> Option<StoredReport> {
            self.list().await.into_iter().find(|r| r.id == id)
        }

        async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
            if self.fail_writes {
                return Err(RepositoryError::MutexLock("mock is configured to fail writes".to_string()));
            }
            let mut reports = self.reports.lock()?;
            let before = reports.len();
            reports.retain(|r| r.id != id);
            Ok(reports.len() != before)
        }
    }
}
