// Repository module structure
pub mod errors;
mod in_memory;
mod report;
mod store;
#[cfg(feature = "sqlite")]
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::InMemoryStore;
pub use report::{ReportRepository, ReportRepositoryTrait, REPORTS_KEY};
pub use store::KeyValueStore;
#[cfg(feature = "sqlite")]
pub use storage::SqliteStore;

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use report::tests;
