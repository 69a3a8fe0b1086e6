pub mod catalog;
pub mod classifier;
pub mod export;
pub mod generator;
pub mod llm;
pub mod profiles;
pub mod recommendations;
pub mod report;
pub mod summary;
pub mod text_extractor;

// Domain services
// Analysis is split into small pure stages; `report` wires them to storage and
// the optional insight provider.

// Re-export service traits and factory functions
pub use report::{create_default_report_service, ReportService, ReportServiceError, ReportServiceTrait};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use report::create_mock_report_service;
