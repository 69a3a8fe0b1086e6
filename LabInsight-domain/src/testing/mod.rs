// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use lab_insight_data::repository::tests::MockReportRepository;

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::MAX_RECOMMENDATIONS;
use crate::entities::profile::CategoryProfile;
use crate::entities::report::{Category, Report, UploadedFile};
use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth, SystemStatus};
use crate::services::classifier::classify_upload;
use crate::services::export::{export_report, ExportFormat, ExportedReport};
use crate::services::generator::ReportExtractor;
use crate::services::profiles::category_profile;
use crate::services::recommendations::{derive_dietary_plan, derive_lifestyle};
use crate::services::report::{ReportServiceError, ReportServiceTrait};
use crate::services::summary::synthesize;
use crate::services::text_extractor::TextPatternExtractor;

/// Seed used for every mock analysis so fixtures stay stable
const MOCK_SEED: u64 = 42;

/// Mock implementation of the ReportServiceTrait for testing
///
/// Analyses run the real pipeline with a fixed seed and no insight provider;
/// reports live in memory, newest first.
pub struct MockReportService {
    reports: RwLock<Vec<Report>>,
    should_fail_validation: bool,
    should_fail_storage: bool,
}

impl Default for MockReportService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockReportService {
    /// Create a new mock report service
    pub fn new() -> Self {
        Self {
            reports: RwLock::new(Vec::new()),
            should_fail_validation: false,
            should_fail_storage: false,
        }
    }

    /// Configure the mock to reject every upload
    pub fn with_validation_failure(mut self) -> Self {
        self.should_fail_validation = true;
        self
    }

    /// Configure the mock to fail deletes as a broken store would
    pub fn with_storage_failure(mut self) -> Self {
        self.should_fail_storage = true;
        self
    }

    /// Add a pre-defined report to the mock
    pub fn with_report(self, report: Report) -> Self {
        self.write().insert(0, report);
        self
    }

    /// Add multiple pre-defined reports, given newest first
    pub fn with_reports(self, reports: Vec<Report>) -> Self {
        {
            let mut stored = self.write();
            for report in reports.into_iter().rev() {
                stored.insert(0, report);
            }
        }
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Report>> {
        self.reports.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Report>> {
        self.reports.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Build a report the way the real service does, with a fixed seed
pub fn build_mock_report(file: UploadedFile, id: String) -> Report {
    let mut rng = StdRng::seed_from_u64(MOCK_SEED);
    let category = classify_upload(&file);
    let metrics = TextPatternExtractor::default().extract(&file, category, &mut rng);

    Report {
        id,
        file_name: file.name.clone(),
        file_type: file.file_type.clone(),
        upload_date: Utc::now(),
        category,
        summary: synthesize(&metrics, &file.name, &file.file_type),
        recommendations: derive_lifestyle(category, &file.file_type, MAX_RECOMMENDATIONS),
        dietary_plan: Some(derive_dietary_plan(&metrics, MAX_RECOMMENDATIONS)),
        metrics,
        insights: None,
        raw_data: file,
    }
}

#[async_trait]
impl ReportServiceTrait for MockReportService {
    async fn analyze_report(&self, file: UploadedFile) -> Report {
        build_mock_report(file, uuid::Uuid::new_v4().to_string())
    }

    async fn create_report(&self, file: UploadedFile, id: Option<String>) -> Result<Report, ReportServiceError> {
        if self.should_fail_validation {
            return Err(ReportServiceError::ValidationError(
                "Validation failed - mock is configured to fail validation".to_string(),
            ));
        }

        let id = match id {
            Some(id) => uuid::Uuid::parse_str(&id)
                .map_err(|e| ReportServiceError::ValidationError(format!("Invalid UUID format: {}", e)))?
                .to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };

        let report = build_mock_report(file, id);
        let mut reports = self.write();
        if reports.iter().any(|r| r.id == report.id) {
            return Err(ReportServiceError::ValidationError(format!(
                "Report with ID {} already exists",
                report.id
            )));
        }
        reports.insert(0, report.clone());

        Ok(report)
    }

    async fn get_reports(&self) -> Vec<Report> {
        self.read().clone()
    }

    async fn get_report(&self, id: &str) -> Result<Report, ReportServiceError> {
        self.read()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ReportServiceError::NotFound(format!("Report with ID {} not found", id)))
    }

    async fn delete_report(&self, id: &str) -> Result<(), ReportServiceError> {
        if self.should_fail_storage {
            return Err(ReportServiceError::RepositoryError(
                "Repository error - mock is configured to fail storage".to_string(),
            ));
        }

        let mut reports = self.write();
        let before = reports.len();
        reports.retain(|r| r.id != id);
        if reports.len() == before {
            Err(ReportServiceError::NotFound(format!("Report with ID {} not found", id)))
        } else {
            Ok(())
        }
    }

    async fn export_report(&self, id: &str, format: ExportFormat) -> Result<ExportedReport, ReportServiceError> {
        let report = self.get_report(id).await?;
        export_report(&report, format).map_err(|e| ReportServiceError::ExportError(e.to_string()))
    }

    fn category_profile(&self, category: Category) -> CategoryProfile {
        category_profile(category, MAX_RECOMMENDATIONS)
    }
}

/// Mock implementation of health services for testing system health
#[derive(Debug)]
pub struct MockHealthService {
    /// Database component status
    database_status: ComponentStatus,
    /// System status
    system_status: SystemStatus,
    /// Additional components
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with all components healthy
    pub fn new() -> Self {
        Self {
            database_status: ComponentStatus::Healthy,
            system_status: SystemStatus::Healthy,
            components: HashMap::new(),
        }
    }

    /// Configure the mock with a degraded database
    pub fn with_degraded_database(mut self) -> Self {
        self.database_status = ComponentStatus::Degraded;
        self
    }

    /// Configure the mock with an unhealthy database
    pub fn with_unhealthy_database(mut self) -> Self {
        self.database_status = ComponentStatus::Unhealthy;
        self
    }

    /// Set the overall system status
    pub fn with_system_status(mut self, status: SystemStatus) -> Self {
        self.system_status = status;
        self
    }

    /// Add a custom component with a specific status
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components.insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();

        components.insert(
            "database".to_string(),
            HealthComponent {
                status: self.database_status.clone(),
                details: match self.database_status {
                    ComponentStatus::Healthy => None,
                    ComponentStatus::Degraded => Some("Stored reports could not be parsed".to_string()),
                    ComponentStatus::Unhealthy => Some("Report store unavailable".to_string()),
                },
            },
        );
        components.insert(
            "api".to_string(),
            HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
        );

        for (name, component) in &self.components {
            components.insert(name.clone(), component.clone());
        }

        SystemHealth {
            status: self.system_status.clone(),
            components,
        }
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        match self.database_status {
            ComponentStatus::Healthy => Ok(true),
            ComponentStatus::Degraded => Ok(false),
            ComponentStatus::Unhealthy => Err("Report store unavailable".to_string()),
        }
    }
}

/// Factory function to create a mock health service
pub fn create_mock_health_service() -> MockHealthService {
    MockHealthService::new()
}
