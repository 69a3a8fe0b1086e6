use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use lab_insight_data::database::{create_store, StoreConfig};
use lab_insight_data::repository::{ReportRepository, ReportRepositoryTrait, RepositoryError};

use crate::config::AnalysisConfig;
use crate::entities::conversions;
use crate::entities::profile::CategoryProfile;
use crate::entities::report::{Category, Report, UploadedFile};
use crate::services::classifier::classify_upload;
use crate::services::export::{export_report, ExportFormat, ExportedReport};
use crate::services::generator::ReportExtractor;
use crate::services::llm::{self, DisabledInsightProvider, InsightProvider, InsightRequest, LlmConfig};
use crate::services::profiles::category_profile;
use crate::services::recommendations::{derive_dietary_plan, derive_lifestyle};
use crate::services::summary::synthesize;
use crate::services::text_extractor::TextPatternExtractor;

/// Report service errors
#[derive(Debug, Error)]
pub enum ReportServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Not found error
    #[error("Report not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// Export error
    #[error("Export error: {0}")]
    ExportError(String),
}

/// Trait for report service operations
#[async_trait]
pub trait ReportServiceTrait: Send + Sync {
    /// Analyse an uploaded file without storing the result
    async fn analyze_report(&self, file: UploadedFile) -> Report;

    /// Analyse an uploaded file and store the report
    ///
    /// `id` must be a UUID when supplied; a fresh v4 id is used otherwise.
    async fn create_report(&self, file: UploadedFile, id: Option<String>) -> Result<Report, ReportServiceError>;

    /// All stored reports, newest first
    async fn get_reports(&self) -> Vec<Report>;

    /// A stored report by id
    async fn get_report(&self, id: &str) -> Result<Report, ReportServiceError>;

    /// Remove a stored report
    async fn delete_report(&self, id: &str) -> Result<(), ReportServiceError>;

    /// Render a stored report as a downloadable artifact
    async fn export_report(&self, id: &str, format: ExportFormat) -> Result<ExportedReport, ReportServiceError>;

    /// Reference data for a category detail view
    fn category_profile(&self, category: Category) -> CategoryProfile;
}

/// Report analysis and persistence
pub struct ReportService<R: ReportRepositoryTrait> {
    repository: R,
    extractor: Box<dyn ReportExtractor>,
    insights: Arc<dyn InsightProvider>,
    config: AnalysisConfig,
    rng: Mutex<StdRng>,
}

impl<R: ReportRepositoryTrait> ReportService<R> {
    /// Create a service with local-only analysis and an entropy-seeded random source
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            extractor: Box::new(TextPatternExtractor::default()),
            insights: Arc::new(DisabledInsightProvider),
            config: AnalysisConfig::default(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Use a fixed seed so analyses are reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_insight_provider(mut self, provider: Arc<dyn InsightProvider>) -> Self {
        self.insights = provider;
        self
    }

    pub fn with_extractor(mut self, extractor: Box<dyn ReportExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn insight_provider(&self) -> Arc<dyn InsightProvider> {
        Arc::clone(&self.insights)
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> ReportServiceError {
        match err {
            RepositoryError::Validation(msg) => ReportServiceError::ValidationError(msg),
            _ => ReportServiceError::RepositoryError(err.to_string()),
        }
    }

    fn extract_metrics(&self, file: &UploadedFile, category: Category) -> Vec<crate::entities::report::Metric> {
        // A poisoned lock only means another analysis panicked mid-draw; the
        // generator state is still valid.
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.extractor.extract(file, category, &mut *rng)
    }

    async fn analyze_with_id(&self, file: UploadedFile, id: String) -> Report {
        let category = classify_upload(&file);
        let metrics = self.extract_metrics(&file, category);
        debug!(
            "Extracted {} metrics for {} using {}",
            metrics.len(),
            category,
            self.extractor.name()
        );

        let cap = self.config.recommendation_cap;
        let summary = synthesize(&metrics, &file.name, &file.file_type);
        let recommendations = derive_lifestyle(category, &file.file_type, cap);
        let dietary_plan = derive_dietary_plan(&metrics, cap);

        let insights = if self.insights.is_enabled() {
            let request = InsightRequest {
                file: file.clone(),
                category,
                metrics: metrics.clone(),
            };
            match self.insights.analyze(&request).await {
                Ok(analysis) => Some(llm::merge_insights(&metrics, analysis)),
                Err(e) => {
                    warn!("Insight provider {} failed, using local analysis only: {}", self.insights.name(), e);
                    None
                }
            }
        } else {
            None
        };

        Report {
            id,
            file_name: file.name.clone(),
            file_type: file.file_type.clone(),
            upload_date: Utc::now(),
            category,
            metrics,
            summary,
            recommendations,
            dietary_plan: Some(dietary_plan),
            insights,
            raw_data: file,
        }
    }
}

#[async_trait]
impl<R: ReportRepositoryTrait> ReportServiceTrait for ReportService<R> {
    #[instrument(skip(self, file), fields(file_name = %file.name))]
    async fn analyze_report(&self, file: UploadedFile) -> Report {
        self.analyze_with_id(file, Uuid::new_v4().to_string()).await
    }

    #[instrument(skip(self, file), fields(file_name = %file.name))]
    async fn create_report(&self, file: UploadedFile, id: Option<String>) -> Result<Report, ReportServiceError> {
        let id = match id {
            Some(id) => conversions::parse_string_to_uuid(&id)
                .map_err(ReportServiceError::ValidationError)?
                .to_string(),
            None => Uuid::new_v4().to_string(),
        };

        let report = self.analyze_with_id(file, id).await;

        match self.repository.save(conversions::convert_to_data_report(&report)).await {
            Ok(()) => info!("Stored report {} ({})", report.id, report.category),
            Err(RepositoryError::Validation(msg)) => return Err(ReportServiceError::ValidationError(msg)),
            Err(e) => error!("Error saving report {}: {}", report.id, e),
        }

        Ok(report)
    }

    async fn get_reports(&self) -> Vec<Report> {
        self.repository
            .list()
            .await
            .into_iter()
            .filter_map(|stored| {
                let id = stored.id.clone();
                match conversions::convert_to_domain_report(stored) {
                    Ok(report) => Some(report),
                    Err(e) => {
                        warn!("Skipping unreadable report {}: {}", id, e);
                        None
                    }
                }
            })
            .collect()
    }

    async fn get_report(&self, id: &str) -> Result<Report, ReportServiceError> {
        let stored = self
            .repository
            .get_by_id(id)
            .await
            .ok_or_else(|| ReportServiceError::NotFound(format!("Report with ID {} not found", id)))?;

        conversions::convert_to_domain_report(stored).map_err(ReportServiceError::RepositoryError)
    }

    async fn delete_report(&self, id: &str) -> Result<(), ReportServiceError> {
        let removed = self
            .repository
            .delete(id)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        if removed {
            info!("Deleted report {}", id);
            Ok(())
        } else {
            Err(ReportServiceError::NotFound(format!("Report with ID {} not found", id)))
        }
    }

    async fn export_report(&self, id: &str, format: ExportFormat) -> Result<ExportedReport, ReportServiceError> {
        let report = self.get_report(id).await?;
        export_report(&report, format).map_err(|e| ReportServiceError::ExportError(e.to_string()))
    }

    fn category_profile(&self, category: Category) -> CategoryProfile {
        category_profile(category, self.config.recommendation_cap)
    }
}

/// Create a report service from environment configuration
///
/// Store, insight provider and analysis settings are read with their
/// `from_env` constructors; an unusable store configuration falls back to the
/// in-memory store.
pub async fn create_default_report_service() -> ReportService<ReportRepository> {
    let store_config = StoreConfig::from_env().unwrap_or_else(|e| {
        warn!("Invalid store configuration ({}), using in-memory store", e);
        StoreConfig::in_memory()
    });
    let store = create_store(&store_config).await;

    ReportService::new(ReportRepository::new(store))
        .with_insight_provider(llm::create_insight_provider(LlmConfig::from_env()))
        .with_config(AnalysisConfig::from_env())
}

/// Create a mock report service for testing
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_mock_report_service() -> crate::testing::MockReportService {
    crate::testing::MockReportService::new()
}
