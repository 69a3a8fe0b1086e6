//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use lab_insight_data::models::report::StoredReport;
use lab_insight_data::repository::{KeyValueStore, REPORTS_KEY};

use crate::services::llm::InsightProvider;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

impl SystemHealth {
    /// Build a system health value, deriving the overall status from the worst component
    pub fn from_components(components: HashMap<String, HealthComponent>) -> Self {
        let status = if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
            SystemStatus::Unhealthy
        } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        SystemHealth { status, components }
    }
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the report store
    /// Returns true if the store is healthy, false if it is readable but holds
    /// unreadable report data
    /// Returns an error if the check could not be performed
    async fn check_database_status(&self) -> Result<bool, String>;
}

/// Health checks against the report store and the insight provider
pub struct HealthService {
    store: Arc<dyn KeyValueStore>,
    insights: Arc<dyn InsightProvider>,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("store", &self.store.backend())
            .field("insights", &self.insights.name())
            .finish()
    }
}

impl HealthService {
    /// Create a new health service
    pub fn new(store: Arc<dyn KeyValueStore>, insights: Arc<dyn InsightProvider>) -> Self {
        Self { store, insights }
    }

    fn insights_component(&self) -> HealthComponent {
        let details = if self.insights.is_enabled() {
            format!("{} provider configured", self.insights.name())
        } else {
            "AI insights disabled, using local analysis only".to_string()
        };

        HealthComponent {
            status: ComponentStatus::Healthy,
            details: Some(details),
        }
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let database = match self.check_database_status().await {
            Ok(true) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
            Ok(false) => HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some("Stored reports could not be parsed".to_string()),
            },
            Err(e) => HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some(e),
            },
        };

        let mut components = HashMap::new();
        components.insert("database".to_string(), database);
        components.insert(
            "api".to_string(),
            HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
        );
        components.insert("insights".to_string(), self.insights_component());

        SystemHealth::from_components(components)
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        match self.store.read(REPORTS_KEY).await {
            Ok(None) => Ok(true),
            Ok(Some(raw)) => match serde_json::from_str::<Vec<StoredReport>>(&raw) {
                Ok(_) => Ok(true),
                Err(e) => {
                    warn!("Report store holds unreadable data: {}", e);
                    Ok(false)
                }
            },
            Err(e) => Err(format!("{} store error: {}", self.store.backend(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm::DisabledInsightProvider;
    use lab_insight_data::repository::InMemoryStore;

    fn service(store: InMemoryStore) -> HealthService {
        HealthService::new(Arc::new(store), Arc::new(DisabledInsightProvider))
    }

    #[tokio::test]
    async fn test_empty_store_is_healthy() {
        let health = service(InMemoryStore::new()).get_system_health().await;
        assert_eq!(health.status, SystemStatus::Healthy);
        assert!(health.components.contains_key("database"));
        assert!(health.components.contains_key("insights"));
    }

    #[tokio::test]
    async fn test_corrupt_reports_degrade() {
        let store = InMemoryStore::with_entry(REPORTS_KEY, "{not json");
        let health = service(store).get_system_health().await;
        assert_eq!(health.status, SystemStatus::Degraded);
        assert_eq!(health.components["database"].status, ComponentStatus::Degraded);
    }

    #[tokio::test]
    async fn test_array_of_malformed_records_degrades() {
        let store = InMemoryStore::with_entry(REPORTS_KEY, r#"[{"id": 1}, {"fileName": "x.pdf"}]"#);
        let svc = service(store);
        assert_eq!(svc.check_database_status().await, Ok(false));
        assert_eq!(svc.get_system_health().await.status, SystemStatus::Degraded);
    }

    #[tokio::test]
    async fn test_empty_array_is_healthy() {
        let svc = service(InMemoryStore::with_entry(REPORTS_KEY, "[]"));
        assert_eq!(svc.check_database_status().await, Ok(true));
    }

    #[tokio::test]
    async fn test_closed_store_is_unhealthy() {
        let store = InMemoryStore::new();
        store.close().await.unwrap();
        let svc = service(store);
        assert!(svc.check_database_status().await.is_err());
        assert_eq!(svc.get_system_health().await.status, SystemStatus::Unhealthy);
    }
}
