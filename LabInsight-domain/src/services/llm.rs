//! Optional external insight provider
//!
//! The provider may add insights, recommendations and trend commentary to a
//! report. Metric records it returns are only compared against the local
//! values and then dropped; local values and statuses always win.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::entities::conversions::convert_to_data_value;
use crate::entities::report::{AiInsights, Category, Metric, MetricStatus, Trends, UploadedFile};

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Insight provider errors
#[derive(Debug, Error)]
pub enum LlmError {
    /// No provider is configured
    #[error("Insight provider is disabled")]
    Disabled,

    /// The endpoint could not be reached
    #[error("Cannot connect to insight provider at {0}")]
    Connection(String),

    /// The configured timeout elapsed
    #[error("Insight request timed out after {0}s")]
    Timeout(u64),

    /// Transport level failure
    #[error("HTTP client error: {0}")]
    Http(String),

    /// Non-2xx response
    #[error("Insight provider returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Malformed insight response: {0}")]
    MalformedResponse(String),
}

/// Insight provider configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub enabled: bool,
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    /// No timeout unless configured
    pub timeout_seconds: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_seconds: None,
        }
    }
}

impl LlmConfig {
    /// Load configuration from environment variables
    ///
    /// The provider is enabled only when `ENABLE_LLM` is not false and an
    /// API key is present.
    pub fn from_env() -> Self {
        let api_key = env::var("LLM_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let requested = env::var("ENABLE_LLM")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(true);

        Self {
            enabled: requested && api_key.is_some(),
            api_url: env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key,
            model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_tokens: env::var("LLM_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_TOKENS),
            timeout_seconds: env::var("LLM_TIMEOUT_SECONDS").ok().and_then(|v| v.parse().ok()),
        }
    }
}

/// Input handed to the provider
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub file: UploadedFile,
    pub category: Category,
    pub metrics: Vec<Metric>,
}

/// Metric record as echoed by the provider
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LlmMetric {
    pub name: String,
    pub value: serde_json::Value,
    pub unit: String,
    pub status: MetricStatus,
}

/// Structured provider answer; every field is required
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LlmAnalysis {
    pub insights: Vec<String>,
    pub metrics: Vec<LlmMetric>,
    pub recommendations: Vec<String>,
    pub trends: Trends,
}

/// External collaborator that enriches a report
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Analyse the locally generated report data
    async fn analyze(&self, request: &InsightRequest) -> Result<LlmAnalysis, LlmError>;

    /// Whether calls can succeed at all
    fn is_enabled(&self) -> bool;

    /// Short provider name for logs and health checks
    fn name(&self) -> &'static str;
}

/// Provider used when no external service is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledInsightProvider;

#[async_trait]
impl InsightProvider for DisabledInsightProvider {
    async fn analyze(&self, _request: &InsightRequest) -> Result<LlmAnalysis, LlmError> {
        Err(LlmError::Disabled)
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic Messages API client
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.api_url.trim_end_matches('/'))
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_connect() {
            LlmError::Connection(self.config.api_url.clone())
        } else if e.is_timeout() {
            LlmError::Timeout(self.config.timeout_seconds.unwrap_or_default())
        } else {
            LlmError::Http(e.to_string())
        }
    }
}

/// Instruction sent to the provider
pub fn build_prompt(request: &InsightRequest) -> Result<String, LlmError> {
    let data = serde_json::to_string(request).map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

    Ok(format!(
        "Analyze this lab report data and provide medically conservative insights:\n{}\n\n\
         Respond with a single JSON object and nothing else, shaped as:\n\
         {{\"insights\": [string], \"metrics\": [{{\"name\": string, \"value\": number or string, \"unit\": string, \"status\": \"normal\" | \"caution\" | \"attention\"}}], \
         \"recommendations\": [string], \"trends\": {{\"description\": string, \"concerns\": [string]}}}}\n\
         Echo the metrics exactly as given. Do not invent values for metrics that are not present.",
        data
    ))
}

/// Parse the provider's text answer
///
/// The JSON object is taken from the first `{` to the last `}` so prose or
/// code fences around it are tolerated.
pub fn parse_analysis(text: &str) -> Result<LlmAnalysis, LlmError> {
    let start = text
        .find('{')
        .ok_or_else(|| LlmError::MalformedResponse("No JSON object found".into()))?;
    let end = text
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| LlmError::MalformedResponse("Unclosed JSON object".into()))?;

    serde_json::from_str(&text[start..=end]).map_err(|e| LlmError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl InsightProvider for AnthropicClient {
    #[instrument(skip(self, request), fields(model = %self.config.model))]
    async fn analyze(&self, request: &InsightRequest) -> Result<LlmAnalysis, LlmError> {
        let api_key = match (&self.config.api_key, self.config.enabled) {
            (Some(key), true) => key,
            _ => return Err(LlmError::Disabled),
        };

        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(request)?,
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        let text = parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| LlmError::MalformedResponse("Response has no text content".into()))?;

        debug!("Insight provider answered with {} characters", text.len());
        parse_analysis(&text)
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled && self.config.api_key.is_some()
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}

/// Build the provider described by the configuration
pub fn create_insight_provider(config: LlmConfig) -> Arc<dyn InsightProvider> {
    if !config.enabled || config.api_key.is_none() {
        info!("Insight provider disabled; reports use local analysis only");
        return Arc::new(DisabledInsightProvider);
    }

    match AnthropicClient::new(config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!("Could not build insight provider client, disabling it: {}", e);
            Arc::new(DisabledInsightProvider)
        }
    }
}

fn values_match(local: &serde_json::Value, remote: &serde_json::Value) -> bool {
    match (local.as_f64(), remote.as_f64()) {
        (Some(a), Some(b)) => (a - b).abs() < 1e-9,
        (Some(a), None) => remote.as_str().and_then(|s| s.trim().parse::<f64>().ok()) == Some(a),
        _ => local == remote,
    }
}

/// Keep the provider's commentary and drop its metric records
///
/// Divergences from the local metrics are logged and otherwise ignored.
pub fn merge_insights(local: &[Metric], analysis: LlmAnalysis) -> AiInsights {
    for remote in &analysis.metrics {
        match local.iter().find(|m| m.name == remote.name) {
            None => debug!("Insight provider reported unknown metric {}", remote.name),
            Some(metric) => {
                let local_value = convert_to_data_value(&metric.value);
                if !values_match(&local_value, &remote.value) || metric.status != remote.status {
                    warn!(
                        "Insight provider diverged on {}: local {} ({}), provider {} ({}); keeping local",
                        metric.name, local_value, metric.status, remote.value, remote.status
                    );
                }
            }
        }
    }

    AiInsights {
        insights: analysis.insights,
        recommendations: analysis.recommendations,
        trends: analysis.trends,
    }
}
