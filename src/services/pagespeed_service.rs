use crate::utils::AppError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Lighthouse categories requested for every analysis.
pub const CATEGORIES: [&str; 3] = ["performance", "accessibility", "seo"];

/// Anything that can score a page and return Lighthouse categories.
#[async_trait]
pub trait PerformanceAnalyzer: Send + Sync {
    async fn analyze(&self, target_url: &str) -> Result<Value, AppError>;
}

#[derive(Debug, Deserialize)]
struct PageSpeedResponse {
    #[serde(rename = "lighthouseResult")]
    lighthouse_result: Option<LighthouseResult>,
}

#[derive(Debug, Deserialize)]
struct LighthouseResult {
    categories: Option<Value>,
}

/// Client for the PageSpeed Insights `runPagespeed` endpoint.
pub struct PageSpeedClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl PageSpeedClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    pub fn request_url(&self, target_url: &str) -> String {
        build_request_url(&self.endpoint, target_url, &self.api_key)
    }
}

fn build_request_url(endpoint: &str, target_url: &str, api_key: &str) -> String {
    let categories = CATEGORIES
        .iter()
        .map(|c| format!("category={}", c))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}?url={}&key={}&{}",
        endpoint,
        urlencoding::encode(target_url),
        urlencoding::encode(api_key),
        categories
    )
}

/// Pulls `lighthouseResult.categories` out of a successful response body.
pub fn extract_categories(body: &str) -> Result<Value, AppError> {
    let parsed: PageSpeedResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Analysis(format!("Failed to parse analysis response: {}", e)))?;

    parsed
        .lighthouse_result
        .and_then(|result| result.categories)
        .filter(|categories| !categories.is_null())
        .ok_or_else(|| {
            AppError::UnexpectedFormat("Unexpected response format from Lighthouse API".to_string())
        })
}

#[async_trait]
impl PerformanceAnalyzer for PageSpeedClient {
    async fn analyze(&self, target_url: &str) -> Result<Value, AppError> {
        log::info!(
            "🔎 Lighthouse request: {}",
            build_request_url(&self.endpoint, target_url, "***")
        );

        let response = self
            .client
            .get(self.request_url(target_url))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::Analysis(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Analysis(e.to_string()))?;

        if !status.is_success() {
            log::error!("❌ Lighthouse API error status: {}", status);
            log::error!("❌ Lighthouse API error: {}", body);
            return Err(AppError::Upstream(body));
        }

        extract_categories(&body)
    }
}
