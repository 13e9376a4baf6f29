//! API client for the data.gov.in MGNREGA district dataset.
//!
//! One request per fiscal year, filtered server-side to the state. Retries and
//! fallbacks live in the reconciler, not here.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::models::Record;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for data.gov.in resources
const API_BASE_URL: &str = "https://api.data.gov.in/resource";

/// Resource identifier of the district-wise MGNREGA monthly dataset
const RESOURCE_ID: &str = "ee03643a-ee4c-48c2-ac30-9f2ff26ab722";

/// Public sample key published by data.gov.in for unregistered use
pub const DEFAULT_API_KEY: &str = "579b464db66ec23bdd0000018c637cc2a5fe4a6b7101e8248f082e33";

/// State every request is filtered to, in the portal's spelling
const STATE_NAME: &str = "BIHAR";

/// Maximum records returned per request.
/// A full state-year is a few hundred rows, so one page is enough.
const RECORD_LIMIT: u32 = 1000;

/// HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Option<Vec<Record>>,
}

/// Anything that can produce one fiscal year of state-wide records.
pub trait RecordSource: Send + Sync {
    fn fetch_year(&self, year: &str) -> impl Future<Output = Result<Vec<Record>, ApiError>> + Send;
}

/// API client for data.gov.in.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client with the default request timeout
    pub fn new(api_key: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(api_key, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Point the client at another host serving the same resource layout
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn dataset_url(&self) -> String {
        format!("{}/{}", self.base_url, RESOURCE_ID)
    }

    fn year_query(&self, year: &str) -> Vec<(&'static str, String)> {
        vec![
            ("api-key", self.api_key.clone()),
            ("format", "json".to_string()),
            ("limit", RECORD_LIMIT.to_string()),
            ("filters[state_name]", STATE_NAME.to_string()),
            ("filters[fin_year]", year.to_string()),
        ]
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Fetch every Bihar record for one fiscal year (e.g. `"2023-2024"`).
    pub async fn fetch_year(&self, year: &str) -> Result<Vec<Record>, ApiError> {
        let response = self
            .client
            .get(self.dataset_url())
            .query(&self.year_query(year))
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        let parsed: RecordsResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("records for {}: {}", year, e)))?;

        let records = parsed.records.unwrap_or_default();
        debug!(year, count = records.len(), "Fetched year from portal");
        Ok(records)
    }
}

impl RecordSource for ApiClient {
    fn fetch_year(&self, year: &str) -> impl Future<Output = Result<Vec<Record>, ApiError>> + Send {
        ApiClient::fetch_year(self, year)
    }
}
