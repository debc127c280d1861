// client.rs - Typed operations against the SmartFood service.
//
// Each operation declares its failure policy in its return type:
// - Result<T, ServiceError>: mutating and display-critical calls; the caller
//   gets the classified error (or the service's rejection detail).
// - Option<T>: best-effort lookups; any failure is logged and reported as None.
//
// Mutating and goal-critical calls go through the executor's default
// deadline. Pure reads that feed non-blocking views use an unbounded call
// with the same classification.

use std::path::{Path, PathBuf};

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{ApiError, ServiceError};
use crate::executor::{Deadline, RawResponse, RequestExecutor};
use crate::types::{
    AnalyzeImageRequest, AnalyzeImageResponse, ApiErrorResponse, CategoryInfo,
    CreateRecordRequest, DailyBalanceResponse, FoodCategoriesResponse, FoodItemInfo,
    FoodsByCategoryResponse, GoalInput, GoalRecord, IpConfig, LocalIpResponse,
    MealRecordResponse, PortionOption, ProgressRange, ProgressResponse, QuickRecordRequest,
};

/// Client for every endpoint the front end uses.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    executor: RequestExecutor,
    base_url: Url,
    ip_config_path: PathBuf,
}

impl ServiceClient {
    /// Build a client from configuration. Fails on a malformed base URL.
    pub fn new(config: &ClientConfig) -> Result<Self, ServiceError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ServiceError::InvalidConfig(format!("base_url '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::InvalidConfig(format!(
                "base_url '{}' cannot carry endpoint paths",
                config.base_url
            )));
        }
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ServiceError::InvalidConfig(format!("http client: {e}")))?;

        info!(base_url = %base_url, timeout_ms = config.request_timeout_ms, "service client ready");
        Ok(Self {
            executor: RequestExecutor::new(http, config.request_timeout()),
            base_url,
            ip_config_path: config.ip_config_path.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Submit a photo (base64) for recognition.
    ///
    /// When recognition fails the service answers with a rejection detail
    /// (code, recognised name, candidate foods), returned as `Rejected`.
    pub async fn analyze_image(
        &self,
        image_base64: &str,
    ) -> Result<AnalyzeImageResponse, ServiceError> {
        let body = AnalyzeImageRequest {
            image_base64: image_base64.to_string(),
        };
        let response = self
            .executor
            .send(self.post(&["analyze"], &body), Deadline::Default)
            .await?;
        decode_or_reject(response)
    }

    /// Record a meal against a recognised portion.
    pub async fn create_record(
        &self,
        record: &CreateRecordRequest,
    ) -> Result<MealRecordResponse, ServiceError> {
        require_positive("visual_portion_id", record.visual_portion_id)?;
        self.bounded(self.post(&["records"], record)).await
    }

    /// Today's remaining calories and protein, with suggestions.
    pub async fn balance(&self) -> Result<DailyBalanceResponse, ServiceError> {
        self.bounded(self.get(&["balance"])).await
    }

    /// Deficit history for the chosen window.
    pub async fn progress(&self, range: ProgressRange) -> Result<ProgressResponse, ServiceError> {
        let request = self.get(&["progress"]).query(&[("range", range.as_str())]);
        self.plain(request).await
    }

    /// Replace the current goal. The service computes the targets.
    pub async fn set_goal(&self, input: &GoalInput) -> Result<GoalRecord, ServiceError> {
        self.bounded(self.post(&["goals"], input)).await
    }

    /// Current goal, or `None` if there is none or the lookup failed.
    pub async fn goal(&self) -> Option<GoalRecord> {
        match self.try_goal().await {
            Ok(goal) => goal,
            Err(err) => {
                debug!(kind = %err.kind(), error = %err.message(), "goal lookup failed, treating as absent");
                None
            }
        }
    }

    /// Current goal with the failure kept, so callers can tell
    /// "the service has no goal" apart from "the service could not be asked".
    pub async fn try_goal(&self) -> Result<Option<GoalRecord>, ApiError> {
        let response = self
            .executor
            .execute(self.get(&["goals"]), Deadline::Default)
            .await?;
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        response.json::<Option<GoalRecord>>()
    }

    /// Record a meal without a photo.
    pub async fn quick_record(
        &self,
        visual_portion_id: u64,
    ) -> Result<MealRecordResponse, ServiceError> {
        require_positive("visual_portion_id", visual_portion_id)?;
        let body = QuickRecordRequest { visual_portion_id };
        self.bounded(self.post(&["quick-record"], &body)).await
    }

    /// Food categories offered when recognition fails.
    pub async fn food_categories(&self) -> Result<Vec<CategoryInfo>, ServiceError> {
        let response: FoodCategoriesResponse = self.plain(self.get(&["food-categories"])).await?;
        Ok(response.categories)
    }

    /// Foods belonging to one category.
    pub async fn foods_by_category(
        &self,
        category_key: &str,
    ) -> Result<FoodsByCategoryResponse, ServiceError> {
        require_non_empty("category_key", category_key)?;
        self.plain(self.get(&["foods-by-category", category_key]))
            .await
    }

    /// Free-text food search. The query is percent-encoded.
    pub async fn search_foods(&self, query: &str) -> Result<Vec<FoodItemInfo>, ServiceError> {
        let request = self.get(&["food-search"]).query(&[("q", query)]);
        self.plain(request).await
    }

    /// Portion options for a food picked by name, bypassing recognition.
    pub async fn portions_for_food(
        &self,
        food_name: &str,
    ) -> Result<Vec<PortionOption>, ServiceError> {
        require_non_empty("food_name", food_name)?;
        let response = self
            .executor
            .send(self.get(&["portions", food_name]), Deadline::Unbounded)
            .await?;
        let analyzed: AnalyzeImageResponse = decode_or_reject(response)?;
        Ok(analyzed.portion_options)
    }

    /// LAN addresses of the service host, if it can tell us.
    pub async fn local_ip(&self) -> Option<LocalIpResponse> {
        let result: Result<LocalIpResponse, ApiError> = async {
            self.executor
                .execute(self.get(&["system", "local-ip"]), Deadline::Unbounded)
                .await?
                .json::<LocalIpResponse>()
        }
        .await;
        result
            .inspect_err(|err| debug!(error = %err.message(), "local ip lookup failed"))
            .ok()
    }

    /// Addresses from the static config file, if present and readable.
    pub async fn ip_config(&self) -> Option<IpConfig> {
        read_ip_config(&self.ip_config_path).await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get(&self, segments: &[&str]) -> reqwest::RequestBuilder {
        self.executor.request(Method::GET, self.endpoint(segments))
    }

    fn post<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> reqwest::RequestBuilder {
        self.executor
            .request(Method::POST, self.endpoint(segments))
            .json(body)
    }

    async fn bounded<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = self.executor.execute(request, Deadline::Default).await?;
        Ok(response.json()?)
    }

    async fn plain<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = self.executor.execute(request, Deadline::Unbounded).await?;
        Ok(response.json()?)
    }
}

/// Read the static address file. Missing or malformed files yield `None`.
pub async fn read_ip_config(path: &Path) -> Option<IpConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .inspect_err(|e| debug!(path = %path.display(), error = %e, "ip config not readable"))
        .ok()?;
    serde_json::from_str(&content)
        .inspect_err(|e| debug!(path = %path.display(), error = %e, "ip config malformed"))
        .ok()
}

/// Decode a success body, or turn an error status into a rejection (when the
/// service explained itself) or a classified failure.
fn decode_or_reject<T: DeserializeOwned>(response: RawResponse) -> Result<T, ServiceError> {
    if !response.is_success() {
        if let Some(detail) = rejection_detail(&response.body) {
            debug!(status = response.status.as_u16(), code = ?detail.code, "request rejected by service");
            return Err(ServiceError::Rejected {
                status: response.status.as_u16(),
                detail,
            });
        }
    }
    Ok(response.error_for_status()?.json()?)
}

/// Extract `{"detail": {"message": ...}}` or a bare `{"message": ...}` body.
fn rejection_detail(body: &[u8]) -> Option<ApiErrorResponse> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let candidate = match value.get("detail") {
        Some(detail) => detail.clone(),
        None => value,
    };
    if !candidate.get("message").is_some_and(|m| m.is_string()) {
        return None;
    }
    serde_json::from_value(candidate).ok()
}

fn require_positive(field: &str, value: u64) -> Result<(), ServiceError> {
    if value == 0 {
        return Err(ServiceError::InvalidInput(format!(
            "{field} must be a positive integer"
        )));
    }
    Ok(())
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}
