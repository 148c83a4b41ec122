//! HTTP client for the support bot API
//!
//! Every request is a single `GET`. Success bodies are decoded with serde and
//! then checked against the record's validation rules, so a payload of the
//! wrong shape fails here with a typed error instead of somewhere in a view.

use botdash_core::{
    config::ApiConfig,
    types::{
        DashboardStats, LeadDetail, LeadsResponse, Period, PopularCarriersResponse,
        PopularModelsResponse, PopularQuestionsResponse, SortField, SortOrder,
        TimeDistributionResponse, TodaySummary, UnansweredAlertsResponse,
    },
};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{debug, warn};
use validator::Validate;

/// Failure of one API call
///
/// Cloneable so a single failure can be handed to every caller waiting on a
/// deduplicated request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response was received
    #[error("Network error: {message}")]
    Transport {
        /// Transport level error text
        message: String,
    },

    /// The server answered with a non-success status
    #[error("Request failed with status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Message taken from the error body, or a generic fallback
        message: String,
    },

    /// The success body was not the expected JSON
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Decoder error text
        message: String,
    },

    /// The body decoded but broke a record invariant
    #[error("Response failed validation: {message}")]
    Schema {
        /// Validation error text
        message: String,
    },

    /// The request URL could not be built
    #[error("Invalid URL: {message}")]
    InvalidUrl {
        /// Reason the URL was rejected
        message: String,
    },

    /// The request task ended without producing a response
    #[error("Request was cancelled")]
    Cancelled,
}

impl ApiError {
    /// HTTP status, when the server answered
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether trying again could plausibly succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Cancelled => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode { .. } | Self::Schema { .. } | Self::InvalidUrl { .. } => false,
        }
    }
}

/// Result type for API calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Query parameters in insertion order
///
/// Absent values are never stored, so they can not leak into a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Params(Vec<(&'static str, String)>);

impl Params {
    /// Empty parameter list
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Builder form of [`Params::push`]
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.push(name, value);
        self
    }

    /// Append a parameter
    pub fn push(&mut self, name: &'static str, value: impl fmt::Display) {
        self.0.push((name, value.to_string()));
    }

    /// Append a parameter only when it has a value
    pub fn push_opt<V: fmt::Display>(&mut self, name: &'static str, value: Option<V>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    /// Whether no parameter is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The same parameters without any named `name`
    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(key, _)| *key != name)
                .cloned()
                .collect(),
        )
    }

    /// Parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(name, value)| (*name, value.as_str()))
    }

    /// URL-encoded `name=value` pairs joined by `&`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the pairs can not be encoded.
    pub fn to_query_string(&self) -> ApiResult<String> {
        serde_urlencoded::to_string(&self.0).map_err(|e| ApiError::InvalidUrl {
            message: format!("could not encode query: {e}"),
        })
    }
}

/// Everything needed to call one endpoint and to cache its result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Logical resource name, shared by all parameterizations of the endpoint
    pub resource: &'static str,
    /// Path below the API base URL
    pub path: String,
    /// Query parameters
    pub params: Params,
}

impl Endpoint {
    fn new(resource: &'static str, path: impl Into<String>, params: Params) -> Self {
        Self {
            resource,
            path: path.into(),
            params,
        }
    }
}

/// Filters and paging for the leads listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LeadsQuery {
    /// Only leads of this messenger user
    pub user_id: Option<String>,
    /// Page size
    pub limit: Option<u32>,
    /// Number of leads to skip
    pub offset: Option<u32>,
    /// Sort column
    pub sort_by: Option<SortField>,
    /// Sort direction
    pub sort_order: Option<SortOrder>,
}

impl LeadsQuery {
    /// Query parameters in wire order
    #[must_use]
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.push_opt(
            "userId",
            self.user_id.as_deref().filter(|user_id| !user_id.is_empty()),
        );
        params.push_opt("limit", self.limit);
        params.push_opt("offset", self.offset);
        params.push_opt("sortBy", self.sort_by);
        params.push_opt("sortOrder", self.sort_order);
        params
    }
}

/// Endpoint descriptors for every API call the dashboard makes
pub mod endpoints {
    use super::{Endpoint, LeadsQuery, Params};
    use botdash_core::types::Period;

    /// Today's headline numbers
    #[must_use]
    pub fn today_summary() -> Endpoint {
        Endpoint::new("today_summary", "/api/dashboard/today-summary", Params::new())
    }

    /// Inquiry statistics for a period
    #[must_use]
    pub fn stats(period: Period) -> Endpoint {
        Endpoint::new(
            "stats",
            "/api/dashboard/stats",
            Params::new().with("period", period),
        )
    }

    /// One page of leads
    #[must_use]
    pub fn leads(query: &LeadsQuery) -> Endpoint {
        Endpoint::new("leads", "/api/leads", query.to_params())
    }

    /// Transcript of one lead
    #[must_use]
    pub fn lead_detail(id: i64) -> Endpoint {
        Endpoint::new("lead_detail", format!("/api/leads/{id}"), Params::new())
    }

    /// Leads waiting at least `minutes` for an answer
    #[must_use]
    pub fn unanswered_alerts(minutes: u32) -> Endpoint {
        Endpoint::new(
            "unanswered_alerts",
            "/api/alerts/unanswered",
            Params::new().with("minutes", minutes),
        )
    }

    /// Most frequent questions
    #[must_use]
    pub fn popular_questions(limit: u32) -> Endpoint {
        Endpoint::new(
            "popular_questions",
            "/api/analytics/popular-questions",
            Params::new().with("limit", limit),
        )
    }

    /// Inquiries per hour of day
    #[must_use]
    pub fn time_distribution(period: Period) -> Endpoint {
        Endpoint::new(
            "time_distribution",
            "/api/analytics/time-distribution",
            Params::new().with("period", period),
        )
    }

    /// Inquiries per mobile carrier
    #[must_use]
    pub fn popular_carriers(limit: u32, period: Period) -> Endpoint {
        Endpoint::new(
            "popular_carriers",
            "/api/analytics/popular-carriers",
            Params::new().with("limit", limit).with("period", period),
        )
    }

    /// Inquiries per device model
    #[must_use]
    pub fn popular_models(limit: u32, period: Period) -> Endpoint {
        Endpoint::new(
            "popular_models",
            "/api/analytics/popular-models",
            Params::new().with("limit", limit).with("period", period),
        )
    }
}

/// API client for the support bot backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client with transport defaults
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client can not be built or the base URL is
    /// not an absolute URL.
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ApiError::Transport {
            message: format!("failed to build HTTP client: {e}"),
        })?;

        Self::with_client(client, &config.base_url)
    }

    fn with_client(client: Client, base_url: &str) -> ApiResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            message: format!("{base_url}: {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                message: format!("{base_url} can not be used as a base URL"),
            });
        }

        Ok(Self { client, base_url })
    }

    /// Base URL all paths are resolved against
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `path` with `params` as its query string
    ///
    /// A path prefix on the base URL is kept. No `?` is added when there are
    /// no parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the parameters can not be encoded.
    pub fn url_for(&self, path: &str, params: &Params) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_fragment(None);
        if params.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&params.to_query_string()?));
        }
        Ok(url)
    }

    /// Issue one `GET` and decode the body as `T`
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] when no response arrives
    /// - [`ApiError::Status`] for any status outside 2xx
    /// - [`ApiError::Decode`] when the body is not a `T`
    /// - [`ApiError::Schema`] when the decoded `T` fails validation
    pub async fn request<T>(&self, path: &str, params: &Params) -> ApiResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let url = self.url_for(path, params)?;
        debug!("GET {}", url);

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                let error = ApiError::Transport {
                    message: e.to_string(),
                };
                warn!("GET {} failed: {}", url, error);
                return Err(error);
            }
        };

        let status = response.status();
        let body = response.bytes().await.map_err(|e| ApiError::Transport {
            message: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            let error = ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            };
            warn!("GET {} failed: {}", url, error);
            return Err(error);
        }

        let result = decode(&body);
        if let Err(error) = &result {
            warn!("GET {} returned an unusable body: {}", url, error);
        }
        result
    }

    /// Call a described endpoint
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn fetch<T>(&self, endpoint: &Endpoint) -> ApiResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        self.request(&endpoint.path, &endpoint.params).await
    }

    /// Get today's summary
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_today_summary(&self) -> ApiResult<TodaySummary> {
        self.fetch(&endpoints::today_summary()).await
    }

    /// Get statistics for a period
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_stats(&self, period: Period) -> ApiResult<DashboardStats> {
        self.fetch(&endpoints::stats(period)).await
    }

    /// Get one page of leads
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_leads(&self, query: &LeadsQuery) -> ApiResult<LeadsResponse> {
        self.fetch(&endpoints::leads(query)).await
    }

    /// Get the transcript of one lead
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_lead_detail(&self, id: i64) -> ApiResult<LeadDetail> {
        self.fetch(&endpoints::lead_detail(id)).await
    }

    /// Get leads unanswered for at least `minutes`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_unanswered_alerts(&self, minutes: u32) -> ApiResult<UnansweredAlertsResponse> {
        self.fetch(&endpoints::unanswered_alerts(minutes)).await
    }

    /// Get the most frequent questions
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_popular_questions(&self, limit: u32) -> ApiResult<PopularQuestionsResponse> {
        self.fetch(&endpoints::popular_questions(limit)).await
    }

    /// Get inquiries per hour of day
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_time_distribution(&self, period: Period) -> ApiResult<TimeDistributionResponse> {
        self.fetch(&endpoints::time_distribution(period)).await
    }

    /// Get inquiries per carrier
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_popular_carriers(
        &self,
        limit: u32,
        period: Period,
    ) -> ApiResult<PopularCarriersResponse> {
        self.fetch(&endpoints::popular_carriers(limit, period)).await
    }

    /// Get inquiries per device model
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_popular_models(
        &self,
        limit: u32,
        period: Period,
    ) -> ApiResult<PopularModelsResponse> {
        self.fetch(&endpoints::popular_models(limit, period)).await
    }
}

/// Message for a non-success body
fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| "Request failed".to_string(), ToString::to_string),
        Err(_) => "Unknown error".to_string(),
    }
}

fn decode<T>(body: &[u8]) -> ApiResult<T>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_slice(body).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })?;
    value.validate().map_err(|e| ApiError::Schema {
        message: e.to_string(),
    })?;
    Ok(value)
}
