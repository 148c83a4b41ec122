//! One query hook per API resource

use crate::{
    api_client::{ApiClient, ApiResult, Endpoint, LeadsQuery, endpoints},
    query::{AnyValue, Fetcher, Query, QueryCache, QueryKey},
};
use botdash_core::{
    Config,
    config::RefreshConfig,
    types::{
        DashboardStats, LeadDetail, LeadsResponse, Period, PopularCarriersResponse,
        PopularModelsResponse, PopularQuestionsResponse, TimeDistributionResponse, TodaySummary,
        UnansweredAlertsResponse,
    },
};
use futures::FutureExt;
use serde::de::DeserializeOwned;
use std::{sync::Arc, time::Duration};
use validator::Validate;

/// Hooks binding screens to the API through the shared cache
#[derive(Debug, Clone)]
pub struct Resources {
    client: ApiClient,
    cache: QueryCache,
    refresh: RefreshConfig,
}

impl Resources {
    /// Assemble from parts
    #[must_use]
    pub const fn new(client: ApiClient, cache: QueryCache, refresh: RefreshConfig) -> Self {
        Self {
            client,
            cache,
            refresh,
        }
    }

    /// Build a client and an empty cache from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the API client can not be created.
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let client = ApiClient::from_config(&config.api)?;
        let cache = QueryCache::with_retention(config.cache.retention());
        Ok(Self::new(client, cache, config.refresh.clone()))
    }

    /// The API client
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The shared cache
    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn bind<T>(&self, endpoint: Endpoint, interval: Option<Duration>) -> Query<T>
    where
        T: DeserializeOwned + Validate + Send + Sync + 'static,
    {
        let key = QueryKey::from(&endpoint);
        let client = self.client.clone();
        let fetcher: Fetcher = Arc::new(move || {
            let client = client.clone();
            let endpoint = endpoint.clone();
            async move {
                client
                    .fetch::<T>(&endpoint)
                    .await
                    .map(|value| Arc::new(value) as AnyValue)
            }
            .boxed()
        });

        Query::mount(&self.cache, key, fetcher, interval)
    }

    /// Today's summary, refreshed on the summary interval
    #[must_use]
    pub fn today_summary(&self) -> Query<TodaySummary> {
        self.bind(
            endpoints::today_summary(),
            Some(self.refresh.summary_interval()),
        )
    }

    /// Statistics for `period`
    #[must_use]
    pub fn stats(&self, period: Period) -> Query<DashboardStats> {
        self.bind(endpoints::stats(period), None)
    }

    /// One page of leads
    #[must_use]
    pub fn leads(&self, query: &LeadsQuery) -> Query<LeadsResponse> {
        self.bind(endpoints::leads(query), None)
    }

    /// Lead count of the newest cached page listed like `query`, at any offset
    #[must_use]
    pub fn cached_leads_count(&self, query: &LeadsQuery) -> Option<u64> {
        let wanted = endpoints::leads(query);
        let listing = wanted.params.without("offset");
        self.cache
            .find_latest(wanted.resource, |key, response: &LeadsResponse| {
                (key.path() == wanted.path && key.params().without("offset") == listing)
                    .then_some(response.count)
            })
    }

    /// Transcript of the selected lead; disabled while nothing is selected
    #[must_use]
    pub fn lead_detail(&self, id: Option<i64>) -> Query<LeadDetail> {
        id.map_or_else(
            || Query::disabled(&self.cache),
            |id| self.bind(endpoints::lead_detail(id), None),
        )
    }

    /// Leads unanswered for at least `minutes`, refreshed on the alerts interval
    #[must_use]
    pub fn unanswered_alerts(&self, minutes: u32) -> Query<UnansweredAlertsResponse> {
        self.bind(
            endpoints::unanswered_alerts(minutes),
            Some(self.refresh.alerts_interval()),
        )
    }

    /// The `limit` most frequent questions
    #[must_use]
    pub fn popular_questions(&self, limit: u32) -> Query<PopularQuestionsResponse> {
        self.bind(endpoints::popular_questions(limit), None)
    }

    /// Inquiries per hour of day
    #[must_use]
    pub fn time_distribution(&self, period: Period) -> Query<TimeDistributionResponse> {
        self.bind(endpoints::time_distribution(period), None)
    }

    /// Inquiries per carrier
    #[must_use]
    pub fn popular_carriers(&self, limit: u32, period: Period) -> Query<PopularCarriersResponse> {
        self.bind(endpoints::popular_carriers(limit, period), None)
    }

    /// Inquiries per device model
    #[must_use]
    pub fn popular_models(&self, limit: u32, period: Period) -> Query<PopularModelsResponse> {
        self.bind(endpoints::popular_models(limit, period), None)
    }
}
