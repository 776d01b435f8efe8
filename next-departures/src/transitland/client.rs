//! Transit.land datastore client.
//!
//! Builds resource URLs, throttles every request through one shared rate
//! limiter and hands pages to the resolution and schedule layers.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::OnestopId;
use crate::limiter::RateLimiter;
use crate::resolve::LookupTable;

use super::error::TransitError;
use super::fetch::{Fetch, HttpFetch};

/// Default base URL for the transit.land v1 datastore.
const DEFAULT_BASE_URL: &str = "https://transit.land/api/v1";

/// Default page size for list requests.
const DEFAULT_PER_PAGE: u32 = 50;

/// Default aggregate request budget: 8 requests per second.
const DEFAULT_RATE_CAPACITY: usize = 8;
const DEFAULT_RATE_WINDOW: Duration = Duration::from_millis(1000);

/// Configuration for the transit.land client.
#[derive(Debug, Clone)]
pub struct TransitConfig {
    /// Base URL for the API (defaults to production transit.land)
    pub base_url: String,
    /// Page size for list requests
    pub per_page: u32,
    /// Rate limit: at most `rate_capacity` requests start per `rate_window`
    pub rate_capacity: usize,
    pub rate_window: Duration,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            rate_capacity: DEFAULT_RATE_CAPACITY,
            rate_window: DEFAULT_RATE_WINDOW,
            timeout_secs: 30,
        }
    }
}

impl TransitConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the page size for list requests.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Set the shared request budget.
    pub fn with_rate_limit(mut self, capacity: usize, window: Duration) -> Self {
        self.rate_capacity = capacity;
        self.rate_window = window;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the transit.land datastore.
///
/// Cheap to clone: clones share the transport, the rate limiter and the
/// lookup table, so the aggregate request rate stays under the externally
/// imposed cap no matter how many copies are handed out.
#[derive(Clone)]
pub struct TransitClient {
    pub(crate) fetch: Arc<dyn Fetch>,
    pub(crate) limiter: Arc<RateLimiter>,
    pub(crate) lookup: Arc<LookupTable>,
    base_url: Arc<str>,
    per_page: u32,
}

impl TransitClient {
    /// Create a client backed by real HTTP transport.
    pub fn new(config: TransitConfig) -> Result<Self, TransitError> {
        let fetch = HttpFetch::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_fetch(config, Arc::new(fetch)))
    }

    /// Create a client over any transport capability.
    ///
    /// Used by tests and hosts that bring their own transport.
    pub fn with_fetch(config: TransitConfig, fetch: Arc<dyn Fetch>) -> Self {
        Self {
            fetch,
            limiter: Arc::new(RateLimiter::new(config.rate_capacity, config.rate_window)),
            lookup: Arc::new(LookupTable::default()),
            base_url: config.base_url.into(),
            per_page: config.per_page,
        }
    }

    /// Attach a pre-seeded lookup table, consulted before any network call.
    pub fn with_lookup(mut self, lookup: LookupTable) -> Self {
        self.lookup = Arc::new(lookup);
        self
    }

    /// Build a resource URL with the API's default list parameters.
    ///
    /// Defaults are emitted first; `params` then override a default in
    /// place or append after it, so a given query always serialises the
    /// same way.
    pub(crate) fn resource_url(&self, resource: &str, params: &[(&str, String)]) -> String {
        let mut query: Vec<(&str, String)> = vec![
            ("offset", "0".to_string()),
            ("per_page", self.per_page.to_string()),
            ("sort_key", "id".to_string()),
            ("sort_order", "asc".to_string()),
        ];
        for (key, value) in params {
            match query.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = value.clone(),
                None => query.push((key, value.clone())),
            }
        }
        let query: Vec<String> = query
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect();
        format!("{}/{resource}?{}", self.base_url, query.join("&"))
    }

    pub(crate) fn operators_url(&self) -> String {
        self.resource_url("operators", &[])
    }

    pub(crate) fn stops_url(&self, served_by: &OnestopId) -> String {
        self.resource_url("stops", &[("served_by", served_by.as_str().to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transitland::mock::MockFetch;

    fn client() -> TransitClient {
        TransitClient::with_fetch(TransitConfig::default(), Arc::new(MockFetch::new()))
    }

    #[test]
    fn config_defaults() {
        let config = TransitConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.per_page, 50);
        assert_eq!(config.rate_capacity, 8);
        assert_eq!(config.rate_window, Duration::from_millis(1000));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_builder() {
        let config = TransitConfig::default()
            .with_base_url("http://localhost:8080")
            .with_per_page(10)
            .with_rate_limit(2, Duration::from_millis(250))
            .with_timeout(5);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.per_page, 10);
        assert_eq!(config.rate_capacity, 2);
        assert_eq!(config.rate_window, Duration::from_millis(250));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn resource_url_defaults() {
        assert_eq!(
            client().operators_url(),
            "https://transit.land/api/v1/operators?offset=0&per_page=50&sort_key=id&sort_order=asc"
        );
    }

    #[test]
    fn resource_url_appends_filters() {
        let served_by = OnestopId::parse("o-dr4e-portauthoritytransitcorporation").unwrap();
        assert_eq!(
            client().stops_url(&served_by),
            "https://transit.land/api/v1/stops?offset=0&per_page=50&sort_key=id&sort_order=asc\
             &served_by=o-dr4e-portauthoritytransitcorporation"
        );
    }

    #[test]
    fn resource_url_overrides_defaults_in_place() {
        let url = client().resource_url(
            "schedule_stop_pairs",
            &[
                ("sort_key", "origin_departure_time".to_string()),
                ("date", "2017-09-26".to_string()),
            ],
        );
        assert_eq!(
            url,
            "https://transit.land/api/v1/schedule_stop_pairs?offset=0&per_page=50\
             &sort_key=origin_departure_time&sort_order=asc&date=2017-09-26"
        );
    }

    #[test]
    fn resource_url_encodes_values() {
        let url = client().resource_url(
            "schedule_stop_pairs",
            &[("origin_departure_between", "23:45,24:00".to_string())],
        );
        assert!(url.ends_with("&origin_departure_between=23%3A45%2C24%3A00"));
    }
}
