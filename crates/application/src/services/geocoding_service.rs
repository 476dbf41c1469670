//! Geocoding service
//!
//! Cache-or-fetch orchestration in front of the selected provider. Only
//! successful responses are cached; empty queries, empty result sets and
//! errors always go back to the provider on the next identical request.
//! Concurrent identical queries are not coalesced, so both may reach the
//! upstream before either result is stored.

use std::sync::Arc;
use std::time::Duration;

use domain::{GeocodeResponse, ServerStatus};
use integration_geocoding::{GeocodingError, GeocodingProvider};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::ports::{CachePort, CachePortExt};

const CACHE_KEY_PREFIX: &str = "geocode:";

/// Cache key for a query, taken verbatim with no normalization
#[must_use]
pub fn cache_key(query: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{query}")
}

/// Geocoding use case: one provider, one expiring cache
#[derive(Debug, Clone)]
pub struct GeocodingService {
    provider: Arc<dyn GeocodingProvider>,
    cache: Arc<dyn CachePort>,
    ttl: Duration,
}

impl GeocodingService {
    /// Create a service caching successful results for `ttl`
    #[must_use]
    pub fn new(
        provider: Arc<dyn GeocodingProvider>,
        cache: Arc<dyn CachePort>,
        ttl: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            ttl,
        }
    }

    /// Name of the provider serving requests
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolve a query, serving from cache when possible
    ///
    /// A cache hit returns the stored response flagged as cached. Cache
    /// failures are logged and treated as a miss.
    ///
    /// # Errors
    ///
    /// Returns the provider's error unchanged.
    #[instrument(level = "debug", skip(self, cancel), fields(provider = self.provider.name()))]
    pub async fn geocode(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<GeocodeResponse, GeocodingError> {
        let key = cache_key(query);

        match self.cache.get::<GeocodeResponse>(&key).await {
            Ok(Some(cached)) => {
                debug!("Geocoding cache hit");
                return Ok(cached.into_cached());
            },
            Ok(None) => debug!("Geocoding cache miss"),
            Err(e) => warn!(error = %e, "Cache lookup failed, treating as miss"),
        }

        let response = self.provider.geocode(cancel, query).await?;

        if response.is_success() {
            if let Err(e) = self.cache.set(&key, &response, self.ttl).await {
                warn!(error = %e, "Failed to cache geocoding result");
            }
        }

        Ok(response)
    }

    /// Provider status enriched with this service's cache counters
    ///
    /// # Errors
    ///
    /// Returns the provider's error unchanged.
    pub async fn status(&self, cancel: &CancellationToken) -> Result<ServerStatus, GeocodingError> {
        let stats = self.cache.stats();
        let mut status = self
            .provider
            .status(cancel)
            .await?
            .with_cache(stats.entries, stats.hits, stats.misses);
        status.version = env!("CARGO_PKG_VERSION").to_string();
        Ok(status)
    }

    /// Zero the provider's counters; cached entries are kept
    ///
    /// # Errors
    ///
    /// Returns the provider's error unchanged.
    pub fn reset(&self) -> Result<(), GeocodingError> {
        self.provider.reset()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use domain::Address;
    use mockall::mock;
    use parking_lot::Mutex;

    use super::*;
    use crate::{ApplicationError, CacheStats};

    mock! {
        pub Provider {}

        #[async_trait]
        impl GeocodingProvider for Provider {
            async fn geocode(&self, cancel: &CancellationToken, query: &str) -> Result<GeocodeResponse, GeocodingError>;
            fn name(&self) -> &'static str;
            async fn status(&self, cancel: &CancellationToken) -> Result<ServerStatus, GeocodingError>;
            fn reset(&self) -> Result<(), GeocodingError>;
        }
    }

    impl std::fmt::Debug for MockProvider {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MockProvider").finish_non_exhaustive()
        }
    }

    /// HashMap-backed cache counting hits and misses
    #[derive(Debug, Default)]
    struct InMemoryCache {
        entries: Mutex<HashMap<String, Vec<u8>>>,
        hits: AtomicU64,
        misses: AtomicU64,
    }

    #[async_trait]
    impl CachePort for InMemoryCache {
        async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
            let value = self.entries.lock().get(key).cloned();
            if value.is_some() {
                self.hits.fetch_add(1, Ordering::Relaxed);
            } else {
                self.misses.fetch_add(1, Ordering::Relaxed);
            }
            Ok(value)
        }

        async fn set_bytes(
            &self,
            key: &str,
            value: Vec<u8>,
            _ttl: Duration,
        ) -> Result<(), ApplicationError> {
            self.entries.lock().insert(key.to_string(), value);
            Ok(())
        }

        fn stats(&self) -> CacheStats {
            CacheStats {
                hits: self.hits.load(Ordering::Relaxed),
                misses: self.misses.load(Ordering::Relaxed),
                entries: self.entries.lock().len() as u64,
            }
        }
    }

    /// Cache whose every operation fails
    #[derive(Debug)]
    struct BrokenCache;

    #[async_trait]
    impl CachePort for BrokenCache {
        async fn get_bytes(&self, _key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
            Err(ApplicationError::Cache("offline".to_string()))
        }

        async fn set_bytes(
            &self,
            _key: &str,
            _value: Vec<u8>,
            _ttl: Duration,
        ) -> Result<(), ApplicationError> {
            Err(ApplicationError::Cache("offline".to_string()))
        }

        fn stats(&self) -> CacheStats {
            CacheStats::default()
        }
    }

    /// Provider that takes a while to answer and counts its calls
    #[derive(Debug, Default)]
    struct SlowProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GeocodingProvider for SlowProvider {
        async fn geocode(
            &self,
            _cancel: &CancellationToken,
            _query: &str,
        ) -> Result<GeocodeResponse, GeocodingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(downing_street())
        }

        fn name(&self) -> &'static str {
            "Slow"
        }

        async fn status(
            &self,
            _cancel: &CancellationToken,
        ) -> Result<ServerStatus, GeocodingError> {
            Ok(provider_status(0))
        }

        fn reset(&self) -> Result<(), GeocodingError> {
            Ok(())
        }
    }

    fn downing_street() -> GeocodeResponse {
        let address = Address::new(51.5034, -0.1276)
            .unwrap()
            .with_street("Downing Street")
            .with_number("10")
            .with_city("London")
            .with_country("United Kingdom");
        GeocodeResponse::success(address, "Nominatim", 0.12)
    }

    fn provider_status(requests: u64) -> ServerStatus {
        ServerStatus {
            status: "active".to_string(),
            provider: "Nominatim".to_string(),
            version: String::new(),
            uptime: 0.0,
            start_time: None,
            cache_size: 0,
            cache_hits: 0,
            cache_misses: 0,
            requests_total: requests,
            errors_total: 0,
            average_time: 0.0,
        }
    }

    fn service(provider: MockProvider, cache: Arc<dyn CachePort>) -> GeocodingService {
        GeocodingService::new(Arc::new(provider), cache, Duration::from_secs(60))
    }

    #[test]
    fn cache_key_is_verbatim() {
        assert_eq!(cache_key("Berlin"), "geocode:Berlin");
        assert_eq!(cache_key(" Berlin "), "geocode: Berlin ");
    }

    #[tokio::test]
    async fn second_identical_query_is_served_from_cache() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("Nominatim");
        provider
            .expect_geocode()
            .times(1)
            .returning(|_, _| Ok(downing_street()));

        let service = service(provider, Arc::new(InMemoryCache::default()));
        let cancel = CancellationToken::new();

        let first = service.geocode("10 Downing Street", &cancel).await.unwrap();
        let second = service.geocode("10 Downing Street", &cancel).await.unwrap();

        assert!(!first.is_cached());
        assert!(second.is_cached());
        assert!(second.is_success());
        assert_eq!(second.address(), first.address());
        assert_eq!(second.source(), first.source());
    }

    #[tokio::test]
    async fn no_results_is_never_cached() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("Nominatim");
        provider
            .expect_geocode()
            .times(2)
            .returning(|_, _| Ok(GeocodeResponse::no_results("Nominatim")));

        let cache = Arc::new(InMemoryCache::default());
        let service = service(provider, cache.clone());
        let cancel = CancellationToken::new();

        for _ in 0..2 {
            let response = service.geocode("Atlantis", &cancel).await.unwrap();
            assert!(!response.is_cached());
            assert_eq!(response.error(), Some("no results found"));
        }
        assert_eq!(cache.stats().entries, 0);
        assert_eq!(cache.stats().hits, 0);
    }

    #[tokio::test]
    async fn empty_query_is_never_cached() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("Nominatim");
        provider
            .expect_geocode()
            .times(2)
            .returning(|_, _| Ok(GeocodeResponse::empty_query("Nominatim")));

        let service = service(provider, Arc::new(InMemoryCache::default()));
        let cancel = CancellationToken::new();

        for _ in 0..2 {
            let response = service.geocode("", &cancel).await.unwrap();
            assert!(!response.is_cached());
            assert!(response.address().is_none());
        }
    }

    #[tokio::test]
    async fn provider_error_passes_through_unchanged() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("Nominatim");
        provider.expect_geocode().times(2).returning(|_, _| {
            Err(GeocodingError::UpstreamStatus {
                status: 502,
                body: "bad gateway".to_string(),
            })
        });

        let service = service(provider, Arc::new(InMemoryCache::default()));
        let cancel = CancellationToken::new();

        for _ in 0..2 {
            let err = service.geocode("Berlin", &cancel).await.unwrap_err();
            assert!(matches!(
                err,
                GeocodingError::UpstreamStatus { status: 502, ref body } if body == "bad gateway"
            ));
        }
    }

    #[tokio::test]
    async fn cancellation_error_passes_through() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("Nominatim");
        provider.expect_geocode().returning(|_, _| {
            Err(GeocodingError::RateLimited {
                provider: "Nominatim".to_string(),
            })
        });

        let service = service(provider, Arc::new(InMemoryCache::default()));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = service.geocode("Berlin", &cancel).await.unwrap_err();
        assert!(err.is_cancellation());
    }

    #[tokio::test]
    async fn differently_spelled_queries_use_separate_entries() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("Nominatim");
        provider
            .expect_geocode()
            .times(2)
            .returning(|_, _| Ok(downing_street()));

        let cache = Arc::new(InMemoryCache::default());
        let service = service(provider, cache.clone());
        let cancel = CancellationToken::new();

        service.geocode("Downing Street", &cancel).await.unwrap();
        let response = service.geocode(" downing street", &cancel).await.unwrap();

        assert!(!response.is_cached());
        assert_eq!(cache.stats().entries, 2);
    }

    #[tokio::test]
    async fn broken_cache_degrades_to_provider() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("Nominatim");
        provider
            .expect_geocode()
            .times(2)
            .returning(|_, _| Ok(downing_street()));

        let service = service(provider, Arc::new(BrokenCache));
        let cancel = CancellationToken::new();

        for _ in 0..2 {
            let response = service.geocode("Downing Street", &cancel).await.unwrap();
            assert!(response.is_success());
            assert!(!response.is_cached());
        }
    }

    #[tokio::test]
    async fn status_includes_cache_counters() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("Nominatim");
        provider
            .expect_geocode()
            .times(1)
            .returning(|_, _| Ok(downing_street()));
        provider
            .expect_status()
            .returning(|_| Ok(provider_status(1)));

        let service = service(provider, Arc::new(InMemoryCache::default()));
        let cancel = CancellationToken::new();

        service.geocode("Downing Street", &cancel).await.unwrap();
        service.geocode("Downing Street", &cancel).await.unwrap();

        let status = service.status(&cancel).await.unwrap();
        assert_eq!(status.requests_total, 1);
        assert_eq!(status.cache_size, 1);
        assert_eq!(status.cache_hits, 1);
        assert_eq!(status.cache_misses, 1);
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn reset_delegates_and_keeps_cache() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("Nominatim");
        provider
            .expect_geocode()
            .times(1)
            .returning(|_, _| Ok(downing_street()));
        provider.expect_reset().times(1).returning(|| Ok(()));

        let service = service(provider, Arc::new(InMemoryCache::default()));
        let cancel = CancellationToken::new();

        service.geocode("Downing Street", &cancel).await.unwrap();
        service.reset().unwrap();

        let response = service.geocode("Downing Street", &cancel).await.unwrap();
        assert!(response.is_cached());
    }

    #[tokio::test]
    async fn concurrent_identical_queries_are_not_coalesced() {
        let provider = Arc::new(SlowProvider::default());
        let service = GeocodingService::new(
            provider.clone(),
            Arc::new(InMemoryCache::default()),
            Duration::from_secs(60),
        );
        let cancel = CancellationToken::new();

        let (a, b) = tokio::join!(
            service.geocode("Downing Street", &cancel),
            service.geocode("Downing Street", &cancel)
        );

        assert!(a.unwrap().is_success());
        assert!(b.unwrap().is_success());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

        let third = service.geocode("Downing Street", &cancel).await.unwrap();
        assert!(third.is_cached());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn accessors() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("Pelias");
        let service = service(provider, Arc::new(InMemoryCache::default()));

        assert_eq!(service.provider_name(), "Pelias");
        assert_eq!(service.cache_ttl(), Duration::from_secs(60));
    }
}
