//! Geocoding provider trait and the request pipeline shared by every backend

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use domain::{Address, GeocodeResponse, ProviderKind, ServerStatus};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::{GeocodingError, ProviderMetrics, RateLimiter};

/// An upstream geocoding backend
///
/// Each implementation owns its own rate limiter and metrics, so separate
/// instances never share state.
#[async_trait]
pub trait GeocodingProvider: Send + Sync + std::fmt::Debug {
    /// Resolve a free-text query to its best matching address
    ///
    /// Blank queries and queries without candidates resolve to an
    /// unsuccessful response rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if admission is cancelled, the upstream is
    /// unreachable, answers with a non-2xx status, or sends an undecodable
    /// body.
    async fn geocode(
        &self,
        cancel: &CancellationToken,
        query: &str,
    ) -> Result<GeocodeResponse, GeocodingError>;

    /// Provider name reported as the response source
    fn name(&self) -> &'static str;

    /// Snapshot of this provider's counters
    ///
    /// Cache counters are always zero at this level.
    async fn status(&self, cancel: &CancellationToken) -> Result<ServerStatus, GeocodingError>;

    /// Zero this provider's counters
    ///
    /// Outstanding rate limiter slots keep draining on their own schedule.
    fn reset(&self) -> Result<(), GeocodingError>;
}

/// HTTP client, limiter and counters behind one provider instance
#[derive(Debug)]
pub(crate) struct ProviderCore {
    kind: ProviderKind,
    client: Client,
    endpoint: Url,
    limiter: RateLimiter,
    metrics: ProviderMetrics,
    timeout_secs: u64,
}

impl ProviderCore {
    /// Build the core for `kind`, searching at `{base_url}/{search_path}`
    pub(crate) fn new(
        kind: ProviderKind,
        base_url: &str,
        search_path: &str,
        requests_per_second: u32,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GeocodingError> {
        let endpoint = format!("{}/{search_path}", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            GeocodingError::Configuration(format!("invalid {} URL {base_url}: {e}", kind.config_key()))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            kind,
            client,
            endpoint,
            limiter: RateLimiter::new(requests_per_second)?,
            metrics: ProviderMetrics::new(),
            timeout_secs,
        })
    }

    pub(crate) const fn name(&self) -> &'static str {
        self.kind.display_name()
    }

    pub(crate) const fn metrics(&self) -> &ProviderMetrics {
        &self.metrics
    }

    #[cfg(test)]
    pub(crate) const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Run one geocode attempt
    ///
    /// `add_params` appends the backend's query string to the search endpoint
    /// and `parse` extracts the best match from a 2xx body.
    pub(crate) async fn geocode<F, P>(
        &self,
        cancel: &CancellationToken,
        query: &str,
        add_params: F,
        parse: P,
    ) -> Result<GeocodeResponse, GeocodingError>
    where
        F: FnOnce(&mut Url, &str) + Send,
        P: FnOnce(&[u8]) -> Result<Option<Address>, GeocodingError> + Send,
    {
        let start = Instant::now();
        self.metrics.record_request();

        let query = query.trim();
        if query.is_empty() {
            debug!(provider = self.name(), "Rejecting empty query");
            return Ok(GeocodeResponse::empty_query(self.name()));
        }

        self.limiter
            .admit(cancel)
            .await
            .map_err(|_| GeocodingError::RateLimited {
                provider: self.name().to_string(),
            })?;

        let mut url = self.endpoint.clone();
        add_params(&mut url, query);

        let outcome = match self.fetch(cancel, url).await {
            Ok(body) => parse(&body[..]),
            Err(e) => Err(e),
        };

        let elapsed = start.elapsed();
        self.metrics.record_elapsed(elapsed);

        match outcome {
            Ok(Some(address)) => {
                debug!(
                    provider = self.name(),
                    lat = address.latitude,
                    lon = address.longitude,
                    elapsed_ms = elapsed.as_millis(),
                    "Geocoded query"
                );
                Ok(GeocodeResponse::success(
                    address,
                    self.name(),
                    elapsed.as_secs_f64(),
                ))
            },
            Ok(None) => {
                debug!(provider = self.name(), "Upstream returned no candidates");
                Ok(GeocodeResponse::no_results(self.name()))
            },
            Err(e) => {
                if !e.is_cancellation() {
                    self.metrics.record_error();
                }
                warn!(provider = self.name(), error = %e, "Geocoding request failed");
                Err(e)
            },
        }
    }

    /// GET `url` and return the body of a 2xx response
    async fn fetch(&self, cancel: &CancellationToken, url: Url) -> Result<Bytes, GeocodingError> {
        let request = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| GeocodingError::from_transport(&e, self.timeout_secs))?;

            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| GeocodingError::from_transport(&e, self.timeout_secs))?;

            if !status.is_success() {
                return Err(GeocodingError::UpstreamStatus {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&body).trim().to_string(),
                });
            }

            Ok(body)
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(GeocodingError::Cancelled),
            result = request => result,
        }
    }

    pub(crate) fn status(&self, cancel: &CancellationToken) -> Result<ServerStatus, GeocodingError> {
        if cancel.is_cancelled() {
            return Err(GeocodingError::Cancelled);
        }

        let snapshot = self.metrics.snapshot();
        Ok(ServerStatus {
            status: "active".to_string(),
            provider: self.name().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime: snapshot.seconds_since_last_request(),
            start_time: snapshot.last_request,
            cache_size: 0,
            cache_hits: 0,
            cache_misses: 0,
            requests_total: snapshot.requests,
            errors_total: snapshot.errors,
            average_time: snapshot.average_time(),
        })
    }

    pub(crate) fn reset(&self) {
        self.metrics.reset();
        debug!(provider = self.name(), "Provider metrics reset");
    }
}

/// Map a coordinate pair into an address, rejecting out-of-range values
pub(crate) fn address_at(latitude: f64, longitude: f64) -> Result<Address, GeocodingError> {
    Address::new(latitude, longitude).map_err(|e| GeocodingError::ParseError(e.to_string()))
}
