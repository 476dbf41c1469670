//! Nominatim provider
//!
//! Queries `{base}/search?q=..&format=json&addressdetails=1&limit=1` and maps
//! the first element of the returned JSON array.

use async_trait::async_trait;
use domain::{Address, GeocodeResponse, ProviderKind, ServerStatus};
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use url::Url;

use crate::{
    GeocodingConfig, GeocodingError,
    provider::{GeocodingProvider, ProviderCore, address_at},
};

/// Nominatim API response structures
mod api {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct Place {
        pub lat: String,
        pub lon: String,
        #[serde(default)]
        pub address: PlaceAddress,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct PlaceAddress {
        pub road: Option<String>,
        pub house_number: Option<String>,
        pub city: Option<String>,
        pub town: Option<String>,
        pub village: Option<String>,
        pub state: Option<String>,
        pub country: Option<String>,
        pub postcode: Option<String>,
    }
}

/// Geocoding provider backed by a Nominatim instance
#[derive(Debug)]
pub struct NominatimProvider {
    core: ProviderCore,
}

impl NominatimProvider {
    /// Create a provider from the Nominatim settings in `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid, the request rate is zero,
    /// or the HTTP client cannot be initialized.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        let core = ProviderCore::new(
            ProviderKind::Nominatim,
            &config.nominatim_url,
            "search",
            config.nominatim_requests_per_second,
            config.timeout_secs,
            &config.user_agent,
        )?;
        Ok(Self { core })
    }

    fn add_params(url: &mut Url, query: &str) {
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("addressdetails", "1")
            .append_pair("limit", "1");
    }

    fn parse(body: &[u8]) -> Result<Option<Address>, GeocodingError> {
        let places: Vec<api::Place> =
            serde_json::from_slice(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude: f64 = place
            .lat
            .trim()
            .parse()
            .map_err(|_| GeocodingError::ParseError(format!("invalid latitude: {}", place.lat)))?;
        let longitude: f64 = place
            .lon
            .trim()
            .parse()
            .map_err(|_| GeocodingError::ParseError(format!("invalid longitude: {}", place.lon)))?;

        let details = place.address;
        let city = details
            .city
            .or(details.town)
            .or(details.village)
            .unwrap_or_default();

        Ok(Some(
            address_at(latitude, longitude)?
                .with_street(details.road.unwrap_or_default())
                .with_number(details.house_number.unwrap_or_default())
                .with_city(city)
                .with_state(details.state.unwrap_or_default())
                .with_country(details.country.unwrap_or_default())
                .with_postal_code(details.postcode.unwrap_or_default()),
        ))
    }
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    #[instrument(level = "debug", skip(self, cancel), fields(provider = "nominatim"))]
    async fn geocode(
        &self,
        cancel: &CancellationToken,
        query: &str,
    ) -> Result<GeocodeResponse, GeocodingError> {
        self.core
            .geocode(cancel, query, Self::add_params, Self::parse)
            .await
    }

    fn name(&self) -> &'static str {
        self.core.name()
    }

    async fn status(&self, cancel: &CancellationToken) -> Result<ServerStatus, GeocodingError> {
        self.core.status(cancel)
    }

    fn reset(&self) -> Result<(), GeocodingError> {
        self.core.reset();
        Ok(())
    }
}
