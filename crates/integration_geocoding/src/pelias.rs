//! Pelias provider
//!
//! Queries `{base}/v1/search?text=..&size=1` and maps the first feature of the
//! returned GeoJSON FeatureCollection. Coordinates arrive as `[lon, lat]`.

use async_trait::async_trait;
use domain::{Address, GeocodeResponse, ProviderKind, ServerStatus};
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use url::Url;

use crate::{
    GeocodingConfig, GeocodingError,
    provider::{GeocodingProvider, ProviderCore, address_at},
};

/// Pelias API response structures
mod api {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct FeatureCollection {
        #[serde(default)]
        pub features: Vec<Feature>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Feature {
        pub geometry: Geometry,
        #[serde(default)]
        pub properties: Properties,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        pub coordinates: Vec<f64>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct Properties {
        pub street: Option<String>,
        pub housenumber: Option<String>,
        pub locality: Option<String>,
        pub region: Option<String>,
        pub country: Option<String>,
        pub postalcode: Option<String>,
    }
}

/// Geocoding provider backed by a Pelias instance
#[derive(Debug)]
pub struct PeliasProvider {
    core: ProviderCore,
}

impl PeliasProvider {
    /// Create a provider from the Pelias settings in `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid, the request rate is zero,
    /// or the HTTP client cannot be initialized.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        let core = ProviderCore::new(
            ProviderKind::Pelias,
            &config.pelias_url,
            "v1/search",
            config.pelias_requests_per_second,
            config.timeout_secs,
            &config.user_agent,
        )?;
        Ok(Self { core })
    }

    fn add_params(url: &mut Url, query: &str) {
        url.query_pairs_mut()
            .append_pair("text", query)
            .append_pair("size", "1");
    }

    fn parse(body: &[u8]) -> Result<Option<Address>, GeocodingError> {
        let collection: api::FeatureCollection =
            serde_json::from_slice(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let Some(feature) = collection.features.into_iter().next() else {
            return Ok(None);
        };

        let [longitude, latitude, ..] = feature.geometry.coordinates[..] else {
            return Err(GeocodingError::ParseError(format!(
                "expected [lon, lat] coordinates, got {} values",
                feature.geometry.coordinates.len()
            )));
        };

        let props = feature.properties;
        Ok(Some(
            address_at(latitude, longitude)?
                .with_street(props.street.unwrap_or_default())
                .with_number(props.housenumber.unwrap_or_default())
                .with_city(props.locality.unwrap_or_default())
                .with_state(props.region.unwrap_or_default())
                .with_country(props.country.unwrap_or_default())
                .with_postal_code(props.postalcode.unwrap_or_default()),
        ))
    }
}

#[async_trait]
impl GeocodingProvider for PeliasProvider {
    #[instrument(level = "debug", skip(self, cancel), fields(provider = "pelias"))]
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
