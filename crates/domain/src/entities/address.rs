//! Normalized address schema shared by every provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// A geocoded address in the common schema
///
/// Coordinates are WGS84 degrees. Fields the upstream did not supply are
/// empty strings, matching the wire shape clients already consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Street or road name
    #[serde(default)]
    pub street: String,
    /// House number
    #[serde(default)]
    pub number: String,
    /// City, town or locality
    #[serde(default)]
    pub city: String,
    /// State or region
    #[serde(default)]
    pub state: String,
    /// Country name
    #[serde(default)]
    pub country: String,
    /// Postal code
    #[serde(default)]
    pub postal_code: String,
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
    /// When this address was resolved
    pub last_updated: DateTime<Utc>,
}

impl Address {
    /// Create an address at the given coordinates with all text fields empty
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::ValidationError(format!(
                "coordinates out of range: lat={latitude}, lon={longitude}"
            )));
        }

        Ok(Self {
            street: String::new(),
            number: String::new(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
            postal_code: String::new(),
            latitude,
            longitude,
            last_updated: Utc::now(),
        })
    }

    #[must_use]
    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = street.into();
        self
    }

    #[must_use]
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    #[must_use]
    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = postal_code.into();
        self
    }
}
