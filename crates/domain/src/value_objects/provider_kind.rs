//! Provider kind - Identifies the upstream geocoding backend

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Supported upstream geocoding backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ProviderKind {
    /// OpenStreetMap Nominatim (`/search`, flat JSON array)
    #[default]
    Nominatim,
    /// Pelias (`/v1/search`, GeoJSON FeatureCollection)
    Pelias,
}

impl ProviderKind {
    /// Get the display name reported as the response `source`
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Nominatim => "Nominatim",
            Self::Pelias => "Pelias",
        }
    }

    /// Get the config key for this provider
    #[must_use]
    pub const fn config_key(&self) -> &'static str {
        match self {
            Self::Nominatim => "nominatim",
            Self::Pelias => "pelias",
        }
    }

    /// Default outbound request ceiling for this backend
    #[must_use]
    pub const fn default_requests_per_second(&self) -> u32 {
        match self {
            Self::Nominatim => 5,
            Self::Pelias => 10,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nominatim" => Ok(Self::Nominatim),
            "pelias" => Ok(Self::Pelias),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

impl TryFrom<String> for ProviderKind {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
