use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::LookupError,
    model::{DailyForecast, ResolvedLocation},
};

pub mod openmeteo;

pub use openmeteo::OpenMeteoProvider;

/// Body of `GET /search?name=...`. `results` is absent when nothing matched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodingResponse {
    pub results: Option<Vec<GeocodingCandidate>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodingCandidate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    /// Absent for some places (oceans, disputed areas); empty then.
    #[serde(default)]
    pub country_code: String,
}

impl From<GeocodingCandidate> for ResolvedLocation {
    fn from(c: GeocodingCandidate) -> Self {
        ResolvedLocation {
            display_name: c.name,
            latitude: c.latitude,
            longitude: c.longitude,
            timezone: c.timezone,
            country_code: c.country_code,
        }
    }
}

/// Forward geocoding: free text to candidate places.
#[async_trait]
pub trait GeocodingProvider: Send + Sync + Debug {
    async fn search(&self, place_name: &str) -> Result<GeocodingResponse, LookupError>;
}

/// Daily forecast for an already resolved place.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn daily_forecast(&self, location: &ResolvedLocation)
    -> Result<DailyForecast, LookupError>;
}
