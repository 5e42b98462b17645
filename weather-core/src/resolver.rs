//! Place name to coordinates.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{error::LookupError, model::ResolvedLocation, provider::GeocodingProvider};

/// Resolves free text to the first geocoding match.
///
/// Multiple matches are not disambiguated: the first candidate wins.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn GeocodingProvider>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn GeocodingProvider>) -> Self {
        Self { geocoder }
    }

    /// Resolve `place_name` to a location.
    ///
    /// An empty name returns [`LookupError::EmptyQuery`] without touching the network.
    pub async fn resolve(&self, place_name: &str) -> Result<ResolvedLocation, LookupError> {
        if place_name.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        debug!(place_name, "geocoding");

        let response = self.geocoder.search(place_name).await?;
        let first = response
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or(LookupError::NotFound)?;

        let location = ResolvedLocation::from(first);
        info!(
            "Resolved '{}' to {} ({:.4}, {:.4}, {})",
            place_name,
            location.display_name,
            location.latitude,
            location.longitude,
            location.timezone
        );

        Ok(location)
    }
}
