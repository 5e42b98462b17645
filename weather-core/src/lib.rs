//! Core library for Classy Weather.
//!
//! This crate defines:
//! - Configuration of the geocoding and forecast endpoints
//! - Abstraction over the HTTP providers (Open-Meteo)
//! - Place resolution and the lookup lifecycle with stale-result dropping
//! - Pure presentation helpers (icons, weekdays, status line)
//!
//! It is used by `classy-weather`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod presenter;
pub mod provider;
pub mod resolver;

use std::sync::Arc;

pub use config::Config;
pub use error::LookupError;
pub use model::{DailyForecast, ForecastDay, ForecastView, RequestState, ResolvedLocation};
pub use orchestrator::{CycleTicket, ForecastOrchestrator};
pub use provider::{ForecastProvider, GeocodingProvider, OpenMeteoProvider};
pub use resolver::LocationResolver;

/// Build an orchestrator talking to Open-Meteo as configured.
pub fn orchestrator_from_config(config: &Config) -> Result<ForecastOrchestrator, LookupError> {
    let provider = Arc::new(OpenMeteoProvider::new(config)?);
    let resolver = LocationResolver::new(provider.clone());

    Ok(ForecastOrchestrator::new(resolver, provider))
}
