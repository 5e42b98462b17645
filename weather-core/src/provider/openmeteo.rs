use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    config::Config,
    error::LookupError,
    model::{DailyForecast, ResolvedLocation},
};

use super::{ForecastProvider, GeocodingProvider, GeocodingResponse};

const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min";

/// Open-Meteo geocoding + forecast client. No API key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    geocoding_base_url: String,
    forecast_base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(config: &Config) -> Result<Self, LookupError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            geocoding_base_url: trim_base(&config.geocoding_base_url),
            forecast_base_url: trim_base(&config.forecast_base_url),
            http: builder.build()?,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        debug!(%url, ?query, "requesting {what}");

        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LookupError::Transport(format!(
                "{what} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<DailyForecast>,
}

#[async_trait]
impl GeocodingProvider for OpenMeteoProvider {
    async fn search(&self, place_name: &str) -> Result<GeocodingResponse, LookupError> {
        let url = format!("{}/search", self.geocoding_base_url);
        self.get_json("Geocoding", &url, &[("name", place_name)]).await
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn daily_forecast(
        &self,
        location: &ResolvedLocation,
    ) -> Result<DailyForecast, LookupError> {
        let url = format!("{}/forecast", self.forecast_base_url);
        let latitude = location.latitude.to_string();
        let longitude = location.longitude.to_string();

        let parsed: ForecastResponse = self
            .get_json(
                "Forecast",
                &url,
                &[
                    ("latitude", latitude.as_str()),
                    ("longitude", longitude.as_str()),
                    ("timezone", location.timezone.as_str()),
                    ("daily", DAILY_FIELDS),
                ],
            )
            .await?;

        parsed.daily.ok_or_else(|| {
            LookupError::Transport("Forecast response contained no daily data".to_string())
        })
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
