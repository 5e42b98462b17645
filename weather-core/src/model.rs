use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// A place resolved from the first candidate of one geocoding response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub country_code: String,
}

/// One day of the daily forecast.
///
/// Open-Meteo reports `null` for days the model has no data for; those values
/// stay `None` here and are rendered as unclassified / zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// ISO `YYYY-MM-DD`, validated when the day is built.
    pub date: String,
    pub weather_code: Option<i32>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

/// Raw `daily` block of the forecast response: four parallel arrays.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub weathercode: Vec<Option<i32>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
}

impl DailyForecast {
    /// Zip the parallel arrays into per-day records.
    ///
    /// Fails when the arrays differ in length or a date is not `YYYY-MM-DD`.
    pub fn into_days(self) -> Result<Vec<ForecastDay>, LookupError> {
        let n = self.time.len();
        if self.weathercode.len() != n
            || self.temperature_2m_min.len() != n
            || self.temperature_2m_max.len() != n
        {
            return Err(LookupError::MismatchedDaily {
                time: n,
                codes: self.weathercode.len(),
                min: self.temperature_2m_min.len(),
                max: self.temperature_2m_max.len(),
            });
        }

        self.time
            .into_iter()
            .zip(self.weathercode)
            .zip(self.temperature_2m_min.into_iter().zip(self.temperature_2m_max))
            .map(|((date, weather_code), (min_temp, max_temp))| {
                NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                    LookupError::Transport(format!("Invalid forecast date '{date}': {e}"))
                })?;

                Ok(ForecastDay { date, weather_code, min_temp, max_temp })
            })
            .collect()
    }
}

/// Lifecycle of the current lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(ResolvedLocation, Vec<ForecastDay>),
    Failure(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestState::Failure(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn days(&self) -> &[ForecastDay] {
        match self {
            RequestState::Success(_, days) => days,
            _ => &[],
        }
    }
}

/// Everything a renderer needs, published by the orchestrator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastView {
    /// Generation of the query this view belongs to.
    pub generation: u64,
    pub query: String,
    /// Name shown above the rows. Cleared on each input change and set once
    /// geocoding succeeds for the new query.
    pub display_location: String,
    pub state: RequestState,
}

impl ForecastView {
    pub fn location(&self) -> Option<&ResolvedLocation> {
        match &self.state {
            RequestState::Success(location, _) => Some(location),
            _ => None,
        }
    }
}
