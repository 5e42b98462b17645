//! Pure display derivations: icons, weekday labels, rounded temperatures and
//! the status line. No I/O.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::{ForecastDay, ForecastView};

pub const MSG_LOADING: &str = "Fetching details...";
pub const MSG_PROMPT: &str = "Enter the location to fetch weather details";

/// Weather classes of the WMO codes reported by the forecast service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    Clear,
    MostlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Thunder,
    HeavyThunder,
    Unclassified,
}

impl WeatherIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            WeatherIcon::Clear => "☀️",
            WeatherIcon::MostlyClear => "🌤",
            WeatherIcon::PartlyCloudy => "⛅️",
            WeatherIcon::Overcast => "☁️",
            WeatherIcon::Fog => "🌫",
            WeatherIcon::Drizzle => "🌦",
            WeatherIcon::Rain => "🌧",
            WeatherIcon::Snow => "🌨",
            WeatherIcon::Thunder => "🌩",
            WeatherIcon::HeavyThunder => "⛈",
            WeatherIcon::Unclassified => "NOT FOUND",
        }
    }
}

impl std::fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Map a WMO weather code to its icon class.
///
/// Freezing drizzle (56), light rain (61), freezing light rain (66) and light
/// showers (80) share the drizzle icon.
pub fn classify_weather_icon(code: i32) -> WeatherIcon {
    match code {
        0 => WeatherIcon::Clear,
        1 => WeatherIcon::MostlyClear,
        2 => WeatherIcon::PartlyCloudy,
        3 => WeatherIcon::Overcast,
        45 | 48 => WeatherIcon::Fog,
        51 | 56 | 61 | 66 | 80 => WeatherIcon::Drizzle,
        53 | 55 | 57 | 63 | 65 | 67 | 81 | 82 => WeatherIcon::Rain,
        71 | 73 | 75 | 77 | 85 | 86 => WeatherIcon::Snow,
        95 => WeatherIcon::Thunder,
        96 | 99 => WeatherIcon::HeavyThunder,
        _ => WeatherIcon::Unclassified,
    }
}

/// Abbreviated English weekday ("Mon") of an ISO `YYYY-MM-DD` date.
pub fn format_weekday(iso_date: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(iso_date, "%Y-%m-%d")
        .with_context(|| format!("Invalid ISO date: {iso_date}"))?;

    Ok(weekday_label(date).to_string())
}

fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// One rendered forecast row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRow {
    pub icon: WeatherIcon,
    pub weekday: String,
    pub min: i64,
    pub max: i64,
}

impl std::fmt::Display for DayRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  {}  {}° - {}°", self.icon, self.weekday, self.min, self.max)
    }
}

/// Rows for display: minimum floored, maximum ceiled.
///
/// Missing codes are unclassified and missing temperatures show as 0.
pub fn day_rows(days: &[ForecastDay]) -> Vec<DayRow> {
    days.iter()
        .map(|day| DayRow {
            icon: day.weather_code.map_or(WeatherIcon::Unclassified, classify_weather_icon),
            // Dates are validated when the day is built; fall back to the raw text anyway.
            weekday: format_weekday(&day.date).unwrap_or_else(|_| day.date.clone()),
            min: day.min_temp.map_or(0, |t| t.floor() as i64),
            max: day.max_temp.map_or(0, |t| t.ceil() as i64),
        })
        .collect()
}

/// The single status line shown under the input.
pub fn status_message(view: &ForecastView) -> String {
    if view.state.is_loading() {
        return MSG_LOADING.to_string();
    }
    if view.query.is_empty() {
        return MSG_PROMPT.to_string();
    }

    match view.state.error_message() {
        Some(msg) => msg.to_string(),
        None => format!("Weather details for {}", view.display_location),
    }
}

/// Rows to show for `view`; empty while loading, failed, or before the
/// location name is known.
pub fn visible_rows(view: &ForecastView) -> Vec<DayRow> {
    if view.query.is_empty() || view.display_location.is_empty() {
        return Vec::new();
    }
    day_rows(view.state.days())
}

/// Flag emoji for a two-letter ISO country code ("FR" -> 🇫🇷).
///
/// Non-letters are passed through unchanged.
pub fn country_flag(country_code: &str) -> String {
    const REGIONAL_INDICATOR_OFFSET: u32 = 0x1F1E6 - 'A' as u32;

    country_code
        .chars()
        .map(|c| {
            let upper = c.to_ascii_uppercase();
            if upper.is_ascii_uppercase() {
                char::from_u32(upper as u32 + REGIONAL_INDICATOR_OFFSET).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}
