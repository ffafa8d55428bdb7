use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const ICON_URL_BASE: &str = "https://openweathermap.org/img/wn";

/// Current conditions for one location, replaced wholesale on every fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    pub fetched_at: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub wind_speed: f64,
    pub condition_id: u32,
    pub description: String,
    pub icon: String,
    pub icon_url: String,
}

/// One raw 3-hour forecast slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastSample {
    /// Unix timestamp (seconds, UTC)
    pub timestamp: i64,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}

/// Current conditions and the raw forecast feed, fetched as a pair
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub weather: WeatherSnapshot,
    pub forecast: Vec<ForecastSample>,
}

pub(crate) fn icon_url(icon: &str, scale: u8) -> String {
    format!("{}/{}@{}x.png", ICON_URL_BASE, icon, scale)
}

// OpenWeatherMap API response types

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentWeatherResponse {
    pub name: String,
    #[serde(default)]
    pub sys: SysInfo,
    pub main: MainInfo,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub wind: WindInfo,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SysInfo {
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MainInfo {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub humidity: u32,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WindInfo {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Condition {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastEntry {
    pub dt: i64,
    pub main: ForecastMain,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastMain {
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderErrorBody {
    #[serde(default)]
    pub message: String,
}

impl From<ForecastEntry> for ForecastSample {
    fn from(entry: ForecastEntry) -> Self {
        let condition = entry.weather.into_iter().next();
        Self {
            timestamp: entry.dt,
            temperature: entry.main.temp,
            description: condition
                .as_ref()
                .map(|c| c.description.clone())
                .unwrap_or_default(),
            icon: condition.map(|c| c.icon).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_entry_without_condition_uses_empty_fields() {
        let entry: ForecastEntry =
            serde_json::from_value(serde_json::json!({ "dt": 1700000000, "main": { "temp": 21.4 } }))
                .unwrap();
        let sample = ForecastSample::from(entry);
        assert_eq!(sample.timestamp, 1700000000);
        assert_eq!(sample.temperature, 21.4);
        assert!(sample.description.is_empty());
        assert!(sample.icon.is_empty());
    }

    #[test]
    fn test_icon_url_scale() {
        assert_eq!(icon_url("03d", 4), "https://openweathermap.org/img/wn/03d@4x.png");
        assert_eq!(icon_url("10n", 2), "https://openweathermap.org/img/wn/10n@2x.png");
    }
}
