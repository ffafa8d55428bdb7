use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::models::{WeatherReport, WeatherSnapshot};
use super::service::WeatherError;
use crate::error::{check_coordinates, InputError};
use crate::forecast::{daily_forecasts, DailyForecast};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CoordsQuery {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions plus the reduced five-day outlook
#[derive(Debug, Serialize, ToSchema)]
pub struct WeatherView {
    pub weather: WeatherSnapshot,
    pub forecast: Vec<DailyForecast>,
}

impl WeatherView {
    fn from_report(report: WeatherReport, state: &AppState) -> Self {
        Self {
            forecast: daily_forecasts(&report.forecast, &state.timezone),
            weather: report.weather,
        }
    }
}

/// Handler failures: bad input or a failed provider call
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Weather(#[from] WeatherError),
}

impl axum::response::IntoResponse for LookupError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Input(e) => e.into_response(),
            Self::Weather(e) => e.into_response(),
        }
    }
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/v1/weather/{city}
pub async fn get_weather_by_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<WeatherView>, LookupError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(InputError::BlankCity.into());
    }

    let report = state.weather_service.get_weather_and_forecast(city).await?;
    Ok(Json(WeatherView::from_report(report, &state)))
}

/// GET /api/v1/weather?lat=18.52&lon=73.85
pub async fn get_weather_by_coords(
    State(state): State<AppState>,
    Query(query): Query<CoordsQuery>,
) -> Result<Json<WeatherView>, LookupError> {
    check_coordinates(query.lat, query.lon)?;

    let report = state
        .weather_service
        .get_weather_by_coords(query.lat, query.lon)
        .await?;
    Ok(Json(WeatherView::from_report(report, &state)))
}
