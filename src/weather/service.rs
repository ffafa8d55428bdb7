use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use super::models::*;
use crate::error::HttpError;
use crate::impl_into_response;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_UNITS: &str = "metric";

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("API key is missing. Please add your OpenWeatherMap API key to the configuration.")]
    MissingApiKey,

    #[error("City not found. Please try another location.")]
    CityNotFound(String),

    #[error("Invalid API key. Please check your OpenWeatherMap API key.")]
    InvalidApiKey,

    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),

    #[error("{message}")]
    Provider {
        status: StatusCode,
        message: &'static str,
    },

    #[error("Received an unexpected response from the weather provider.")]
    InvalidResponse(String),
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
            Self::CityNotFound(_) => StatusCode::NOT_FOUND,
            Self::Network(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Self::Network(_)
            | Self::InvalidApiKey
            | Self::Provider { .. }
            | Self::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::MissingApiKey => Some("MISSING_API_KEY"),
            Self::CityNotFound(_) => Some("CITY_NOT_FOUND"),
            Self::InvalidApiKey => Some("INVALID_API_KEY"),
            Self::Network(_) => Some("NETWORK_ERROR"),
            Self::Provider { .. } => Some("PROVIDER_ERROR"),
            Self::InvalidResponse(_) => Some("INVALID_RESPONSE"),
        }
    }
}

impl_into_response!(WeatherError);

/// What a request is keyed on
#[derive(Debug, Clone, Copy)]
enum Place<'a> {
    City(&'a str),
    Coords { lat: f64, lon: f64 },
}

impl Place<'_> {
    fn params(&self) -> Vec<(&'static str, String)> {
        match *self {
            Place::City(city) => vec![("q", city.to_string())],
            Place::Coords { lat, lon } => vec![("lat", lat.to_string()), ("lon", lon.to_string())],
        }
    }

    fn describe(&self) -> String {
        match *self {
            Place::City(city) => city.to_string(),
            Place::Coords { lat, lon } => format!("{},{}", lat, lon),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Weather,
    Forecast,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Weather => "weather",
            Endpoint::Forecast => "forecast",
        }
    }

    fn failure_message(self, place: &Place<'_>) -> &'static str {
        match (self, place) {
            (Endpoint::Weather, Place::City(_)) => "Failed to fetch weather data. Please try again.",
            (Endpoint::Weather, Place::Coords { .. }) => {
                "Failed to fetch weather data for your location."
            }
            (Endpoint::Forecast, Place::City(_)) => "Failed to fetch forecast data.",
            (Endpoint::Forecast, Place::Coords { .. }) => {
                "Failed to fetch forecast data for your location."
            }
        }
    }

    /// Only the city lookup of current conditions reports 404 and 401 as
    /// such; every other call folds them into its failure message.
    fn classifies_status(self, place: &Place<'_>) -> bool {
        matches!((self, place), (Endpoint::Weather, Place::City(_)))
    }
}

/// The weather operations the dashboard depends on
#[async_trait]
pub trait WeatherApi: Send + Sync {
    fn is_api_key_available(&self) -> bool;

    async fn weather_and_forecast(&self, city: &str) -> Result<WeatherReport, WeatherError>;

    async fn weather_by_coords(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError>;
}

/// OpenWeatherMap client for current conditions and the 5 day / 3 hour forecast
pub struct WeatherService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    units: String,
    timeout: Duration,
}

impl WeatherService {
    pub fn new(client: Client, api_key: Option<&str>) -> Self {
        Self {
            client,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            base_url: DEFAULT_BASE_URL.to_string(),
            units: DEFAULT_UNITS.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_api_key_available(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn get_current_weather(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let data = self.fetch(Endpoint::Weather, Place::City(city)).await?;
        to_snapshot(data)
    }

    pub async fn get_current_weather_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let data = self
            .fetch(Endpoint::Weather, Place::Coords { lat, lon })
            .await?;
        to_snapshot(data)
    }

    pub async fn get_forecast(&self, city: &str) -> Result<Vec<ForecastSample>, WeatherError> {
        let data: ForecastResponse = self.fetch(Endpoint::Forecast, Place::City(city)).await?;
        Ok(data.list.into_iter().map(ForecastSample::from).collect())
    }

    pub async fn get_forecast_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Vec<ForecastSample>, WeatherError> {
        let data: ForecastResponse = self
            .fetch(Endpoint::Forecast, Place::Coords { lat, lon })
            .await?;
        Ok(data.list.into_iter().map(ForecastSample::from).collect())
    }

    /// Current weather, then the forecast once the first call succeeded
    pub async fn get_weather_and_forecast(
        &self,
        city: &str,
    ) -> Result<WeatherReport, WeatherError> {
        let weather = self.get_current_weather(city).await?;
        let forecast = self.get_forecast(city).await?;
        Ok(WeatherReport { weather, forecast })
    }

    pub async fn get_weather_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherReport, WeatherError> {
        let weather = self.get_current_weather_by_coords(lat, lon).await?;
        let forecast = self.get_forecast_by_coords(lat, lon).await?;
        Ok(WeatherReport { weather, forecast })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        place: Place<'_>,
    ) -> Result<T, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        tracing::debug!(
            endpoint = endpoint.path(),
            place = %place.describe(),
            units = %self.units,
            "Fetching weather data"
        );

        let mut params = place.params();
        params.push(("appid", api_key.to_string()));
        params.push(("units", self.units.clone()));

        // Query builder handles URL encoding of spaces and special chars
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint.path()))
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(WeatherError::Network)?;

        let status = response.status();
        tracing::debug!(status = %status, "Received weather API response");

        if endpoint.classifies_status(&place) {
            if status == StatusCode::NOT_FOUND {
                return Err(WeatherError::CityNotFound(place.describe()));
            }
            if status == StatusCode::UNAUTHORIZED {
                return Err(WeatherError::InvalidApiKey);
            }
        }

        if !status.is_success() {
            let body: Option<ProviderErrorBody> = response.json().await.ok();
            tracing::warn!(
                status = %status,
                provider_message = body.as_ref().map(|b| b.message.as_str()).unwrap_or_default(),
                "Weather provider returned an error"
            );
            return Err(WeatherError::Provider {
                status,
                message: endpoint.failure_message(&place),
            });
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponse(e.to_string()))
    }
}

fn to_snapshot(data: CurrentWeatherResponse) -> Result<WeatherSnapshot, WeatherError> {
    let condition = data.weather.into_iter().next().ok_or_else(|| {
        WeatherError::InvalidResponse("No weather information available".to_string())
    })?;

    let snapshot = WeatherSnapshot {
        city: data.name,
        country: data.sys.country.unwrap_or_default(),
        fetched_at: Utc::now(),
        temperature: data.main.temp,
        feels_like: data.main.feels_like.unwrap_or(data.main.temp),
        humidity: data.main.humidity,
        wind_speed: data.wind.speed,
        condition_id: condition.id,
        description: condition.description,
        icon_url: icon_url(&condition.icon, 4),
        icon: condition.icon,
    };

    tracing::info!(city = %snapshot.city, temp = %snapshot.temperature, "Weather data fetched successfully");

    Ok(snapshot)
}

#[async_trait]
impl WeatherApi for WeatherService {
    fn is_api_key_available(&self) -> bool {
        WeatherService::is_api_key_available(self)
    }

    async fn weather_and_forecast(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        self.get_weather_and_forecast(city).await
    }

    async fn weather_by_coords(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError> {
        self.get_weather_by_coords(lat, lon).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn current_body(name: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "sys": { "country": "IN" },
            "main": { "temp": 31.2, "feels_like": 35.8, "humidity": 70, "pressure": 1008 },
            "wind": { "speed": 4.6 },
            "weather": [{ "id": 721, "main": "Haze", "description": "haze", "icon": "50d" }]
        })
    }

    fn forecast_body() -> serde_json::Value {
        serde_json::json!({
            "cnt": 2,
            "list": [
                { "dt": 1700000000, "main": { "temp": 28.0 }, "weather": [{ "id": 800, "description": "clear sky", "icon": "01d" }] },
                { "dt": 1700010800, "main": { "temp": 30.5 }, "weather": [{ "id": 801, "description": "few clouds", "icon": "02d" }] }
            ]
        })
    }

    fn service(server: &MockServer) -> WeatherService {
        WeatherService::new(Client::new(), Some("test-key")).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_current_weather_by_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Mumbai"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Mumbai")))
            .expect(1)
            .mount(&server)
            .await;

        let weather = service(&server).get_current_weather("Mumbai").await.unwrap();

        assert_eq!(weather.city, "Mumbai");
        assert_eq!(weather.country, "IN");
        assert_eq!(weather.temperature, 31.2);
        assert_eq!(weather.feels_like, 35.8);
        assert_eq!(weather.humidity, 70);
        assert_eq!(weather.wind_speed, 4.6);
        assert_eq!(weather.condition_id, 721);
        assert_eq!(weather.description, "haze");
        assert_eq!(weather.icon, "50d");
    }

    #[tokio::test]
    async fn test_coordinates_are_sent_as_lat_lon() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("lat", "18.52"))
            .and(query_param("lon", "73.85"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .expect(1)
            .mount(&server)
            .await;

        let forecast = service(&server)
            .get_forecast_by_coords(18.52, 73.85)
            .await
            .unwrap();

        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast[1].timestamp, 1700010800);
        assert_eq!(forecast[1].description, "few clouds");
    }

    #[tokio::test]
    async fn test_unknown_city_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&server)
            .await;

        let err = service(&server)
            .get_current_weather("Atlantis")
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::CityNotFound(ref c) if c == "Atlantis"));
        assert_eq!(err.to_string(), "City not found. Please try another location.");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_network_error() {
        // Bind then release a port so nothing is listening on it
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = WeatherService::new(Client::new(), Some("test-key"))
            .with_base_url(format!("http://{}", addr))
            .get_current_weather("Atlantis")
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Network(_)));
        assert_eq!(err.to_string(), "Network error. Please check your connection.");
        assert_ne!(
            err.to_string(),
            WeatherError::CityNotFound("Atlantis".to_string()).to_string()
        );
    }

    #[tokio::test]
    async fn test_rejected_key_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = service(&server).get_current_weather("Delhi").await.unwrap_err();

        assert!(matches!(err, WeatherError::InvalidApiKey));
        assert_eq!(err.error_code(), Some("INVALID_API_KEY"));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out_as_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(current_body("Goa"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let err = service(&server)
            .with_timeout(Duration::from_millis(50))
            .get_current_weather("Goa")
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Network(_)));
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_not_found_and_auth_only_classified_for_city_weather() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("lat", "28.6"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let service = service(&server);

        let forecast = service.get_forecast("Delhi").await.unwrap_err();
        let by_coords = service
            .get_current_weather_by_coords(28.6, 77.2)
            .await
            .unwrap_err();

        assert_eq!(forecast.to_string(), "Failed to fetch forecast data.");
        assert_eq!(
            by_coords.to_string(),
            "Failed to fetch weather data for your location."
        );
        assert!(matches!(by_coords, WeatherError::Provider { status, .. } if status == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_other_failures_use_operation_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let service = service(&server);

        let by_city = service.get_current_weather("Delhi").await.unwrap_err();
        let by_coords = service
            .get_current_weather_by_coords(28.6, 77.2)
            .await
            .unwrap_err();
        let forecast = service.get_forecast("Delhi").await.unwrap_err();
        let forecast_coords = service
            .get_forecast_by_coords(28.6, 77.2)
            .await
            .unwrap_err();

        assert_eq!(
            by_city.to_string(),
            "Failed to fetch weather data. Please try again."
        );
        assert_eq!(
            by_coords.to_string(),
            "Failed to fetch weather data for your location."
        );
        assert_eq!(forecast.to_string(), "Failed to fetch forecast data.");
        assert_eq!(
            forecast_coords.to_string(),
            "Failed to fetch forecast data for your location."
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let service = WeatherService::new(Client::new(), None).with_base_url(server.uri());

        assert!(!service.is_api_key_available());
        let err = service.get_weather_and_forecast("Delhi").await.unwrap_err();
        assert!(matches!(err, WeatherError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_blank_api_key_counts_as_missing() {
        let service = WeatherService::new(Client::new(), Some("  "));
        assert!(!service.is_api_key_available());
    }

    #[tokio::test]
    async fn test_composite_fetches_both() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Pune")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Pune"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let report = service(&server).get_weather_and_forecast("Pune").await.unwrap();

        assert_eq!(report.weather.city, "Pune");
        assert_eq!(report.forecast.len(), 2);
    }

    #[tokio::test]
    async fn test_composite_skips_forecast_after_weather_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .expect(0)
            .mount(&server)
            .await;

        let err = service(&server)
            .get_weather_and_forecast("Nowhere")
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::CityNotFound(_)));
    }

    #[tokio::test]
    async fn test_payload_without_conditions_is_invalid() {
        let server = MockServer::start().await;
        let mut body = current_body("Goa");
        body["weather"] = serde_json::json!([]);
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = service(&server).get_current_weather("Goa").await.unwrap_err();

        assert!(matches!(err, WeatherError::InvalidResponse(_)));
    }
}
