pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod history;
pub mod openapi;
pub mod routes;
pub mod suggestions;
pub mod weather;

use anyhow::Context;
use chrono_tz::Tz;
use reqwest::Client;
use std::{sync::Arc, time::Duration};

use crate::config::AppConfig;
use crate::dashboard::{DashboardController, DashboardSettings};
use crate::history::HistoryStorage;
use crate::suggestions::LocationService;
use crate::weather::WeatherService;

/// Shared HTTP client configuration
const HTTP_TIMEOUT_SECS: u64 = 30;
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
    pub location_service: Arc<LocationService>,
    pub dashboard: Arc<DashboardController>,
    pub timezone: Tz,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire up both provider clients and the dashboard session.
    ///
    /// The dashboard is not started; call [`DashboardController::startup`]
    /// before serving.
    pub fn from_config(config: AppConfig, http_client: Client) -> anyhow::Result<Self> {
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid timezone {:?}: {}", config.timezone, e))?;

        let weather_service = Arc::new(
            WeatherService::new(http_client.clone(), config.weather_api_key())
                .with_base_url(&config.weather.base_url)
                .with_units(&config.units)
                .with_timeout(Duration::from_secs(config.weather.timeout_secs)),
        );

        let location_service = Arc::new(
            LocationService::new(http_client, config.geonames_username())
                .with_base_url(&config.suggestions.base_url)
                .with_country(&config.suggestions.country)
                .with_max_results(config.suggestions.max_results)
                .with_timeout(Duration::from_millis(config.suggestions.timeout_ms)),
        );
        if config.geonames_username().is_none() {
            tracing::warn!("GeoNames username not set, city suggestions are disabled");
        }

        let history = HistoryStorage::new(&config.history.file_path, config.history.max_items);
        let dashboard = Arc::new(DashboardController::new(
            Arc::clone(&weather_service) as Arc<dyn weather::WeatherApi>,
            Arc::clone(&location_service) as Arc<dyn suggestions::SuggestionApi>,
            history,
            DashboardSettings {
                timezone,
                debounce: Duration::from_millis(config.suggestions.debounce_ms),
            },
        ));

        Ok(Self {
            weather_service,
            location_service,
            dashboard,
            timezone,
            config: Arc::new(config),
        })
    }
}

/// Create shared HTTP client with connection pooling
pub fn create_http_client() -> anyhow::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
        .context("Failed to create HTTP client")
}
