use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use super::debounce::{SuggestionDebouncer, DEFAULT_DEBOUNCE};
use super::geolocation::Geolocator;
use super::state::{DashboardState, DashboardView};
use super::suggestion_list::{ListKey, SuggestionList};
use crate::forecast::daily_forecasts;
use crate::history::HistoryStorage;
use crate::suggestions::{CitySuggestion, SuggestionApi};
use crate::weather::models::WeatherReport;
use crate::weather::{WeatherApi, WeatherError};

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    /// Zone used to group forecast samples into days
    pub timezone: Tz,
    pub debounce: Duration,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Drives one dashboard session: searches, geolocation, suggestions and history.
///
/// Searches are not cancelled by newer ones; whichever response arrives last
/// is what the dashboard shows.
pub struct DashboardController {
    weather: Arc<dyn WeatherApi>,
    timezone: Tz,
    state: RwLock<DashboardState>,
    history: Mutex<HistoryStorage>,
    suggestions: Arc<Mutex<SuggestionList>>,
    debouncer: Mutex<SuggestionDebouncer>,
}

impl DashboardController {
    pub fn new(
        weather: Arc<dyn WeatherApi>,
        suggestion_api: Arc<dyn SuggestionApi>,
        history: HistoryStorage,
        settings: DashboardSettings,
    ) -> Self {
        let suggestions = Arc::new(Mutex::new(SuggestionList::default()));
        let debouncer =
            SuggestionDebouncer::new(suggestion_api, Arc::clone(&suggestions), settings.debounce);

        Self {
            weather,
            timezone: settings.timezone,
            state: RwLock::new(DashboardState::default()),
            history: Mutex::new(history),
            suggestions,
            debouncer: Mutex::new(debouncer),
        }
    }

    /// Load the stored history and check the weather credential
    pub async fn startup(&self) {
        self.history.lock().await.load().await;

        if !self.ensure_api_key().await {
            tracing::warn!("No OpenWeatherMap API key configured, weather lookups are disabled");
        }
    }

    pub async fn search(&self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            tracing::debug!("Ignoring blank search");
            return;
        }
        if !self.ensure_api_key().await {
            return;
        }

        tracing::info!(city = %city, "Searching weather");
        self.state.write().await.begin_fetch();

        let result = self.weather.weather_and_forecast(city).await;
        self.apply(result, Some(city)).await;
    }

    pub async fn refresh(&self, city: &str) {
        self.search(city).await;
    }

    /// Look up the weather at the device position. Failures are not retried.
    pub async fn use_my_location(&self, geolocator: &dyn Geolocator) {
        if !self.ensure_api_key().await {
            return;
        }

        self.state.write().await.begin_fetch();

        match geolocator.current_position().await {
            Ok(position) => {
                tracing::info!(
                    lat = %position.latitude,
                    lon = %position.longitude,
                    "Fetching weather for device position"
                );
                let result = self
                    .weather
                    .weather_by_coords(position.latitude, position.longitude)
                    .await;
                self.apply(result, None).await;
            }
            Err(e) => {
                tracing::warn!(error = ?e, "Device position unavailable");
                self.state.write().await.warn(e.to_string());
            }
        }
    }

    /// Search box text changed
    pub async fn input(&self, term: &str) {
        self.suggestions.lock().await.focus();
        self.debouncer.lock().await.input(term);
    }

    pub async fn focus(&self) {
        self.suggestions.lock().await.focus();
    }

    pub async fn blur(&self) {
        self.suggestions.lock().await.blur();
    }

    /// Outside click, or the page closing the dropdown itself
    pub async fn dismiss_suggestions(&self) {
        self.suggestions.lock().await.dismiss();
    }

    /// Keyboard navigation; Enter on a highlighted entry searches it
    pub async fn suggestion_key(&self, key: ListKey) -> Option<CitySuggestion> {
        let committed = self.suggestions.lock().await.handle_key(key);
        self.commit(committed).await
    }

    /// Click on the suggestion at `index`
    pub async fn select_suggestion(&self, index: usize) -> Option<CitySuggestion> {
        let committed = self.suggestions.lock().await.select(index);
        self.commit(committed).await
    }

    pub async fn state(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub async fn history(&self) -> Vec<String> {
        self.history.lock().await.entries().to_vec()
    }

    pub async fn view(&self) -> DashboardView {
        DashboardView {
            state: self.state().await,
            history: self.history().await,
            suggestions: self.suggestions.lock().await.view(),
        }
    }

    async fn commit(&self, committed: Option<CitySuggestion>) -> Option<CitySuggestion> {
        if let Some(city) = &committed {
            tracing::debug!(city = %city.full_name, "Suggestion selected");
            self.search(&city.name).await;
        }
        committed
    }

    async fn ensure_api_key(&self) -> bool {
        if self.weather.is_api_key_available() {
            return true;
        }
        self.state
            .write()
            .await
            .fail(WeatherError::MissingApiKey.to_string());
        false
    }

    /// Store a finished fetch. History is keyed by the searched name, or by
    /// the provider's city name for coordinate lookups.
    async fn apply(&self, result: Result<WeatherReport, WeatherError>, searched: Option<&str>) {
        match result {
            Ok(report) => {
                let daily = daily_forecasts(&report.forecast, &self.timezone);
                let key = searched.unwrap_or(&report.weather.city).to_string();

                self.state.write().await.show(report.weather, daily);

                if let Err(e) = self.history.lock().await.add(&key).await {
                    tracing::warn!(city = %key, error = %e, "Failed to persist search history");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Weather lookup failed");
                self.state.write().await.fail(e.to_string());
            }
        }
    }
}
