use serde::Serialize;
use utoipa::ToSchema;

use super::suggestion_list::SuggestionView;
use crate::forecast::DailyForecast;
use crate::weather::models::WeatherSnapshot;

/// What the weather card shows
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct DashboardState {
    pub weather: Option<WeatherSnapshot>,
    pub forecast: Vec<DailyForecast>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DashboardState {
    pub(crate) fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub(crate) fn show(&mut self, weather: WeatherSnapshot, forecast: Vec<DailyForecast>) {
        self.weather = Some(weather);
        self.forecast = forecast;
        self.error = None;
        self.loading = false;
    }

    /// Show an error but keep whatever weather is already on screen
    pub(crate) fn warn(&mut self, message: String) {
        self.error = Some(message);
        self.loading = false;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.weather = None;
        self.forecast.clear();
        self.error = Some(message);
        self.loading = false;
    }
}

/// Everything the page renders, in one payload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardView {
    #[serde(flatten)]
    pub state: DashboardState,
    pub history: Vec<String>,
    pub suggestions: SuggestionView,
}
