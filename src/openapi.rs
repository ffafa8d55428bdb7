use axum::Json;
use utoipa::OpenApi;

use crate::dashboard::{DashboardState, DashboardView, Position, SuggestionView};
use crate::error::ErrorResponse;
use crate::forecast::DailyForecast;
use crate::suggestions::CitySuggestion;
use crate::weather::handlers::WeatherView;
use crate::weather::{ForecastSample, WeatherSnapshot};

/// OpenAPI documentation for the Skycast API
///
/// Schema-only for now; handlers carry no path annotations.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skycast API",
        version = "0.1.0",
        description = "City weather dashboard backed by OpenWeatherMap, with GeoNames city suggestions and a persisted search history.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    tags(
        (name = "weather", description = "Current weather and five-day outlook"),
        (name = "suggestions", description = "City name autocomplete"),
        (name = "dashboard", description = "Interactive dashboard session")
    ),
    components(
        schemas(
            ErrorResponse,
            WeatherSnapshot,
            ForecastSample,
            DailyForecast,
            WeatherView,
            CitySuggestion,
            Position,
            SuggestionView,
            DashboardState,
            DashboardView,
        )
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
