use axum::{
    routing::{get, post},
    Router,
};

use crate::dashboard::handlers as dashboard_handlers;
use crate::history::handlers as history_handlers;
use crate::openapi::openapi_json;
use crate::suggestions::handlers as suggestions_handlers;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Build the weather API routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/weather", get(weather_handlers::get_weather_by_coords))
        .route("/weather/{city}", get(weather_handlers::get_weather_by_city))
}

fn lookup_routes() -> Router<AppState> {
    Router::new()
        .route("/suggestions", get(suggestions_handlers::get_suggestions))
        .route("/history", get(history_handlers::get_history))
}

/// Build the dashboard session routes
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard_handlers::get_dashboard))
        .route("/dashboard/search", post(dashboard_handlers::search))
        .route("/dashboard/refresh", post(dashboard_handlers::refresh))
        .route(
            "/dashboard/location",
            post(dashboard_handlers::use_my_location),
        )
        .route("/dashboard/input", post(dashboard_handlers::input))
        .route("/dashboard/focus", post(dashboard_handlers::focus))
        .route("/dashboard/blur", post(dashboard_handlers::blur))
        .route("/dashboard/dismiss", post(dashboard_handlers::dismiss))
        .route(
            "/dashboard/suggestions/key",
            post(dashboard_handlers::suggestion_key),
        )
        .route(
            "/dashboard/suggestions/select",
            post(dashboard_handlers::select_suggestion),
        )
}

/// Build all API v1 routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(weather_routes())
        .merge(lookup_routes())
        .merge(dashboard_routes())
}

/// Build the complete application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check at root level
        .route("/", get(weather_handlers::health))
        .route("/health", get(weather_handlers::health))
        .nest("/api/v1", api_v1_routes())
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
}
