use axum::{extract::State, Json};
use serde::Deserialize;

use super::geolocation::ReportedPosition;
use super::state::DashboardView;
use super::suggestion_list::ListKey;
use crate::error::{check_coordinates, InputError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CityRequest {
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct InputRequest {
    #[serde(default)]
    pub term: String,
}

#[derive(Debug, Deserialize)]
pub struct KeyRequest {
    /// DOM `KeyboardEvent.key`
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub index: usize,
}

/// What the browser's geolocation call produced
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LocationReport {
    Located { lat: f64, lon: f64 },
    Failed { error_code: u16 },
}

impl LocationReport {
    fn into_position(self) -> Result<ReportedPosition, InputError> {
        match self {
            Self::Located { lat, lon } => {
                check_coordinates(lat, lon)?;
                Ok(ReportedPosition::located(lat, lon))
            }
            Self::Failed { error_code } => Ok(ReportedPosition::failed(error_code)),
        }
    }
}

fn non_blank(city: &str) -> Result<&str, InputError> {
    let city = city.trim();
    if city.is_empty() {
        Err(InputError::BlankCity)
    } else {
        Ok(city)
    }
}

/// GET /api/v1/dashboard
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.view().await)
}

/// POST /api/v1/dashboard/search
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<CityRequest>,
) -> Result<Json<DashboardView>, InputError> {
    state.dashboard.search(non_blank(&request.city)?).await;
    Ok(Json(state.dashboard.view().await))
}

/// POST /api/v1/dashboard/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<CityRequest>,
) -> Result<Json<DashboardView>, InputError> {
    state.dashboard.refresh(non_blank(&request.city)?).await;
    Ok(Json(state.dashboard.view().await))
}

/// POST /api/v1/dashboard/location
pub async fn use_my_location(
    State(state): State<AppState>,
    Json(report): Json<LocationReport>,
) -> Result<Json<DashboardView>, InputError> {
    let position = report.into_position()?;
    state.dashboard.use_my_location(&position).await;
    Ok(Json(state.dashboard.view().await))
}

/// POST /api/v1/dashboard/input
///
/// Returns immediately; suggestions show up in a later view once typing pauses.
pub async fn input(
    State(state): State<AppState>,
    Json(request): Json<InputRequest>,
) -> Json<DashboardView> {
    state.dashboard.input(&request.term).await;
    Json(state.dashboard.view().await)
}

pub async fn focus(State(state): State<AppState>) -> Json<DashboardView> {
    state.dashboard.focus().await;
    Json(state.dashboard.view().await)
}

pub async fn blur(State(state): State<AppState>) -> Json<DashboardView> {
    state.dashboard.blur().await;
    Json(state.dashboard.view().await)
}

pub async fn dismiss(State(state): State<AppState>) -> Json<DashboardView> {
    state.dashboard.dismiss_suggestions().await;
    Json(state.dashboard.view().await)
}

/// POST /api/v1/dashboard/suggestions/key
pub async fn suggestion_key(
    State(state): State<AppState>,
    Json(request): Json<KeyRequest>,
) -> Result<Json<DashboardView>, InputError> {
    let key = ListKey::parse(&request.key).ok_or(InputError::UnknownKey(request.key))?;
    state.dashboard.suggestion_key(key).await;
    Ok(Json(state.dashboard.view().await))
}

/// POST /api/v1/dashboard/suggestions/select
pub async fn select_suggestion(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Json<DashboardView> {
    state.dashboard.select_suggestion(request.index).await;
    Json(state.dashboard.view().await)
}
