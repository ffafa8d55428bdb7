use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::models::CitySuggestion;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub term: String,
}

/// Direct lookup without debouncing. Provider failures yield an empty list.
///
/// GET /api/v1/suggestions?term=Pun
pub async fn get_suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> Json<Vec<CitySuggestion>> {
    Json(state.location_service.get_city_suggestions(&query.term).await)
}
