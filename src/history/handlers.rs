use axum::{extract::State, Json};

use crate::AppState;

/// Most recent searches first
///
/// GET /api/v1/history
pub async fn get_history(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.dashboard.history().await)
}
