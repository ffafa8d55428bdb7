use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// JSON body returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: Option<&str>) -> Self {
        Self {
            error: error.into(),
            code: code.map(str::to_string),
        }
    }
}

/// Errors that know which HTTP status they map to.
///
/// The `Display` text is user facing: it is shown verbatim by the dashboard.
pub trait HttpError: std::error::Error {
    fn status_code(&self) -> StatusCode;

    /// Stable code for programmatic handling (e.g., "CITY_NOT_FOUND")
    fn error_code(&self) -> Option<&'static str> {
        None
    }
}

pub fn into_response<E: HttpError>(err: E) -> Response {
    let status = err.status_code();
    let code = err.error_code();
    let message = err.to_string();

    if status.is_server_error() {
        tracing::error!(error = %message, status = %status, code = ?code, "Request failed");
    } else {
        tracing::warn!(error = %message, status = %status, code = ?code, "Request rejected");
    }

    (status, Json(ErrorResponse::new(message, code))).into_response()
}

#[macro_export]
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                $crate::error::into_response(self)
            }
        }
    };
}

/// Malformed client input caught before any provider is contacted
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Please enter a city name.")]
    BlankCity,

    #[error("Coordinates out of range: lat={lat}, lon={lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error("Unknown key: {0}")]
    UnknownKey(String),
}

impl HttpError for InputError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::BlankCity => Some("BLANK_CITY"),
            Self::InvalidCoordinates { .. } => Some("INVALID_COORDINATES"),
            Self::UnknownKey(_) => Some("UNKNOWN_KEY"),
        }
    }
}

impl_into_response!(InputError);

/// Validate a latitude/longitude pair
pub fn check_coordinates(lat: f64, lon: f64) -> Result<(), InputError> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(InputError::InvalidCoordinates { lat, lon })
    }
}
