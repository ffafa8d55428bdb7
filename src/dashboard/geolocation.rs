use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Why the device position could not be determined
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("Location access was denied. Please allow location access or search for a city.")]
    PermissionDenied,

    #[error("Your location is currently unavailable. Please search for a city instead.")]
    PositionUnavailable,

    #[error("Timed out while retrieving your location. Please try again.")]
    Timeout,

    #[error("An unknown error occurred while retrieving your location.")]
    Unknown,
}

impl GeolocationError {
    /// Map a browser `GeolocationPositionError.code`
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Unknown,
        }
    }
}

/// One-shot source of the device position
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Position, GeolocationError>;
}

/// A position (or failure) the browser already resolved and reported to us
#[derive(Debug, Clone, Copy)]
pub struct ReportedPosition(Result<Position, GeolocationError>);

impl ReportedPosition {
    pub fn located(latitude: f64, longitude: f64) -> Self {
        Self(Ok(Position {
            latitude,
            longitude,
        }))
    }

    pub fn failed(code: u16) -> Self {
        Self(Err(GeolocationError::from_code(code)))
    }
}

#[async_trait]
impl Geolocator for ReportedPosition {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        self.0
    }
}
