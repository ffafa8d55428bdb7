use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The sample chosen to represent one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyForecast {
    /// Short weekday label in the display time zone, e.g. "Mon"
    pub day: String,
    /// Local hour of the chosen sample
    pub hour: u32,
    pub timestamp: i64,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
    pub icon_url: String,
}

impl DailyForecast {
    /// Distance of the sample's hour from noon
    pub(crate) fn noon_distance(&self) -> u32 {
        self.hour.abs_diff(super::daily::NOON_HOUR)
    }
}
