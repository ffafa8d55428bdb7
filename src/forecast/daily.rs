//! Reduce the 3-hourly forecast feed to one sample per day.

use chrono::{DateTime, TimeZone, Timelike};
use indexmap::IndexMap;

use super::models::DailyForecast;
use crate::weather::models::{icon_url, ForecastSample};

pub const MAX_FORECAST_DAYS: usize = 5;
pub(crate) const NOON_HOUR: u32 = 12;

/// Pick, per local weekday, the sample closest to noon.
///
/// Days keep the order in which they first appear in `samples` and only the
/// first [`MAX_FORECAST_DAYS`] are returned. On equal distance the earlier
/// sample is kept.
pub fn daily_forecasts<Z: TimeZone>(samples: &[ForecastSample], tz: &Z) -> Vec<DailyForecast>
where
    Z::Offset: std::fmt::Display,
{
    let mut days: IndexMap<String, DailyForecast> = IndexMap::new();

    for sample in samples {
        let Some(utc) = DateTime::from_timestamp(sample.timestamp, 0) else {
            tracing::debug!(timestamp = sample.timestamp, "Skipping unrepresentable forecast timestamp");
            continue;
        };
        let local = utc.with_timezone(tz);

        let candidate = DailyForecast {
            day: local.format("%a").to_string(),
            hour: local.hour(),
            timestamp: sample.timestamp,
            temperature: sample.temperature,
            description: sample.description.clone(),
            icon: sample.icon.clone(),
            icon_url: icon_url(&sample.icon, 2),
        };

        match days.get_mut(&candidate.day) {
            Some(current) if candidate.noon_distance() < current.noon_distance() => {
                *current = candidate;
            }
            Some(_) => {}
            None => {
                days.insert(candidate.day.clone(), candidate);
            }
        }
    }

    days.into_values().take(MAX_FORECAST_DAYS).collect()
}
