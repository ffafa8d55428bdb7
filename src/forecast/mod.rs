pub mod daily;
pub mod models;

pub use daily::{daily_forecasts, MAX_FORECAST_DAYS};
pub use models::DailyForecast;
