pub mod handlers;
pub mod models;
pub mod service;

pub use models::{ForecastSample, WeatherReport, WeatherSnapshot};
pub use service::{WeatherApi, WeatherError, WeatherService};
