pub mod handlers;
pub mod models;
pub mod service;

pub use models::CitySuggestion;
pub use service::{merge_suggestions, LocationService, SuggestionApi};
