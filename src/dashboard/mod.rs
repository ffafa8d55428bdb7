pub mod controller;
pub mod debounce;
pub mod geolocation;
pub mod handlers;
pub mod state;
pub mod suggestion_list;

pub use controller::{DashboardController, DashboardSettings};
pub use geolocation::{GeolocationError, Geolocator, Position, ReportedPosition};
pub use state::{DashboardState, DashboardView};
pub use suggestion_list::{ListKey, SuggestionList, SuggestionView};
