use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OpenWeatherMap API key. Weather requests are refused while unset.
    #[serde(default)]
    pub openweathermap_api_key: Option<String>,

    /// GeoNames account used for city suggestions
    #[serde(default)]
    pub geonames_username: Option<String>,

    /// Temperature units: metric, imperial, or standard
    #[serde(default = "default_units")]
    pub units: String,

    /// IANA time zone used to bucket forecast samples into days
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub weather: WeatherProviderConfig,

    #[serde(default)]
    pub suggestions: SuggestionConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherProviderConfig {
    /// Base URL of the OpenWeatherMap 2.5 API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_weather_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WeatherProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_secs: default_weather_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SuggestionConfig {
    /// Base URL of the GeoNames web service
    #[serde(default = "default_geonames_base_url")]
    pub base_url: String,

    /// ISO country code suggestions are restricted to
    #[serde(default = "default_country")]
    pub country: String,

    /// Maximum number of suggestions returned
    #[serde(default = "default_max_suggestions")]
    pub max_results: usize,

    /// Per-query timeout in milliseconds
    #[serde(default = "default_suggestion_timeout_ms")]
    pub timeout_ms: u64,

    /// Delay between the last keystroke and the suggestion fetch
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            base_url: default_geonames_base_url(),
            country: default_country(),
            max_results: default_max_suggestions(),
            timeout_ms: default_suggestion_timeout_ms(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    /// JSON file holding the recent searches
    #[serde(default = "default_history_file")]
    pub file_path: String,

    /// Maximum number of recent searches kept
    #[serde(default = "default_history_max_items")]
    pub max_items: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            file_path: default_history_file(),
            max_items: default_history_max_items(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_weather_timeout_secs() -> u64 {
    10
}

fn default_geonames_base_url() -> String {
    "https://secure.geonames.org".to_string()
}

fn default_country() -> String {
    "IN".to_string()
}

fn default_max_suggestions() -> usize {
    5
}

fn default_suggestion_timeout_ms() -> u64 {
    5000
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_history_file() -> String {
    "data/search_history.json".to_string()
}

fn default_history_max_items() -> usize {
    5
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("units", default_units())?
            .set_default("timezone", default_timezone())?
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // SKYCAST_OPENWEATHERMAP_API_KEY, SKYCAST_HISTORY__MAX_ITEMS, ...
            .add_source(
                Environment::with_prefix("SKYCAST")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// The weather API key, if one is configured and non-blank
    pub fn weather_api_key(&self) -> Option<&str> {
        non_blank(self.openweathermap_api_key.as_deref())
    }

    pub fn geonames_username(&self) -> Option<&str> {
        non_blank(self.geonames_username.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
