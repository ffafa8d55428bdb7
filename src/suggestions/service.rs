use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

use super::models::*;

const DEFAULT_BASE_URL: &str = "https://secure.geonames.org";
const DEFAULT_COUNTRY: &str = "IN";
const DEFAULT_MAX_RESULTS: usize = 5;
const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Terms shorter than this are not sent to the provider
pub const MIN_TERM_LEN: usize = 2;

/// Populated places (cities, towns, villages)
const FEATURE_CLASS: &str = "P";

#[derive(Error, Debug)]
pub enum SuggestionError {
    #[error("GeoNames username is not configured")]
    MissingUsername,

    #[error("Failed to fetch suggestions: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("GeoNames returned HTTP {0}")]
    HttpStatus(StatusCode),

    #[error("GeoNames error: {0}")]
    ProviderError(String),
}

/// City autocomplete, as used by the dashboard's search box
#[async_trait]
pub trait SuggestionApi: Send + Sync {
    /// Never fails: lookup problems yield an empty list
    async fn city_suggestions(&self, term: &str) -> Vec<CitySuggestion>;
}

#[derive(Debug, Clone, Copy)]
enum SearchMode {
    /// Names starting with the term, most populous first
    Prefix,
    /// Free-text match ordered by relevance
    Relevance,
}

impl SearchMode {
    fn term_param(self) -> &'static str {
        match self {
            SearchMode::Prefix => "name_startsWith",
            SearchMode::Relevance => "q",
        }
    }

    fn order_by(self) -> &'static str {
        match self {
            SearchMode::Prefix => "population",
            SearchMode::Relevance => "relevance",
        }
    }
}

/// GeoNames city search client
pub struct LocationService {
    client: Client,
    username: Option<String>,
    base_url: String,
    country: String,
    max_results: usize,
    timeout: Duration,
}

impl LocationService {
    pub fn new(client: Client, username: Option<&str>) -> Self {
        Self {
            client,
            username: username
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string),
            base_url: DEFAULT_BASE_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Suggestions for a partially typed city name.
    ///
    /// Runs a prefix search and a relevance search concurrently and merges
    /// them. Short terms and any provider failure give an empty list.
    pub async fn get_city_suggestions(&self, term: &str) -> Vec<CitySuggestion> {
        let term = term.trim();
        if term.chars().count() < MIN_TERM_LEN {
            return Vec::new();
        }

        match self.try_city_suggestions(term).await {
            Ok(suggestions) => {
                tracing::debug!(term = %term, count = suggestions.len(), "City suggestions fetched");
                suggestions
            }
            Err(e) => {
                tracing::warn!(term = %term, error = %e, "City suggestion lookup failed");
                Vec::new()
            }
        }
    }

    async fn try_city_suggestions(
        &self,
        term: &str,
    ) -> Result<Vec<CitySuggestion>, SuggestionError> {
        let username = self
            .username
            .as_deref()
            .ok_or(SuggestionError::MissingUsername)?;

        let (prefix, relevance) = tokio::join!(
            self.search(SearchMode::Prefix, term, username),
            self.search(SearchMode::Relevance, term, username),
        );

        Ok(merge_suggestions(prefix?, relevance?, self.max_results))
    }

    async fn search(
        &self,
        mode: SearchMode,
        term: &str,
        username: &str,
    ) -> Result<Vec<CitySuggestion>, SuggestionError> {
        let max_rows = self.max_results.to_string();

        let response = self
            .client
            .get(format!("{}/searchJSON", self.base_url))
            .query(&[
                (mode.term_param(), term),
                ("country", self.country.as_str()),
                ("featureClass", FEATURE_CLASS),
                ("orderby", mode.order_by()),
                ("maxRows", max_rows.as_str()),
                ("username", username),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SuggestionError::HttpStatus(status));
        }

        let data: SearchResponse = response.json().await?;

        // GeoNames reports quota and account problems with HTTP 200
        if let Some(status) = data.status {
            return Err(SuggestionError::ProviderError(status.message));
        }

        Ok(data
            .geonames
            .into_iter()
            .filter_map(|place| CitySuggestion::from_geoname(place, &self.country))
            .collect())
    }
}

#[async_trait]
impl SuggestionApi for LocationService {
    async fn city_suggestions(&self, term: &str) -> Vec<CitySuggestion> {
        self.get_city_suggestions(term).await
    }
}

/// Prefix matches first, then unseen relevance matches, capped at `limit`
pub fn merge_suggestions(
    prefix: Vec<CitySuggestion>,
    relevance: Vec<CitySuggestion>,
    limit: usize,
) -> Vec<CitySuggestion> {
    let mut seen = HashSet::new();
    prefix
        .into_iter()
        .chain(relevance)
        .filter(|city| seen.insert(city.id))
        .take(limit)
        .collect()
}
