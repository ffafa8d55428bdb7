use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A city offered while the user types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CitySuggestion {
    /// GeoNames identifier, used for deduplication
    pub id: u64,
    pub name: String,
    /// "Name, Region, Country" for display
    pub full_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CitySuggestion {
    /// Build a suggestion from a GeoNames record.
    ///
    /// Returns `None` when the record's coordinates are not numeric.
    pub(crate) fn from_geoname(place: GeoName, fallback_country: &str) -> Option<Self> {
        let latitude = place.lat.trim().parse().ok()?;
        let longitude = place.lng.trim().parse().ok()?;

        let country = place
            .country_name
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(fallback_country);

        let full_name = match place.admin_name1.as_deref().map(str::trim) {
            Some(region) if !region.is_empty() => {
                format!("{}, {}, {}", place.name, region, country)
            }
            _ => format!("{}, {}", place.name, country),
        };

        Some(Self {
            id: place.geoname_id,
            name: place.name,
            full_name,
            latitude,
            longitude,
        })
    }
}

// GeoNames searchJSON response types

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub geonames: Vec<GeoName>,
    /// Present instead of results when GeoNames rejects the query
    #[serde(default)]
    pub status: Option<ProviderStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeoName {
    pub geoname_id: u64,
    pub name: String,
    #[serde(default)]
    pub admin_name1: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderStatus {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geoname(admin: Option<&str>, country: Option<&str>) -> GeoName {
        GeoName {
            geoname_id: 1259229,
            name: "Pune".to_string(),
            admin_name1: admin.map(str::to_string),
            country_name: country.map(str::to_string),
            lat: "18.51957".to_string(),
            lng: "73.85535".to_string(),
        }
    }

    #[test]
    fn test_full_name_includes_region_and_country() {
        let city = CitySuggestion::from_geoname(geoname(Some("Maharashtra"), Some("India")), "IN")
            .unwrap();
        assert_eq!(city.full_name, "Pune, Maharashtra, India");
        assert_eq!(city.latitude, 18.51957);
        assert_eq!(city.longitude, 73.85535);
    }

    #[test]
    fn test_full_name_without_region() {
        let city = CitySuggestion::from_geoname(geoname(Some(""), Some("India")), "IN").unwrap();
        assert_eq!(city.full_name, "Pune, India");
    }

    #[test]
    fn test_full_name_falls_back_to_configured_country() {
        let city = CitySuggestion::from_geoname(geoname(None, None), "IN").unwrap();
        assert_eq!(city.full_name, "Pune, IN");
    }

    #[test]
    fn test_non_numeric_coordinates_are_rejected() {
        let mut place = geoname(None, None);
        place.lat = "n/a".to_string();
        assert!(CitySuggestion::from_geoname(place, "IN").is_none());
    }

    #[test]
    fn test_geonames_field_names() {
        let place: GeoName = serde_json::from_value(serde_json::json!({
            "geonameId": 1275339,
            "name": "Mumbai",
            "adminName1": "Maharashtra",
            "countryName": "India",
            "lat": "19.07283",
            "lng": "72.88261",
            "population": 12691836
        }))
        .unwrap();
        assert_eq!(place.geoname_id, 1275339);
        assert_eq!(place.admin_name1.as_deref(), Some("Maharashtra"));
    }
}
