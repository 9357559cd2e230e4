//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

/// Latitude of the fallback location (Austin, TX)
pub const DEFAULT_LATITUDE: f64 = 30.2672;
/// Longitude of the fallback location (Austin, TX)
pub const DEFAULT_LONGITUDE: f64 = -97.7431;

/// Named place with coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Location name (city, town, village)
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Country name
    pub country: String,
    /// State or region, when the geocoder knows one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Location {
    /// Create a new location with an unknown country
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            name,
            latitude,
            longitude,
            country: "Unknown".to_string(),
            state: None,
        }
    }

    /// Create location with country and optional state
    #[must_use]
    pub fn with_country(
        latitude: f64,
        longitude: f64,
        name: String,
        country: String,
        state: Option<String>,
    ) -> Self {
        Self {
            name,
            latitude,
            longitude,
            country,
            state,
        }
    }

    /// Location used when neither geolocation nor a search result is available
    #[must_use]
    pub fn fallback() -> Self {
        Self::with_country(
            DEFAULT_LATITUDE,
            DEFAULT_LONGITUDE,
            "Austin".to_string(),
            "United States".to_string(),
            Some("Texas".to_string()),
        )
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Human-readable label, e.g. `Austin, Texas, United States`
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}, {}", self.name, state, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display_name() {
        let location = Location::fallback();
        assert_eq!(location.display_name(), "Austin, Texas, United States");

        let location = Location::with_country(
            46.8182,
            8.2275,
            "Interlaken".to_string(),
            "Switzerland".to_string(),
            None,
        );
        assert_eq!(location.display_name(), "Interlaken, Switzerland");
    }

    #[test]
    fn test_format_coordinates() {
        let location = Location::new(46.818_234, 8.227_456, "Test".to_string());
        assert_eq!(location.format_coordinates(), "46.8182, 8.2275");
        assert_eq!(location.country, "Unknown");
    }

    #[test]
    fn test_state_is_omitted_when_absent() {
        let location = Location::new(1.0, 2.0, "Somewhere".to_string());
        let json = serde_json::to_string(&location).unwrap();
        assert!(!json.contains("state"));
    }
}
