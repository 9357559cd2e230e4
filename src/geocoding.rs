//! Location input parsing and Nominatim geocoding payloads
//!
//! Requests are built here and responses decoded into [`Location`]s;
//! fetching is left to the caller.

use crate::models::Location;
use crate::{Result, SkyviewError};
use serde::Deserialize;
use tracing::debug;

pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
/// Upper bound on search results kept
pub const MAX_SEARCH_RESULTS: usize = 5;

const UNKNOWN_COUNTRY: &str = "Unknown";
const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Types of location input
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Coordinates (latitude, longitude)
    Coordinates(f64, f64),
    /// Place name (city, region, etc.)
    Name(String),
    /// US ZIP code
    PostalCode(String),
}

/// Location parsing utilities
pub struct LocationParser;

impl LocationParser {
    /// Parse location input (coordinates, place names, ZIP codes)
    pub fn parse(input: &str) -> Result<LocationInput> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SkyviewError::parse("location input is empty"));
        }

        if let Some((lat, lon)) = Self::parse_coordinates(input)? {
            return Ok(LocationInput::Coordinates(lat, lon));
        }

        if is_postal_code(input) {
            return Ok(LocationInput::PostalCode(input.to_string()));
        }

        Ok(LocationInput::Name(input.to_string()))
    }

    /// Parse coordinates from strings like "30.2672,-97.7431" or "30.2672 -97.7431".
    ///
    /// Returns `Ok(None)` when the input is not numeric at all, so that it
    /// can be treated as a name instead.
    fn parse_coordinates(input: &str) -> Result<Option<(f64, f64)>> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        let [lat, lon] = parts.as_slice() else {
            return Ok(None);
        };
        let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
            return Ok(None);
        };

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(SkyviewError::invalid_coordinate(lat, lon));
        }

        Ok(Some((lat, lon)))
    }
}

/// Five ASCII digits, i.e. a US ZIP code
#[must_use]
pub fn is_postal_code(query: &str) -> bool {
    query.len() == 5 && query.chars().all(|c| c.is_ascii_digit())
}

/// Forward search request; ZIP codes are restricted to the US
#[must_use]
pub fn search_url(query: &str) -> String {
    let mut url = format!(
        "{NOMINATIM_BASE_URL}/search?q={}&format=json&limit={MAX_SEARCH_RESULTS}&addressdetails=1",
        urlencoding::encode(query)
    );
    if is_postal_code(query) {
        url.push_str("&countrycodes=us");
    }
    url
}

/// Reverse geocoding request for a coordinate
#[must_use]
pub fn reverse_url(latitude: f64, longitude: f64) -> String {
    format!("{NOMINATIM_BASE_URL}/reverse?lat={latitude}&lon={longitude}&format=json")
}

/// Address block of a Nominatim result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// One Nominatim place
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
    pub address: Option<NominatimAddress>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl NominatimAddress {
    fn settlement(&self) -> Option<&str> {
        non_empty(self.city.as_ref())
            .or_else(|| non_empty(self.town.as_ref()))
            .or_else(|| non_empty(self.village.as_ref()))
    }

    fn country(&self) -> &str {
        non_empty(self.country.as_ref()).unwrap_or(UNKNOWN_COUNTRY)
    }

    fn state(&self) -> Option<String> {
        non_empty(self.state.as_ref()).map(str::to_string)
    }
}

impl NominatimPlace {
    fn coordinates(&self) -> Result<(f64, f64)> {
        let parse = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|e| SkyviewError::parse(format!("invalid coordinate '{value}': {e}")))
        };
        Ok((parse(&self.lat)?, parse(&self.lon)?))
    }

    /// Convert a search hit; `None` when it cannot be shown as a place
    fn into_search_location(self) -> Option<Location> {
        let address = self.address.as_ref()?;
        let name = address
            .settlement()
            .map(str::to_string)
            .or_else(|| {
                self.display_name
                    .split(',')
                    .next()
                    .map(|s| s.trim().to_string())
            })
            .filter(|name| !name.is_empty())?;
        let country = address.country();
        if country == UNKNOWN_COUNTRY {
            return None;
        }

        match self.coordinates() {
            Ok((lat, lon)) => Some(Location::with_country(
                lat,
                lon,
                name,
                country.to_string(),
                address.state(),
            )),
            Err(e) => {
                debug!("Skipping search result '{}': {}", self.display_name, e);
                None
            }
        }
    }
}

/// Decode a Nominatim search response into at most five named places
pub fn decode_search(payload: &str) -> Result<Vec<Location>> {
    let places: Vec<NominatimPlace> = serde_json::from_str(payload)?;
    let total = places.len();
    let locations: Vec<Location> = places
        .into_iter()
        .filter_map(NominatimPlace::into_search_location)
        .take(MAX_SEARCH_RESULTS)
        .collect();

    debug!("Kept {} of {} search results", locations.len(), total);
    Ok(locations)
}

/// Decode a Nominatim reverse response
pub fn decode_reverse(payload: &str) -> Result<Location> {
    let place: NominatimPlace = serde_json::from_str(payload)?;
    let (lat, lon) = place.coordinates()?;
    let address = place.address.unwrap_or_default();

    let name = address
        .settlement()
        .or_else(|| non_empty(address.suburb.as_ref()))
        .unwrap_or(UNKNOWN_LOCATION)
        .to_string();

    Ok(Location::with_country(
        lat,
        lon,
        name,
        address.country().to_string(),
        address.state(),
    ))
}
