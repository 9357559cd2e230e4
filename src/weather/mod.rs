//! Raw weather and air-quality series
//!
//! These are the already-retrieved feed payloads the aggregator works on.
//! Hourly arrays of the weather and air-quality series share one global
//! index: entry `i` of every array refers to `hourly.time[i]`.

use crate::{Result, SkyviewError};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub mod open_meteo;

/// Hourly weather arrays
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct HourlySeries {
    /// Feed-local timestamps
    pub time: Vec<NaiveDateTime>,
    /// Air temperature at 2 m in Celsius
    pub temperature: Vec<f64>,
    /// Precipitation in mm
    pub precipitation: Vec<f64>,
    /// Precipitation probability in percent
    pub precipitation_probability: Vec<f64>,
    /// Wind speed at 10 m
    pub wind_speed: Vec<f64>,
    /// Wind direction at 10 m in degrees
    pub wind_direction: Vec<f64>,
    pub uv_index: Vec<f64>,
    /// Visibility in meters
    pub visibility: Vec<f64>,
    /// Relative humidity in percent
    pub humidity: Vec<f64>,
    /// Mean sea level pressure in hPa
    pub pressure: Vec<f64>,
    /// Total cloud cover in percent
    pub cloud_cover: Vec<f64>,
}

/// Daily weather arrays
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DailySeries {
    /// Source dates; displayed one day later
    pub time: Vec<NaiveDate>,
    pub temperature_max: Vec<f64>,
    pub temperature_min: Vec<f64>,
    /// Missing during polar day or night
    pub sunrise: Vec<Option<NaiveDateTime>>,
    pub sunset: Vec<Option<NaiveDateTime>>,
}

/// Weather feed payload
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RawForecast {
    /// IANA time zone of the feed-local timestamps
    pub timezone: String,
    /// Offset of feed-local time from UTC
    pub utc_offset_seconds: i32,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}

/// Air-quality feed payload
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AirQualitySeries {
    /// US AQI per hour; the feed reports gaps as null
    pub us_aqi: Vec<Option<f64>>,
}

impl RawForecast {
    /// Decode an Open-Meteo forecast response
    pub fn from_json(payload: &str) -> Result<Self> {
        let response: open_meteo::ForecastResponse = serde_json::from_str(payload)?;
        response.try_into()
    }

    /// Number of whole days covered by the hourly arrays
    #[must_use]
    pub fn hourly_days(&self) -> usize {
        self.hourly.time.len() / 24
    }
}

impl AirQualitySeries {
    /// Decode an Open-Meteo air-quality response
    pub fn from_json(payload: &str) -> Result<Self> {
        let response: open_meteo::AirQualityResponse = serde_json::from_str(payload)?;
        Ok(response.into())
    }
}

/// Parse a feed-local timestamp such as `2024-06-01T14:00`
pub fn parse_local_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| SkyviewError::parse(format!("invalid timestamp '{value}': {e}")))
}

/// Parse a feed date such as `2024-06-01`
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| SkyviewError::parse(format!("invalid date '{value}': {e}")))
}
