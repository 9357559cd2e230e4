//! `OpenMeteo` API response structures and conversion utilities
//!
//! Only the payload shape lives here. Fetching is left to the caller; the
//! URL helpers build the requests the aggregator expects answers to.

use super::{AirQualitySeries, DailySeries, HourlySeries, RawForecast, parse_date, parse_local_time};
use crate::{Result, SkyviewError};
use serde::Deserialize;

pub const FORECAST_BASE_URL: &str = "https://api.open-meteo.com/v1";
pub const AIR_QUALITY_BASE_URL: &str = "https://air-quality-api.open-meteo.com/v1";

const HOURLY_VARIABLES: &str = "temperature_2m,precipitation_probability,precipitation,windspeed_10m,winddirection_10m,uv_index,visibility,relativehumidity_2m,pressure_msl,cloudcover";
const DAILY_VARIABLES: &str = "temperature_2m_max,temperature_2m_min,sunrise,sunset";

/// Forecast request for the variables the aggregator consumes
#[must_use]
pub fn forecast_url(latitude: f64, longitude: f64) -> String {
    format!(
        "{FORECAST_BASE_URL}/forecast?latitude={latitude}&longitude={longitude}&hourly={HOURLY_VARIABLES}&daily={DAILY_VARIABLES}&timezone=auto"
    )
}

/// Air-quality request covering `forecast_days` days of hourly US AQI
#[must_use]
pub fn air_quality_url(latitude: f64, longitude: f64, forecast_days: u32) -> String {
    format!(
        "{AIR_QUALITY_BASE_URL}/air-quality?latitude={latitude}&longitude={longitude}&hourly=us_aqi&timezone=auto&forecast_days={forecast_days}"
    )
}

/// Forecast response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub utc_offset_seconds: i32,
    pub hourly: HourlyData,
    pub daily: DailyData,
}

/// Hourly weather data from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct HourlyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m")]
    pub temperature: Vec<Option<f64>>,
    pub precipitation: Vec<Option<f64>>,
    pub precipitation_probability: Vec<Option<f64>>,
    #[serde(rename = "windspeed_10m", alias = "wind_speed_10m")]
    pub wind_speed: Vec<Option<f64>>,
    #[serde(rename = "winddirection_10m", alias = "wind_direction_10m")]
    pub wind_direction: Vec<Option<f64>>,
    pub uv_index: Vec<Option<f64>>,
    pub visibility: Vec<Option<f64>>,
    #[serde(rename = "relativehumidity_2m", alias = "relative_humidity_2m")]
    pub humidity: Vec<Option<f64>>,
    #[serde(rename = "pressure_msl")]
    pub pressure: Vec<Option<f64>>,
    #[serde(rename = "cloudcover", alias = "cloud_cover")]
    pub cloud_cover: Vec<Option<f64>>,
}

/// Daily weather data from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Vec<Option<f64>>,
    #[serde(default)]
    pub sunrise: Vec<Option<String>>,
    #[serde(default)]
    pub sunset: Vec<Option<String>>,
}

/// Air-quality response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct AirQualityResponse {
    pub hourly: AirQualityHourly,
}

#[derive(Debug, Deserialize)]
pub struct AirQualityHourly {
    #[serde(default)]
    pub us_aqi: Vec<Option<f64>>,
}

/// A series ends at its first missing value; later entries are unusable
/// because indices would no longer line up with the timeline.
fn leading_values(values: Vec<Option<f64>>) -> Vec<f64> {
    values.into_iter().map_while(|v| v).collect()
}

fn optional_times(values: Vec<Option<String>>) -> Result<Vec<Option<chrono::NaiveDateTime>>> {
    values
        .into_iter()
        .map(|value| value.as_deref().map(parse_local_time).transpose())
        .collect()
}

impl TryFrom<ForecastResponse> for RawForecast {
    type Error = SkyviewError;

    fn try_from(response: ForecastResponse) -> Result<Self> {
        let hourly = response.hourly;
        let daily = response.daily;

        let hourly = HourlySeries {
            time: hourly
                .time
                .iter()
                .map(|t| parse_local_time(t))
                .collect::<Result<_>>()?,
            temperature: leading_values(hourly.temperature),
            precipitation: leading_values(hourly.precipitation),
            precipitation_probability: leading_values(hourly.precipitation_probability),
            wind_speed: leading_values(hourly.wind_speed),
            wind_direction: leading_values(hourly.wind_direction),
            uv_index: leading_values(hourly.uv_index),
            visibility: leading_values(hourly.visibility),
            humidity: leading_values(hourly.humidity),
            pressure: leading_values(hourly.pressure),
            cloud_cover: leading_values(hourly.cloud_cover),
        };

        let daily = DailySeries {
            time: daily
                .time
                .iter()
                .map(|d| parse_date(d))
                .collect::<Result<_>>()?,
            temperature_max: leading_values(daily.temperature_max),
            temperature_min: leading_values(daily.temperature_min),
            sunrise: optional_times(daily.sunrise)?,
            sunset: optional_times(daily.sunset)?,
        };

        Ok(RawForecast {
            timezone: response.timezone,
            utc_offset_seconds: response.utc_offset_seconds,
            hourly,
            daily,
        })
    }
}

impl From<AirQualityResponse> for AirQualitySeries {
    fn from(response: AirQualityResponse) -> Self {
        Self {
            us_aqi: response.hourly.us_aqi,
        }
    }
}
