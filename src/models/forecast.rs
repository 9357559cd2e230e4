//! Forecast records and the assembled forecast model

use super::Location;
use crate::classify::ConditionSymbol;
use crate::solar;
use crate::units::WindDirection;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Display-ready readings shared by hourly and daily records
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Readings {
    /// Classified weather condition
    pub condition: ConditionSymbol,
    /// Precipitation probability in percent
    pub precipitation_probability: i32,
    /// Precipitation amount in mm, two decimals
    pub precipitation: f64,
    /// Wind speed in mph
    pub wind_speed: i32,
    /// Wind direction bucket
    pub wind_direction: WindDirection,
    /// UV index
    pub uv_index: i32,
    /// US AQI as reported by the air-quality feed
    pub aqi: Option<f64>,
    /// Visibility in miles
    pub visibility: i32,
    /// Relative humidity in percent
    pub humidity: i32,
    /// Mean sea level pressure in hPa
    pub pressure: i32,
}

/// Forecast for a single hour
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlyRecord {
    /// Feed-local timestamp of this hour
    pub time: NaiveDateTime,
    /// Hour of day (0-23)
    pub hour: u32,
    /// Temperature in Celsius
    pub temperature: i32,
    #[serde(flatten)]
    pub readings: Readings,
}

/// Forecast for a calendar day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyRecord {
    /// Display date
    pub date: NaiveDate,
    /// Display date formatted as `M/D/YYYY`
    pub label: String,
    /// Daily high in Celsius
    pub high: i32,
    /// Daily low in Celsius
    pub low: i32,
    /// Sun window of the source day
    pub sun_moon: SunMoonWindow,
    #[serde(flatten)]
    pub readings: Readings,
}

/// Dawn, sunrise, sunset and dusk for one day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SunMoonWindow {
    pub dawn: NaiveDateTime,
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
    pub dusk: NaiveDateTime,
    /// Formatted as `{hours}h {minutes}m`
    pub day_length: String,
    /// Formatted as `{hours}h {minutes}m`
    pub night_length: String,
}

impl SunMoonWindow {
    /// Strictly before dawn or strictly after dusk
    #[must_use]
    pub fn is_night(&self, time: NaiveDateTime) -> bool {
        time < self.dawn || time > self.dusk
    }

    #[must_use]
    pub fn day_duration(&self) -> Duration {
        solar::day_length(self.sunrise, self.sunset)
    }

    #[must_use]
    pub fn night_duration(&self) -> Duration {
        Duration::days(1) - self.day_duration()
    }
}

/// Normalized forecast ready for rendering
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastModel {
    pub location: Location,
    /// Conditions for the current hour
    pub current: HourlyRecord,
    /// 24 hours starting at the current hour
    pub hourly: Vec<HourlyRecord>,
    /// One record per daily feed entry
    pub daily: Vec<DailyRecord>,
    /// Sun window for today
    pub sun_moon: SunMoonWindow,
}
