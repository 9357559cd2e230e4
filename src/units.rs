//! Unit conversions and display formatting
//!
//! The forecast model is produced in metric units. Everything here is a pure
//! conversion applied either while building records (wind, visibility) or
//! afterwards by the rendering side (temperature, pressure, clock format).

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wind speed multiplier applied to the feed's wind speed to get mph
pub const MPH_PER_WIND_UNIT: f64 = 0.621_371;
/// Miles per meter
pub const MILES_PER_METER: f64 = 0.000_621_371;
/// Hectopascals per inch of mercury
pub const HPA_PER_INHG: f64 = 33.863_89;

/// Round half-way values toward positive infinity.
///
/// Matches the rounding the rendering side expects: `-2.5` becomes `-2`,
/// not `-3` as [`f64::round`] would produce.
#[must_use]
#[allow(clippy::cast_possible_truncation, reason = "forecast values fit in i32")]
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Round to a fixed number of decimals
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let multiplier = 10_f64.powi(decimals);
    (value * multiplier).round() / multiplier
}

/// Convert the feed's wind speed to whole miles per hour
#[must_use]
pub fn wind_speed_mph(speed: f64) -> i32 {
    round_half_up(speed * MPH_PER_WIND_UNIT)
}

/// Convert visibility in meters to whole miles
#[must_use]
pub fn visibility_miles(meters: f64) -> i32 {
    round_half_up(meters * MILES_PER_METER)
}

/// Temperature display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

/// Pressure display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PressureUnit {
    #[default]
    #[serde(rename = "mb")]
    Millibars,
    #[serde(rename = "inHg")]
    InchesOfMercury,
}

/// Clock display style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "12")]
    TwelveHour,
    #[default]
    #[serde(rename = "24")]
    TwentyFourHour,
}

/// Unit choices supplied by the rendering side on every call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitPreferences {
    pub temperature: TemperatureUnit,
    pub time: TimeFormat,
    pub pressure: PressureUnit,
}

impl UnitPreferences {
    /// Default preferences for a BCP 47 locale tag: US customary units for
    /// `en-US`, metric and 24-hour clock everywhere else.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        if locale == "en-US" {
            Self {
                temperature: TemperatureUnit::Fahrenheit,
                time: TimeFormat::TwelveHour,
                pressure: PressureUnit::InchesOfMercury,
            }
        } else {
            Self::default()
        }
    }
}

/// Convert a rounded Celsius temperature into the requested unit
#[must_use]
pub fn convert_temperature(celsius: i32, unit: TemperatureUnit) -> i32 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => round_half_up(f64::from(celsius) * 9.0 / 5.0 + 32.0),
    }
}

/// Format a pressure in hPa for display in the requested unit
#[must_use]
pub fn convert_pressure(hpa: i32, unit: PressureUnit) -> String {
    match unit {
        PressureUnit::Millibars => hpa.to_string(),
        PressureUnit::InchesOfMercury => format!("{:.2}", f64::from(hpa) / HPA_PER_INHG),
    }
}

/// Format a local timestamp as a wall-clock time
#[must_use]
pub fn format_clock(time: &NaiveDateTime, format: TimeFormat) -> String {
    match format {
        TimeFormat::TwelveHour => time.format("%-I:%M %p").to_string(),
        TimeFormat::TwentyFourHour => time.format("%H:%M").to_string(),
    }
}

/// Format a unix timestamp as a wall-clock time in the given IANA time zone.
///
/// Unknown zone names fall back to UTC.
#[must_use]
pub fn format_unix_clock(timestamp: i64, timezone: &str, format: TimeFormat) -> String {
    let Some(utc) = DateTime::<Utc>::from_timestamp(timestamp, 0) else {
        return "Invalid Date".to_string();
    };
    let tz: Tz = timezone.parse().unwrap_or(Tz::UTC);
    format_clock(&tz.from_utc_datetime(&utc.naive_utc()).naive_local(), format)
}

/// Eight-way wind direction bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl WindDirection {
    const ALL: [WindDirection; 8] = [
        WindDirection::N,
        WindDirection::NE,
        WindDirection::E,
        WindDirection::SE,
        WindDirection::S,
        WindDirection::SW,
        WindDirection::W,
        WindDirection::NW,
    ];

    /// Bucket a direction in degrees (0 = north, clockwise) into 45° sectors
    #[must_use]
    #[allow(clippy::cast_sign_loss, reason = "rem_euclid result is non-negative")]
    pub fn from_degrees(degrees: f64) -> Self {
        let sector = round_half_up(degrees / 45.0).rem_euclid(8) as usize;
        Self::ALL[sector]
    }

    /// Compass label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            WindDirection::N => "N",
            WindDirection::NE => "NE",
            WindDirection::E => "E",
            WindDirection::SE => "SE",
            WindDirection::S => "S",
            WindDirection::SW => "SW",
            WindDirection::W => "W",
            WindDirection::NW => "NW",
        }
    }

    /// Arrow glyph shown next to the wind speed
    #[must_use]
    pub fn arrow(self) -> &'static str {
        match self {
            WindDirection::N => "⬆️",
            WindDirection::NE => "↗️",
            WindDirection::E => "➡️",
            WindDirection::SE => "↘️",
            WindDirection::S => "⬇️",
            WindDirection::SW => "↙️",
            WindDirection::W => "⬅️",
            WindDirection::NW => "↖️",
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    #[case(0, 32)]
    #[case(100, 212)]
    #[case(-40, -40)]
    #[case(21, 70)]
    fn test_convert_temperature_fahrenheit(#[case] celsius: i32, #[case] expected: i32) {
        assert_eq!(convert_temperature(celsius, TemperatureUnit::Fahrenheit), expected);
    }

    #[test]
    fn test_convert_temperature_celsius_is_identity() {
        assert_eq!(convert_temperature(-7, TemperatureUnit::Celsius), -7);
    }

    #[test]
    fn test_convert_pressure() {
        assert_eq!(convert_pressure(1013, PressureUnit::Millibars), "1013");
        assert_eq!(convert_pressure(1013, PressureUnit::InchesOfMercury), "29.91");
    }

    #[rstest]
    #[case(2.5, 3)]
    #[case(-2.5, -2)]
    #[case(-2.6, -3)]
    #[case(0.49, 0)]
    fn test_round_half_up(#[case] value: f64, #[case] expected: i32) {
        assert_eq!(round_half_up(value), expected);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.125_9, 2), 0.13);
        assert_eq!(round_to(1.0, 2), 1.0);
    }

    #[test]
    fn test_wind_and_visibility_conversions() {
        assert_eq!(wind_speed_mph(10.0), 6);
        assert_eq!(wind_speed_mph(0.0), 0);
        assert_eq!(visibility_miles(24_140.0), 15);
    }

    #[rstest]
    #[case(0.0, WindDirection::N)]
    #[case(22.4, WindDirection::N)]
    #[case(22.5, WindDirection::NE)]
    #[case(90.0, WindDirection::E)]
    #[case(180.0, WindDirection::S)]
    #[case(270.0, WindDirection::W)]
    #[case(337.5, WindDirection::N)]
    #[case(360.0, WindDirection::N)]
    #[case(-45.0, WindDirection::NW)]
    fn test_wind_direction_buckets(#[case] degrees: f64, #[case] expected: WindDirection) {
        assert_eq!(WindDirection::from_degrees(degrees), expected);
    }

    #[test]
    fn test_wind_direction_glyphs() {
        assert_eq!(WindDirection::N.arrow(), "⬆️");
        assert_eq!(WindDirection::SW.label(), "SW");
        assert_eq!(WindDirection::E.to_string(), "E");
    }

    #[test]
    fn test_format_clock() {
        let time = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(19, 5, 0)
            .unwrap();
        assert_eq!(format_clock(&time, TimeFormat::TwelveHour), "7:05 PM");
        assert_eq!(format_clock(&time, TimeFormat::TwentyFourHour), "19:05");
    }

    #[test]
    fn test_format_unix_clock_uses_zone() {
        // 2024-06-01T12:00:00Z
        let ts = 1_717_243_200;
        assert_eq!(
            format_unix_clock(ts, "America/Chicago", TimeFormat::TwentyFourHour),
            "07:00"
        );
        assert_eq!(format_unix_clock(ts, "Not/AZone", TimeFormat::TwentyFourHour), "12:00");
    }

    #[test]
    fn test_preferences_for_locale() {
        let us = UnitPreferences::for_locale("en-US");
        assert_eq!(us.temperature, TemperatureUnit::Fahrenheit);
        assert_eq!(us.time, TimeFormat::TwelveHour);

        let de = UnitPreferences::for_locale("de-DE");
        assert_eq!(de, UnitPreferences::default());
        assert_eq!(de.pressure, PressureUnit::Millibars);
    }

    #[test]
    fn test_preferences_serde_names() {
        let prefs = UnitPreferences::for_locale("en-US");
        let json = serde_json::to_string(&prefs).unwrap();
        assert_eq!(json, r#"{"temperature":"F","time":"12","pressure":"inHg"}"#);
    }
}
