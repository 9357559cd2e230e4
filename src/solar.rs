//! Sun window calculation
//!
//! Derives dawn, dusk and day/night lengths from a day's sunrise and sunset.
//! Inputs are feed-local wall-clock timestamps; no time zone conversion
//! happens here.

use crate::models::{Location, SunMoonWindow};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use sunrise::{Coordinates, SolarDay, SolarEvent};
use tracing::debug;

/// Offset of dawn before sunrise and dusk after sunset
pub const TWILIGHT_MINUTES: i64 = 30;

/// Build the solar window for one calendar day
#[must_use]
pub fn solar_window(sunrise: NaiveDateTime, sunset: NaiveDateTime) -> SunMoonWindow {
    let day = day_length(sunrise, sunset);
    SunMoonWindow {
        dawn: sunrise - Duration::minutes(TWILIGHT_MINUTES),
        sunrise,
        sunset,
        dusk: sunset + Duration::minutes(TWILIGHT_MINUTES),
        day_length: format_duration(day),
        night_length: format_duration(Duration::days(1) - day),
    }
}

/// Time between sunrise and sunset, clamped to a single day
#[must_use]
pub fn day_length(sunrise: NaiveDateTime, sunset: NaiveDateTime) -> Duration {
    (sunset - sunrise).clamp(Duration::zero(), Duration::days(1))
}

/// Format a duration as `{hours}h {minutes}m`, dropping partial minutes
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Astronomical sunrise and sunset for a location, in feed-local time.
///
/// Used when the feed has no sunrise/sunset for a day. During polar day or
/// night the missing event falls back to 06:00 or 19:00 local.
#[must_use]
pub fn estimate_sunrise_sunset(
    location: &Location,
    date: NaiveDate,
    utc_offset_seconds: i32,
) -> (NaiveDateTime, NaiveDateTime) {
    let offset = Duration::seconds(i64::from(utc_offset_seconds));
    let fallback = |hour| date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default());

    let Some(coordinates) = Coordinates::new(location.latitude, location.longitude) else {
        debug!(
            "Invalid coordinates for solar estimate: lat={}, lng={}",
            location.latitude, location.longitude
        );
        return (fallback(6), fallback(19));
    };

    let solar_day = SolarDay::new(coordinates, date);
    let sunrise = solar_day
        .event_time(SolarEvent::Sunrise)
        .map_or_else(|| fallback(6), |t| t.naive_utc() + offset);
    let sunset = solar_day
        .event_time(SolarEvent::Sunset)
        .map_or_else(|| fallback(19), |t| t.naive_utc() + offset);

    (sunrise, sunset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_dawn_and_dusk_offsets() {
        let window = solar_window(at(1, 6, 28), at(1, 20, 35));
        assert_eq!(window.dawn, at(1, 5, 58));
        assert_eq!(window.dusk, at(1, 21, 5));
        assert_eq!(window.sunrise, at(1, 6, 28));
        assert_eq!(window.sunset, at(1, 20, 35));
    }

    #[test]
    fn test_day_and_night_length_format() {
        let window = solar_window(at(1, 6, 28), at(1, 20, 35));
        assert_eq!(window.day_length, "14h 7m");
        assert_eq!(window.night_length, "9h 53m");
    }

    #[test]
    fn test_partial_minutes_are_floored() {
        let sunrise = at(1, 6, 0);
        let sunset = at(1, 18, 0) + Duration::seconds(59);
        assert_eq!(format_duration(day_length(sunrise, sunset)), "12h 0m");
    }

    #[test]
    fn test_day_plus_night_is_one_day() {
        for (rise, set) in [(at(1, 4, 1), at(1, 22, 17)), (at(1, 7, 45), at(1, 16, 2))] {
            let window = solar_window(rise, set);
            assert_eq!(
                window.day_duration() + window.night_duration(),
                Duration::days(1)
            );
        }
    }

    #[test]
    fn test_inverted_input_clamps_to_zero_day() {
        let window = solar_window(at(1, 20, 0), at(1, 6, 0));
        assert_eq!(window.day_length, "0h 0m");
        assert_eq!(window.night_length, "24h 0m");
    }

    #[test]
    fn test_estimate_returns_ordered_events() {
        let location = Location::new(48.137, 11.575, "Munich".to_string());
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let (sunrise, sunset) = estimate_sunrise_sunset(&location, date, 7200);
        assert!(sunrise < sunset);
        assert_eq!(sunrise.date(), date);
    }

    #[test]
    fn test_estimate_invalid_coordinates_falls_back() {
        let location = Location::new(123.0, 11.575, "Nowhere".to_string());
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let (sunrise, sunset) = estimate_sunrise_sunset(&location, date, 0);
        assert_eq!(sunrise, date.and_hms_opt(6, 0, 0).unwrap());
        assert_eq!(sunset, date.and_hms_opt(19, 0, 0).unwrap());
    }
}
