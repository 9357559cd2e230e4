//! Forecast aggregation
//!
//! Turns raw hourly weather and air-quality arrays into the 24 hourly
//! records starting at the current hour, and reduces each day's 24 hourly
//! slots into a daily record.

use crate::classify::{ConditionInputs, ConditionSymbol, classify};
use crate::models::{DailyRecord, ForecastModel, HourlyRecord, Location, SunMoonWindow};
use crate::models::forecast::Readings;
use crate::solar;
use crate::units::{WindDirection, round_half_up, round_to, visibility_miles, wind_speed_mph};
use crate::weather::{AirQualitySeries, HourlySeries, RawForecast};
use crate::{Result, SkyviewError};
use chrono::{NaiveDateTime, Timelike};
use tracing::{debug, info, instrument};

/// Hourly slots per day in the feed timeline
pub const HOURS_PER_DAY: usize = 24;
/// Number of hourly records in a forecast model
pub const FORECAST_HOURS: usize = 24;

/// Hourly feed fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Temperature,
    Precipitation,
    PrecipitationProbability,
    WindSpeed,
    WindDirection,
    UvIndex,
    Visibility,
    Humidity,
    Pressure,
    CloudCover,
    UsAqi,
}

impl Field {
    const WEATHER: [Field; 10] = [
        Field::Temperature,
        Field::Precipitation,
        Field::PrecipitationProbability,
        Field::WindSpeed,
        Field::WindDirection,
        Field::UvIndex,
        Field::Visibility,
        Field::Humidity,
        Field::Pressure,
        Field::CloudCover,
    ];

    /// Name of the feed series, used in error messages
    #[must_use]
    pub fn series_name(self) -> &'static str {
        match self {
            Field::Temperature => "hourly.temperature_2m",
            Field::Precipitation => "hourly.precipitation",
            Field::PrecipitationProbability => "hourly.precipitation_probability",
            Field::WindSpeed => "hourly.windspeed_10m",
            Field::WindDirection => "hourly.winddirection_10m",
            Field::UvIndex => "hourly.uv_index",
            Field::Visibility => "hourly.visibility",
            Field::Humidity => "hourly.relativehumidity_2m",
            Field::Pressure => "hourly.pressure_msl",
            Field::CloudCover => "hourly.cloudcover",
            Field::UsAqi => "hourly.us_aqi",
        }
    }

    fn weather_values(self, hourly: &HourlySeries) -> &[f64] {
        match self {
            Field::Temperature => &hourly.temperature,
            Field::Precipitation => &hourly.precipitation,
            Field::PrecipitationProbability => &hourly.precipitation_probability,
            Field::WindSpeed => &hourly.wind_speed,
            Field::WindDirection => &hourly.wind_direction,
            Field::UvIndex => &hourly.uv_index,
            Field::Visibility => &hourly.visibility,
            Field::Humidity => &hourly.humidity,
            Field::Pressure => &hourly.pressure,
            Field::CloudCover => &hourly.cloud_cover,
            Field::UsAqi => &[],
        }
    }
}

/// How a field is reduced over a day's hourly slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    /// Largest value of the day
    Max,
    /// Arithmetic mean over all slots
    Mean,
    /// Value of the day's first slot
    First,
}

/// Daily reduction per field. Only precipitation and cloud cover are
/// aggregated; everything else reads the day's first hour.
pub const DAILY_REDUCERS: [(Field, Reducer); 11] = [
    (Field::PrecipitationProbability, Reducer::Max),
    (Field::Precipitation, Reducer::Max),
    (Field::CloudCover, Reducer::Mean),
    (Field::Temperature, Reducer::First),
    (Field::WindSpeed, Reducer::First),
    (Field::WindDirection, Reducer::First),
    (Field::UvIndex, Reducer::First),
    (Field::Visibility, Reducer::First),
    (Field::Humidity, Reducer::First),
    (Field::Pressure, Reducer::First),
    (Field::UsAqi, Reducer::First),
];

/// Reducer configured for a field
#[must_use]
pub fn daily_reducer(field: Field) -> Reducer {
    DAILY_REDUCERS
        .iter()
        .find(|(f, _)| *f == field)
        .map_or(Reducer::First, |(_, reducer)| *reducer)
}

impl Reducer {
    /// Reduce a day's slots; gaps are skipped by `Max` and `Mean`
    #[must_use]
    pub fn apply(self, slots: &[Option<f64>]) -> Option<f64> {
        match self {
            Reducer::First => slots.first().copied().flatten(),
            Reducer::Max => slots.iter().flatten().copied().reduce(f64::max),
            Reducer::Mean => {
                let (sum, count) = slots
                    .iter()
                    .flatten()
                    .fold((0.0, 0_u32), |(sum, count), v| (sum + v, count + 1));
                (count > 0).then(|| sum / f64::from(count))
            }
        }
    }
}

/// Aligned view over the weather and air-quality timelines
struct Timeline<'a> {
    hourly: &'a HourlySeries,
    aqi: &'a [Option<f64>],
}

impl Timeline<'_> {
    /// Fails unless every weather series covers `required` entries and the
    /// AQI series covers the hourly window
    fn require(&self, required: usize, window_end: usize) -> Result<()> {
        require_len("hourly.time", self.hourly.time.len(), required)?;
        for field in Field::WEATHER {
            require_len(field.series_name(), field.weather_values(self.hourly).len(), required)?;
        }
        require_len(Field::UsAqi.series_name(), self.aqi.len(), window_end)
    }

    fn value(&self, field: Field, index: usize) -> f64 {
        field.weather_values(self.hourly)[index]
    }

    fn slots(&self, field: Field, start: usize, len: usize) -> Vec<Option<f64>> {
        match field {
            // The air-quality feed may cover fewer days than the forecast
            Field::UsAqi => self
                .aqi
                .iter()
                .skip(start)
                .take(len)
                .copied()
                .collect(),
            _ => field.weather_values(self.hourly)[start..start + len]
                .iter()
                .copied()
                .map(Some)
                .collect(),
        }
    }

    fn reduce(&self, field: Field, start: usize) -> Option<f64> {
        daily_reducer(field).apply(&self.slots(field, start, HOURS_PER_DAY))
    }

    /// Display readings for a single hour
    fn readings(&self, index: usize, condition: ConditionSymbol) -> Readings {
        Readings {
            condition,
            precipitation_probability: round_half_up(self.value(Field::PrecipitationProbability, index)),
            precipitation: round_to(self.value(Field::Precipitation, index), 2),
            wind_speed: wind_speed_mph(self.value(Field::WindSpeed, index)),
            wind_direction: WindDirection::from_degrees(self.value(Field::WindDirection, index)),
            uv_index: round_half_up(self.value(Field::UvIndex, index)),
            aqi: self.aqi[index],
            visibility: visibility_miles(self.value(Field::Visibility, index)),
            humidity: round_half_up(self.value(Field::Humidity, index)),
            pressure: round_half_up(self.value(Field::Pressure, index)),
        }
    }
}

fn require_len(series: &str, available: usize, required: usize) -> Result<()> {
    if available < required {
        return Err(SkyviewError::insufficient(series, required, available));
    }
    Ok(())
}

/// Builds forecast models from raw feed payloads
pub struct ForecastAggregator;

impl ForecastAggregator {
    /// Aggregate raw weather and air-quality series into a forecast model.
    ///
    /// `now` is feed-local wall-clock time; its hour selects the first
    /// hourly record. Weather arrays must cover `hour(now) + 24` entries and
    /// 24 entries per daily entry. The AQI array only needs to cover the
    /// hourly window; days past its end get no daily AQI.
    ///
    /// Every hourly record is classified against today's sun window, including
    /// hours that fall on the next day.
    #[instrument(skip(forecast, air_quality), fields(location = %location.name))]
    pub fn aggregate(
        location: Location,
        forecast: &RawForecast,
        air_quality: &AirQualitySeries,
        now: NaiveDateTime,
    ) -> Result<ForecastModel> {
        let current_index = now.hour() as usize;
        let days = forecast.daily.time.len();
        debug!(
            "Aggregating {} hourly entries ({} whole days) and {} daily entries from index {}",
            forecast.hourly.time.len(),
            forecast.hourly_days(),
            days,
            current_index
        );

        Self::validate_daily(forecast)?;
        let timeline = Timeline {
            hourly: &forecast.hourly,
            aqi: &air_quality.us_aqi,
        };
        let window_end = current_index + FORECAST_HOURS;
        timeline.require(window_end.max(days * HOURS_PER_DAY), window_end)?;

        let windows = Self::solar_windows(&location, forecast);
        let hourly = Self::hourly_records(&timeline, &windows[0], current_index);
        let daily = Self::daily_records(&timeline, forecast, &windows)?;

        let current = hourly[0].clone();
        let sun_moon = windows[0].clone();

        info!(
            "Built forecast for {}: {} hours, {} days",
            location.name,
            hourly.len(),
            daily.len()
        );

        Ok(ForecastModel {
            location,
            current,
            hourly,
            daily,
            sun_moon,
        })
    }

    fn validate_daily(forecast: &RawForecast) -> Result<()> {
        let daily = &forecast.daily;
        let days = daily.time.len();
        require_len("daily.time", days, 1)?;
        require_len("daily.temperature_2m_max", daily.temperature_max.len(), days)?;
        require_len("daily.temperature_2m_min", daily.temperature_min.len(), days)?;
        require_len("daily.sunrise", daily.sunrise.len(), days)?;
        require_len("daily.sunset", daily.sunset.len(), days)
    }

    /// One sun window per daily entry; missing events are estimated
    fn solar_windows(location: &Location, forecast: &RawForecast) -> Vec<SunMoonWindow> {
        let daily = &forecast.daily;
        daily
            .time
            .iter()
            .enumerate()
            .map(|(i, date)| {
                let (sunrise, sunset) = match (daily.sunrise[i], daily.sunset[i]) {
                    (Some(sunrise), Some(sunset)) => (sunrise, sunset),
                    (sunrise, sunset) => {
                        debug!("Estimating sun events for {}", date);
                        let (estimated_rise, estimated_set) = solar::estimate_sunrise_sunset(
                            location,
                            *date,
                            forecast.utc_offset_seconds,
                        );
                        (
                            sunrise.unwrap_or(estimated_rise),
                            sunset.unwrap_or(estimated_set),
                        )
                    }
                };
                solar::solar_window(sunrise, sunset)
            })
            .collect()
    }

    fn hourly_records(
        timeline: &Timeline<'_>,
        today: &SunMoonWindow,
        current_index: usize,
    ) -> Vec<HourlyRecord> {
        (current_index..current_index + FORECAST_HOURS)
            .map(|index| {
                let time = timeline.hourly.time[index];
                let temperature = timeline.value(Field::Temperature, index);
                let inputs = ConditionInputs::hourly(
                    timeline.value(Field::Precipitation, index),
                    timeline.value(Field::PrecipitationProbability, index),
                    temperature,
                    timeline.value(Field::CloudCover, index),
                    today.is_night(time),
                );

                HourlyRecord {
                    time,
                    hour: u32::try_from(index % HOURS_PER_DAY).unwrap_or_default(),
                    temperature: round_half_up(temperature),
                    readings: timeline.readings(index, classify(&inputs)),
                }
            })
            .collect()
    }

    fn daily_records(
        timeline: &Timeline<'_>,
        forecast: &RawForecast,
        windows: &[SunMoonWindow],
    ) -> Result<Vec<DailyRecord>> {
        let daily = &forecast.daily;
        daily
            .time
            .iter()
            .enumerate()
            .map(|(i, source_date)| {
                let start = i * HOURS_PER_DAY;
                let reduced = |field| timeline.reduce(field, start).unwrap_or_default();

                let precipitation = reduced(Field::Precipitation);
                let probability = reduced(Field::PrecipitationProbability);
                let inputs = ConditionInputs::daily(
                    precipitation,
                    probability,
                    reduced(Field::Temperature),
                    reduced(Field::CloudCover),
                );

                // Daily feed dates are one day behind the display convention.
                let date = source_date.succ_opt().ok_or_else(|| {
                    SkyviewError::parse(format!("daily date {source_date} has no successor"))
                })?;

                Ok(DailyRecord {
                    date,
                    label: date.format("%-m/%-d/%Y").to_string(),
                    high: round_half_up(daily.temperature_max[i]),
                    low: round_half_up(daily.temperature_min[i]),
                    sun_moon: windows[i].clone(),
                    readings: Readings {
                        condition: classify(&inputs),
                        precipitation_probability: round_half_up(probability),
                        precipitation: round_to(precipitation, 2),
                        wind_speed: wind_speed_mph(reduced(Field::WindSpeed)),
                        wind_direction: WindDirection::from_degrees(reduced(Field::WindDirection)),
                        uv_index: round_half_up(reduced(Field::UvIndex)),
                        aqi: timeline.reduce(Field::UsAqi, start),
                        visibility: visibility_miles(reduced(Field::Visibility)),
                        humidity: round_half_up(reduced(Field::Humidity)),
                        pressure: round_half_up(reduced(Field::Pressure)),
                    },
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::DailySeries;
    use chrono::{Duration, NaiveDate};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn at(day: i64, hour: i64) -> NaiveDateTime {
        start() + Duration::days(day) + Duration::hours(hour)
    }

    /// Dry, clear feed with sunrise 06:00 and sunset 20:00 every day
    fn sample_forecast(days: usize) -> (RawForecast, AirQualitySeries) {
        let hours = days * HOURS_PER_DAY;
        let hourly = HourlySeries {
            time: (0..hours).map(|h| start() + Duration::hours(h as i64)).collect(),
            temperature: (0..hours).map(|h| 15.0 + (h % 24) as f64 / 2.0).collect(),
            precipitation: vec![0.0; hours],
            precipitation_probability: vec![0.0; hours],
            wind_speed: vec![16.1; hours],
            wind_direction: vec![90.0; hours],
            uv_index: vec![4.4; hours],
            visibility: vec![16_093.4; hours],
            humidity: vec![55.5; hours],
            pressure: vec![1013.4; hours],
            cloud_cover: vec![5.0; hours],
        };
        let daily = DailySeries {
            time: (0..days)
                .map(|d| start().date() + Duration::days(d as i64))
                .collect(),
            temperature_max: vec![26.5; days],
            temperature_min: vec![14.4; days],
            sunrise: (0..days).map(|d| Some(at(d as i64, 6))).collect(),
            sunset: (0..days).map(|d| Some(at(d as i64, 20))).collect(),
        };
        let forecast = RawForecast {
            timezone: "Europe/Berlin".to_string(),
            utc_offset_seconds: 7200,
            hourly,
            daily,
        };
        let air_quality = AirQualitySeries {
            us_aqi: (0..hours).map(|h| Some(h as f64)).collect(),
        };
        (forecast, air_quality)
    }

    fn location() -> Location {
        Location::new(48.137, 11.575, "Munich".to_string())
    }

    #[test]
    fn test_record_counts() {
        let (forecast, aqi) = sample_forecast(7);
        let model = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 9)).unwrap();
        assert_eq!(model.hourly.len(), 24);
        assert_eq!(model.daily.len(), 7);
    }

    #[test]
    fn test_hourly_starts_at_current_hour() {
        let (forecast, aqi) = sample_forecast(2);
        let now = at(0, 14) + Duration::minutes(42);
        let model = ForecastAggregator::aggregate(location(), &forecast, &aqi, now).unwrap();

        assert_eq!(model.current, model.hourly[0]);
        assert_eq!(model.hourly[0].time, at(0, 14));
        assert_eq!(model.hourly[0].hour, 14);
        assert_eq!(model.hourly[0].readings.aqi, Some(14.0));
        // 15 + 14/2
        assert_eq!(model.hourly[0].temperature, 22);
        assert_eq!(model.hourly[10].hour, 0);
        assert_eq!(model.hourly[10].time, at(1, 0));
        assert_eq!(model.hourly[23].readings.aqi, Some(37.0));
    }

    #[test]
    fn test_hourly_unit_conversions() {
        let (forecast, aqi) = sample_forecast(2);
        let model = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 12)).unwrap();
        let readings = &model.hourly[0].readings;
        assert_eq!(readings.wind_speed, 10);
        assert_eq!(readings.wind_direction, WindDirection::E);
        assert_eq!(readings.uv_index, 4);
        assert_eq!(readings.visibility, 10);
        assert_eq!(readings.humidity, 56);
        assert_eq!(readings.pressure, 1013);
        assert_eq!(readings.precipitation, 0.0);
    }

    #[test]
    fn test_hourly_night_uses_dawn_and_dusk() {
        let (forecast, aqi) = sample_forecast(2);
        let model = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 0)).unwrap();
        let condition = |hour: usize| model.hourly[hour].readings.condition;
        assert_eq!(condition(5), ConditionSymbol::ClearNight);
        // Dawn is 05:30, so 06:00 is already day
        assert_eq!(condition(6), ConditionSymbol::ClearDay);
        // Dusk is 20:30
        assert_eq!(condition(20), ConditionSymbol::ClearDay);
        assert_eq!(condition(21), ConditionSymbol::ClearNight);
    }

    #[test]
    fn test_next_day_hours_use_todays_window() {
        let (mut forecast, aqi) = sample_forecast(2);
        // Day 1 has its own, much earlier sunrise; it must not affect hourly records
        forecast.daily.sunrise[1] = Some(at(1, 4));
        let model = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 12)).unwrap();
        // Today's dawn is 05:30 and dusk 20:30
        assert_eq!(model.hourly[16].time, at(1, 4));
        assert_eq!(model.hourly[16].readings.condition, ConditionSymbol::ClearNight);
        assert_eq!(model.hourly[17].time, at(1, 5));
        assert_eq!(model.hourly[17].readings.condition, ConditionSymbol::ClearNight);
        // Next-day hours compare against today's timestamps, so 08:00 is
        // after today's dusk
        assert_eq!(model.hourly[20].time, at(1, 8));
        assert_eq!(model.hourly[20].readings.condition, ConditionSymbol::ClearNight);
        assert_eq!(model.daily[1].sun_moon.sunrise, at(1, 4));
    }

    #[test]
    fn test_daily_condition_uses_first_slot_temperature() {
        let (mut forecast, aqi) = sample_forecast(1);
        forecast.hourly.temperature[0] = -3.0;
        forecast.hourly.precipitation_probability = vec![35.0; HOURS_PER_DAY];
        let model = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 0)).unwrap();

        assert_eq!(model.daily[0].readings.condition, ConditionSymbol::SnowLight);
        assert_eq!(model.hourly[0].readings.condition, ConditionSymbol::SnowLight);
        assert!(
            model.hourly[1..]
                .iter()
                .all(|h| h.readings.condition == ConditionSymbol::RainLight)
        );
    }

    #[test]
    fn test_daily_date_is_shifted_one_day() {
        let (forecast, aqi) = sample_forecast(2);
        let model = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 0)).unwrap();
        assert_eq!(model.daily[0].date, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        assert_eq!(model.daily[0].label, "6/2/2024");
        assert_eq!(model.daily[1].label, "6/3/2024");
        assert_eq!(model.daily[0].high, 27);
        assert_eq!(model.daily[0].low, 14);
    }

    #[test]
    fn test_daily_reducers() {
        let (mut forecast, mut aqi) = sample_forecast(2);
        // Day 1 occupies indices 24..48
        forecast.hourly.precipitation_probability[30] = 40.0;
        forecast.hourly.precipitation_probability[31] = 20.0;
        forecast.hourly.precipitation[40] = 0.456;
        for slot in 24..48 {
            forecast.hourly.cloud_cover[slot] = if slot < 36 { 100.0 } else { 0.0 };
        }
        forecast.hourly.wind_speed[24] = 32.2;
        forecast.hourly.wind_speed[25] = 100.0;
        aqi.us_aqi[24] = None;

        let model = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 0)).unwrap();
        let day = &model.daily[1].readings;
        assert_eq!(day.precipitation_probability, 40);
        assert_eq!(day.precipitation, 0.46);
        // mean cloud cover 50% with 40% chance of rain -> light rain
        assert_eq!(day.condition, ConditionSymbol::RainLight);
        assert_eq!(day.wind_speed, 20);
        assert_eq!(day.aqi, None);
        assert_eq!(model.daily[0].readings.condition, ConditionSymbol::ClearDay);
    }

    #[test]
    fn test_daily_mean_cloud_cover_drives_condition() {
        let (mut forecast, aqi) = sample_forecast(1);
        for slot in 0..24 {
            forecast.hourly.cloud_cover[slot] = if slot < 12 { 100.0 } else { 0.0 };
        }
        let model = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 0)).unwrap();
        assert_eq!(model.daily[0].readings.condition, ConditionSymbol::PartlyCloudyDay);
    }

    #[test]
    fn test_daily_condition_never_night() {
        let (mut forecast, aqi) = sample_forecast(1);
        // Sun never up during the day's hours
        forecast.daily.sunrise[0] = Some(at(0, 23));
        forecast.daily.sunset[0] = Some(at(0, 23) + Duration::minutes(30));
        let model = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 0)).unwrap();
        assert!(model.hourly.iter().take(20).all(|h| h.readings.condition == ConditionSymbol::ClearNight));
        assert_eq!(model.daily[0].readings.condition, ConditionSymbol::ClearDay);
    }

    #[test]
    fn test_sun_moon_is_day_zero_window() {
        let (forecast, aqi) = sample_forecast(2);
        let model = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 3)).unwrap();
        assert_eq!(model.sun_moon.dawn, at(0, 5) + Duration::minutes(30));
        assert_eq!(model.sun_moon.dusk, at(0, 20) + Duration::minutes(30));
        assert_eq!(model.sun_moon.day_length, "14h 0m");
        assert_eq!(model.sun_moon.night_length, "10h 0m");
        assert_eq!(model.daily[1].sun_moon.sunrise, at(1, 6));
    }

    #[test]
    fn test_missing_sun_events_are_estimated() {
        let (mut forecast, aqi) = sample_forecast(1);
        forecast.daily.sunset[0] = None;
        let model = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 0)).unwrap();
        assert_eq!(model.sun_moon.sunrise, at(0, 6));
        // Munich sets after 20:00 local in June
        assert!(model.sun_moon.sunset > at(0, 20));
        assert!(model.sun_moon.sunset < at(0, 22));
    }

    #[test]
    fn test_insufficient_hourly_data() {
        let (forecast, aqi) = sample_forecast(1);
        // 13:00 needs 37 hourly entries, only 24 exist
        let err = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 13)).unwrap_err();
        match err {
            SkyviewError::InsufficientData {
                series,
                required,
                available,
            } => {
                assert_eq!(series, "hourly.time");
                assert_eq!(required, 37);
                assert_eq!(available, 24);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_air_quality_series() {
        let (forecast, mut aqi) = sample_forecast(3);
        aqi.us_aqi.truncate(30);
        // 12:00 needs AQI through index 35
        let err = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 12)).unwrap_err();
        assert!(matches!(
            err,
            SkyviewError::InsufficientData { ref series, required: 36, available: 30 }
                if series == "hourly.us_aqi"
        ));
    }

    #[test]
    fn test_air_quality_shorter_than_forecast() {
        let (forecast, mut aqi) = sample_forecast(3);
        aqi.us_aqi.truncate(48);
        let model = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 0)).unwrap();
        assert_eq!(model.daily.len(), 3);
        assert_eq!(model.daily[1].readings.aqi, Some(24.0));
        assert_eq!(model.daily[2].readings.aqi, None);
        assert_eq!(model.hourly[23].readings.aqi, Some(23.0));
    }

    #[test]
    fn test_empty_daily_series() {
        let (mut forecast, aqi) = sample_forecast(2);
        forecast.daily = DailySeries::default();
        let err = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 0)).unwrap_err();
        assert!(matches!(err, SkyviewError::InsufficientData { ref series, .. } if series == "daily.time"));
    }

    #[test]
    fn test_short_daily_array() {
        let (mut forecast, aqi) = sample_forecast(2);
        forecast.daily.temperature_min.pop();
        let err = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 0)).unwrap_err();
        assert!(matches!(
            err,
            SkyviewError::InsufficientData { ref series, .. } if series == "daily.temperature_2m_min"
        ));
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let (forecast, aqi) = sample_forecast(3);
        let first = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 7)).unwrap();
        let second = ForecastAggregator::aggregate(location(), &forecast, &aqi, at(0, 7)).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_reducer_table() {
        assert_eq!(daily_reducer(Field::PrecipitationProbability), Reducer::Max);
        assert_eq!(daily_reducer(Field::Precipitation), Reducer::Max);
        assert_eq!(daily_reducer(Field::CloudCover), Reducer::Mean);
        assert_eq!(daily_reducer(Field::Temperature), Reducer::First);
        assert_eq!(daily_reducer(Field::Humidity), Reducer::First);
        assert_eq!(daily_reducer(Field::UsAqi), Reducer::First);
    }

    #[test]
    fn test_reducers_skip_gaps() {
        let slots = [Some(2.0), None, Some(6.0), Some(1.0)];
        assert_eq!(Reducer::Max.apply(&slots), Some(6.0));
        assert_eq!(Reducer::Mean.apply(&slots), Some(3.0));
        assert_eq!(Reducer::First.apply(&slots), Some(2.0));
        assert_eq!(Reducer::First.apply(&[None, Some(1.0)]), None);
        assert_eq!(Reducer::Mean.apply(&[]), None);
    }
}
