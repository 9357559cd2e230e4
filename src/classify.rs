//! Weather condition classification
//!
//! Maps precipitation, cloud cover and temperature onto a small set of
//! display symbols. The rules are evaluated in order and the first match
//! wins, so an hour with heavy rain under full overcast is rain, not
//! overcast.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Precipitation amount (mm/h) that selects the heavy branch
pub const HEAVY_PRECIPITATION_MM: f64 = 1.0;
/// Precipitation probability (%) that selects the heavy branch
pub const HEAVY_PROBABILITY: f64 = 50.0;
/// Probability (%) within the heavy branch that selects heavy rain
pub const STORM_PROBABILITY: f64 = 70.0;
/// Precipitation amount (mm/h) that selects the light branch
pub const LIGHT_PRECIPITATION_MM: f64 = 0.1;
/// Precipitation probability (%) that selects the light branch
pub const LIGHT_PROBABILITY: f64 = 30.0;
/// Cloud cover (%) at or above which the sky is overcast
pub const OVERCAST_CLOUD_COVER: f64 = 80.0;
/// Cloud cover (%) at or above which the sky is partly cloudy
pub const PARTLY_CLOUDY_COVER: f64 = 30.0;
/// Precipitation below this temperature (°C) is snow
pub const FREEZING_CELSIUS: f64 = 0.0;

/// Discrete weather condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionSymbol {
    SnowHeavy,
    RainHeavy,
    SnowLight,
    RainLight,
    Overcast,
    PartlyCloudyDay,
    PartlyCloudyNight,
    ClearNight,
    ClearDay,
}

impl ConditionSymbol {
    /// Glyph shown on forecast cards
    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            ConditionSymbol::SnowHeavy | ConditionSymbol::SnowLight => "🌨️",
            ConditionSymbol::RainHeavy => "⛈️",
            ConditionSymbol::RainLight => "🌧️",
            ConditionSymbol::Overcast | ConditionSymbol::PartlyCloudyNight => "☁️",
            ConditionSymbol::PartlyCloudyDay => "⛅",
            ConditionSymbol::ClearNight => "🌙",
            ConditionSymbol::ClearDay => "☀️",
        }
    }

    /// Short description
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            ConditionSymbol::SnowHeavy => "Snow",
            ConditionSymbol::RainHeavy => "Heavy rain",
            ConditionSymbol::SnowLight => "Light snow",
            ConditionSymbol::RainLight => "Rain",
            ConditionSymbol::Overcast => "Overcast",
            ConditionSymbol::PartlyCloudyDay | ConditionSymbol::PartlyCloudyNight => {
                "Partly cloudy"
            }
            ConditionSymbol::ClearNight => "Clear night",
            ConditionSymbol::ClearDay => "Clear",
        }
    }
}

impl fmt::Display for ConditionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

/// Values the classifier looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionInputs {
    /// Precipitation amount in mm/h
    pub precipitation: f64,
    /// Precipitation probability in percent
    pub precipitation_probability: f64,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Cloud cover in percent
    pub cloud_cover: f64,
    /// Whether the hour falls outside the dawn-dusk window
    pub is_night: bool,
    /// Whole-day aggregate; never rendered with a night variant
    pub is_daily_aggregate: bool,
}

impl ConditionInputs {
    /// Inputs for a single forecast hour
    #[must_use]
    pub fn hourly(
        precipitation: f64,
        precipitation_probability: f64,
        temperature: f64,
        cloud_cover: f64,
        is_night: bool,
    ) -> Self {
        Self {
            precipitation,
            precipitation_probability,
            temperature,
            cloud_cover,
            is_night,
            is_daily_aggregate: false,
        }
    }

    /// Inputs for a daily aggregate
    #[must_use]
    pub fn daily(
        precipitation: f64,
        precipitation_probability: f64,
        temperature: f64,
        cloud_cover: f64,
    ) -> Self {
        Self {
            precipitation,
            precipitation_probability,
            temperature,
            cloud_cover,
            is_night: false,
            is_daily_aggregate: true,
        }
    }

    fn night(&self) -> bool {
        self.is_night && !self.is_daily_aggregate
    }

    fn freezing(&self) -> bool {
        self.temperature < FREEZING_CELSIUS
    }
}

/// Guarded classification rule
struct Rule {
    name: &'static str,
    applies: fn(&ConditionInputs) -> bool,
    symbol: fn(&ConditionInputs) -> ConditionSymbol,
}

/// Evaluated top to bottom; order is significant.
const RULES: [Rule; 5] = [
    Rule {
        name: "heavy-precipitation",
        applies: |i| {
            i.precipitation >= HEAVY_PRECIPITATION_MM
                || i.precipitation_probability >= HEAVY_PROBABILITY
        },
        symbol: |i| {
            if i.freezing() {
                ConditionSymbol::SnowHeavy
            } else if i.precipitation_probability >= STORM_PROBABILITY {
                ConditionSymbol::RainHeavy
            } else {
                ConditionSymbol::RainLight
            }
        },
    },
    Rule {
        name: "light-precipitation",
        applies: |i| {
            i.precipitation >= LIGHT_PRECIPITATION_MM
                || i.precipitation_probability >= LIGHT_PROBABILITY
        },
        symbol: |i| {
            if i.freezing() {
                ConditionSymbol::SnowLight
            } else {
                ConditionSymbol::RainLight
            }
        },
    },
    Rule {
        name: "overcast",
        applies: |i| i.cloud_cover >= OVERCAST_CLOUD_COVER,
        symbol: |_| ConditionSymbol::Overcast,
    },
    Rule {
        name: "partly-cloudy",
        applies: |i| i.cloud_cover >= PARTLY_CLOUDY_COVER,
        symbol: |i| {
            if i.night() {
                ConditionSymbol::PartlyCloudyNight
            } else {
                ConditionSymbol::PartlyCloudyDay
            }
        },
    },
    Rule {
        name: "clear",
        applies: |_| true,
        symbol: |i| {
            if i.night() {
                ConditionSymbol::ClearNight
            } else {
                ConditionSymbol::ClearDay
            }
        },
    },
];

/// Classify inputs into a condition symbol
#[must_use]
pub fn classify(inputs: &ConditionInputs) -> ConditionSymbol {
    RULES
        .iter()
        .find(|rule| (rule.applies)(inputs))
        .map_or(ConditionSymbol::ClearDay, |rule| {
            tracing::trace!(rule = rule.name, "condition rule matched");
            (rule.symbol)(inputs)
        })
}
