//! `Skyview` - Forecast aggregation and radar tile georeferencing
//!
//! This library turns already-fetched weather, air-quality and radar feed
//! payloads into display-ready forecast models and radar map tiles.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod logging;
pub mod models;
pub mod radar;
pub mod solar;
pub mod tiles;
pub mod units;
pub mod weather;

// Re-export core types for public API
pub use aggregate::ForecastAggregator;
pub use classify::{ConditionInputs, ConditionSymbol, classify};
pub use config::SkyviewConfig;
pub use error::SkyviewError;
pub use geocoding::{LocationInput, LocationParser};
pub use models::{
    DailyRecord, ForecastModel, HourlyRecord, Location, RadarFrame, SunMoonWindow, TileCoordinate,
};
pub use radar::{RadarFeed, RadarFrameSelector};
pub use tiles::{GeoBounds, TileGeoReferencer, TileGrid};
pub use units::{UnitPreferences, WindDirection};
pub use weather::{AirQualitySeries, RawForecast};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkyviewError>;
