//! Data models for the Skyview pipeline
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and metadata
//! - Forecast: Hourly/daily records, sun window and the assembled model
//! - Radar: Radar frames and slippy-map tile coordinates

pub mod forecast;
pub mod location;
pub mod radar;

// Re-export all public types for convenient access
pub use forecast::{DailyRecord, ForecastModel, HourlyRecord, SunMoonWindow};
pub use location::Location;
pub use radar::{RadarFrame, TileCoordinate};
