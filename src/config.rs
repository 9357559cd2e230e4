//! Configuration management for `Skyview`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SkyviewError;
use crate::radar::{DEFAULT_RADAR_HOST, DEFAULT_WINDOW_SECONDS, RadarFrameSelector};
use crate::tiles::{
    DEFAULT_BASEMAP_TEMPLATE, DEFAULT_COLOR_SCHEME, DEFAULT_TILE_OPTIONS, DEFAULT_ZOOM, TILE_SIZE,
    TileGeoReferencer,
};
use crate::units::{PressureUnit, TemperatureUnit, TimeFormat, UnitPreferences};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Deepest zoom the radar tile cache serves
pub const MAX_ZOOM: u8 = 19;
/// Largest accepted radar window, one day
pub const MAX_WINDOW_SECONDS: i64 = 24 * 60 * 60;

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const VALID_LOG_FORMATS: [&str; 2] = ["pretty", "compact"];
const VALID_TILE_SIZES: [u32; 2] = [256, 512];

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkyviewConfig {
    /// Radar tiles and frame window
    #[serde(default)]
    pub radar: RadarConfig,
    /// Static base map tiles
    #[serde(default)]
    pub basemap: BasemapConfig,
    /// Display units
    #[serde(default)]
    pub units: UnitsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Radar configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarConfig {
    /// Tile zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    /// Half-width of the frame window in seconds
    #[serde(default = "default_window_seconds")]
    pub window_seconds: i64,
    /// Tile edge length in pixels
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Radar tile host
    #[serde(default = "default_radar_host")]
    pub host: String,
    /// Colour scheme index
    #[serde(default = "default_color_scheme")]
    pub color_scheme: u8,
    /// Smoothing and snow options, e.g. `1_1`
    #[serde(default = "default_tile_options")]
    pub options: String,
}

/// Base map configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasemapConfig {
    /// Tile URL with `{z}`, `{x}` and `{y}` placeholders
    #[serde(default = "default_basemap_template")]
    pub tile_url: String,
}

/// Display unit settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitsConfig {
    /// Locale used to pick defaults, e.g. `en-US`
    pub locale: Option<String>,
    #[serde(default)]
    pub temperature: Option<TemperatureUnit>,
    #[serde(default)]
    pub time: Option<TimeFormat>,
    #[serde(default)]
    pub pressure: Option<PressureUnit>,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

fn default_window_seconds() -> i64 {
    DEFAULT_WINDOW_SECONDS
}

fn default_tile_size() -> u32 {
    TILE_SIZE
}

fn default_radar_host() -> String {
    DEFAULT_RADAR_HOST.to_string()
}

fn default_color_scheme() -> u8 {
    DEFAULT_COLOR_SCHEME
}

fn default_tile_options() -> String {
    DEFAULT_TILE_OPTIONS.to_string()
}

fn default_basemap_template() -> String {
    DEFAULT_BASEMAP_TEMPLATE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
            window_seconds: default_window_seconds(),
            tile_size: default_tile_size(),
            host: default_radar_host(),
            color_scheme: default_color_scheme(),
            options: default_tile_options(),
        }
    }
}

impl Default for BasemapConfig {
    fn default() -> Self {
        Self {
            tile_url: default_basemap_template(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl RadarConfig {
    /// Tile referencer for the configured zoom, size and tile style
    #[must_use]
    pub fn referencer(&self) -> TileGeoReferencer {
        TileGeoReferencer::new(self.zoom)
            .with_tile_size(self.tile_size)
            .with_radar_host(self.host.clone())
            .with_style(self.color_scheme, self.options.clone())
    }

    /// Frame selector for the configured window
    #[must_use]
    pub fn selector(&self) -> RadarFrameSelector {
        RadarFrameSelector::new(self.window_seconds)
    }
}

impl UnitsConfig {
    /// Locale defaults with explicit per-unit overrides applied
    #[must_use]
    pub fn preferences(&self) -> UnitPreferences {
        let base = self
            .locale
            .as_deref()
            .map(UnitPreferences::for_locale)
            .unwrap_or_default();
        UnitPreferences {
            temperature: self.temperature.unwrap_or(base.temperature),
            time: self.time.unwrap_or(base.time),
            pressure: self.pressure.unwrap_or(base.pressure),
        }
    }
}

impl SkyviewConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // SKYVIEW_RADAR__ZOOM=10 overrides radar.zoom
        builder = builder.add_source(
            Environment::with_prefix("SKYVIEW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SkyviewConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from {}", config_file.display()))?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skyview").join("config.toml"))
    }

    /// Apply default values to empty or zeroed configuration fields
    pub fn apply_defaults(&mut self) {
        if self.radar.window_seconds == 0 {
            self.radar.window_seconds = default_window_seconds();
        }
        if self.radar.tile_size == 0 {
            self.radar.tile_size = default_tile_size();
        }
        if self.radar.host.is_empty() {
            self.radar.host = default_radar_host();
        }
        if self.radar.options.is_empty() {
            self.radar.options = default_tile_options();
        }
        if self.basemap.tile_url.is_empty() {
            self.basemap.tile_url = default_basemap_template();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.radar.zoom > MAX_ZOOM {
            return Err(SkyviewError::config(format!(
                "Radar zoom cannot exceed {MAX_ZOOM}, got {}",
                self.radar.zoom
            ))
            .into());
        }

        if !(1..=MAX_WINDOW_SECONDS).contains(&self.radar.window_seconds) {
            return Err(SkyviewError::config(format!(
                "Radar window must be between 1 and {MAX_WINDOW_SECONDS} seconds, got {}",
                self.radar.window_seconds
            ))
            .into());
        }

        if !VALID_TILE_SIZES.contains(&self.radar.tile_size) {
            return Err(SkyviewError::config(format!(
                "Invalid tile size {}. Must be 256 or 512",
                self.radar.tile_size
            ))
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(SkyviewError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            ))
            .into());
        }

        if !VALID_LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(SkyviewError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                VALID_LOG_FORMATS.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Radar host", &self.radar.host),
            ("Base map tile URL", &self.basemap.tile_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(
                    SkyviewError::config(format!("{name} must be a valid HTTP or HTTPS URL")).into(),
                );
            }
        }

        Ok(())
    }
}
