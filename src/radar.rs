//! Radar frame selection
//!
//! Merges the radar feed's past and nowcast frames and keeps the ones
//! within a fixed window around the frame closest to "now".

use crate::Result;
use crate::models::RadarFrame;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Half-width of the selection window in seconds
pub const DEFAULT_WINDOW_SECONDS: i64 = 2 * 60 * 60;

/// Radar feed listing the available snapshots
pub const RAINVIEWER_MAPS_URL: &str = "https://api.rainviewer.com/public/weather-maps.json";
pub const DEFAULT_RADAR_HOST: &str = "https://tilecache.rainviewer.com";

/// Decoded radar feed: tile host plus past and nowcast frames
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RadarFeed {
    #[serde(default = "default_host")]
    pub host: String,
    pub radar: RadarFrames,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RadarFrames {
    #[serde(default)]
    pub past: Vec<RadarFrame>,
    #[serde(default)]
    pub nowcast: Vec<RadarFrame>,
}

fn default_host() -> String {
    DEFAULT_RADAR_HOST.to_string()
}

impl RadarFeed {
    /// Decode a RainViewer `weather-maps.json` payload
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Time-windows radar frames around "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadarFrameSelector {
    window_seconds: i64,
}

impl Default for RadarFrameSelector {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SECONDS)
    }
}

impl RadarFrameSelector {
    #[must_use]
    pub fn new(window_seconds: i64) -> Self {
        Self { window_seconds }
    }

    #[must_use]
    pub fn window_seconds(&self) -> i64 {
        self.window_seconds
    }

    /// Merge, sort and window the frames.
    ///
    /// The pivot is the first frame at or after `now` (unix seconds), or
    /// `now` itself when every frame is older. Frames within the window on
    /// either side of the pivot are kept, bounds inclusive. An empty result
    /// means there is no radar coverage for this period.
    #[must_use]
    #[instrument(skip(self, past, forecast), fields(past = past.len(), forecast = forecast.len()))]
    pub fn select(&self, past: &[RadarFrame], forecast: &[RadarFrame], now: i64) -> Vec<RadarFrame> {
        let mut frames: Vec<RadarFrame> = past.iter().chain(forecast).cloned().collect();
        frames.sort_by_key(|frame| frame.time);

        let pivot = frames
            .iter()
            .find(|frame| frame.time >= now)
            .map_or(now, |frame| frame.time);

        let earliest = pivot - self.window_seconds;
        let latest = pivot + self.window_seconds;
        frames.retain(|frame| (earliest..=latest).contains(&frame.time));

        debug!("Selected {} radar frames around {}", frames.len(), pivot);
        frames
    }

    /// Select frames from a decoded feed
    #[must_use]
    pub fn select_from_feed(&self, feed: &RadarFeed, now: i64) -> Vec<RadarFrame> {
        self.select(&feed.radar.past, &feed.radar.nowcast, now)
    }
}
