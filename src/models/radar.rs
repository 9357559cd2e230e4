//! Radar frame and map tile models

use serde::{Deserialize, Serialize};
use std::fmt;

/// One radar snapshot published by the radar feed
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct RadarFrame {
    /// Unix timestamp in seconds
    pub time: i64,
    /// Opaque snapshot path, e.g. `/v2/radar/1717243200`
    pub path: String,
}

impl RadarFrame {
    #[must_use]
    pub fn new<S: Into<String>>(time: i64, path: S) -> Self {
        Self {
            time,
            path: path.into(),
        }
    }
}

/// Slippy-map tile index at a fixed zoom
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoordinate {
    pub x: i64,
    pub y: i64,
}

impl TileCoordinate {
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.x, self.y)
    }
}
