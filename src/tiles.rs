//! Slippy-map tile georeferencing
//!
//! Converts a latitude/longitude into Web Mercator tile indices and picks
//! the 2×2 block of tiles that keeps the point near the middle of the
//! rendered map.
//!
//! Known limitations: longitudes are not wrapped at the antimeridian, so a
//! grid next to it can reference tile columns outside `0..2^zoom`.
//! Latitudes must lie strictly inside ±85.0511°, where the projection stays
//! finite.

use crate::models::TileCoordinate;
use crate::{Result, SkyviewError};
use serde::Serialize;
use tracing::debug;

/// Zoom used for the radar map
pub const DEFAULT_ZOOM: u8 = 9;
/// Edge length of a tile in pixels
pub const TILE_SIZE: u32 = 256;
/// Largest latitude the Web Mercator tiling covers
pub const MAX_LATITUDE: f64 = 85.051_128_78;
/// OpenStreetMap base map tiles
pub const DEFAULT_BASEMAP_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
/// RainViewer tile colour scheme
pub const DEFAULT_COLOR_SCHEME: u8 = 2;
/// RainViewer tile options: smoothed, with snow colours
pub const DEFAULT_TILE_OPTIONS: &str = "1_1";

/// Web Mercator projection utilities
pub struct WebMercator;

impl WebMercator {
    /// Convert latitude to a fractional tile row
    #[must_use]
    pub fn lat_to_y(lat: f64, zoom: u8) -> f64 {
        let lat_rad = lat.to_radians();
        let n = 2_f64.powi(i32::from(zoom));
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0;
        y * n
    }

    /// Convert longitude to a fractional tile column
    #[must_use]
    pub fn lon_to_x(lon: f64, zoom: u8) -> f64 {
        let n = 2_f64.powi(i32::from(zoom));
        ((lon + 180.0) / 360.0) * n
    }

    /// Latitude and longitude of the north-west corner of tile `(x, y)`
    #[allow(clippy::cast_precision_loss, reason = "tile indices are far below 2^52")]
    #[must_use]
    pub fn tile_corner(x: i64, y: i64, zoom: u8) -> (f64, f64) {
        let n = 2_f64.powi(i32::from(zoom));
        let mercator = std::f64::consts::PI * (1.0 - 2.0 * y as f64 / n);
        (mercator.sinh().atan().to_degrees(), x as f64 * 360.0 / n - 180.0)
    }
}

/// Geographic extent covered by a tile grid, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl GeoBounds {
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south..=self.north).contains(&latitude) && (self.west..=self.east).contains(&longitude)
    }
}

/// Builds radar tile URLs for one snapshot path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileUrlBuilder {
    host: String,
    path: String,
    tile_size: u32,
    zoom: u8,
    color_scheme: u8,
    options: String,
}

impl TileUrlBuilder {
    /// URL of the radar tile at `(x, y)`
    #[must_use]
    pub fn url(&self, x: i64, y: i64) -> String {
        format!(
            "{}{}/{}/{}/{}/{}/{}/{}.png",
            self.host, self.path, self.tile_size, self.zoom, x, y, self.color_scheme, self.options
        )
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// 2×2 block of tiles around a point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileGrid {
    pub zoom: u8,
    /// Tile containing the point
    pub base: TileCoordinate,
    /// Top-left, top-right, bottom-left, bottom-right
    pub tiles: [TileCoordinate; 4],
    /// Present when the grid was built for a radar snapshot
    #[serde(skip)]
    pub url_builder: Option<TileUrlBuilder>,
}

impl TileGrid {
    /// Radar tile URLs in grid order, if bound to a snapshot
    #[must_use]
    pub fn radar_urls(&self) -> Option<Vec<String>> {
        self.url_builder
            .as_ref()
            .map(|builder| self.tiles.iter().map(|t| builder.url(t.x, t.y)).collect())
    }

    /// Area spanned by the four tiles, for placing markers over the map
    #[must_use]
    pub fn bounds(&self) -> GeoBounds {
        let origin = self.tiles[0];
        let (north, west) = WebMercator::tile_corner(origin.x, origin.y, self.zoom);
        let (south, east) = WebMercator::tile_corner(origin.x + 2, origin.y + 2, self.zoom);
        GeoBounds { north, south, west, east }
    }

    /// Base map tile URLs in grid order for a `{z}/{x}/{y}` template
    #[must_use]
    pub fn basemap_urls(&self, template: &str) -> Vec<String> {
        self.tiles
            .iter()
            .map(|t| {
                template
                    .replace("{z}", &self.zoom.to_string())
                    .replace("{x}", &t.x.to_string())
                    .replace("{y}", &t.y.to_string())
            })
            .collect()
    }
}

/// Maps coordinates onto centered tile grids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGeoReferencer {
    zoom: u8,
    tile_size: u32,
    radar_host: String,
    color_scheme: u8,
    options: String,
}

impl Default for TileGeoReferencer {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM)
    }
}

impl TileGeoReferencer {
    #[must_use]
    pub fn new(zoom: u8) -> Self {
        Self {
            zoom,
            tile_size: TILE_SIZE,
            radar_host: crate::radar::DEFAULT_RADAR_HOST.to_string(),
            color_scheme: DEFAULT_COLOR_SCHEME,
            options: DEFAULT_TILE_OPTIONS.to_string(),
        }
    }

    #[must_use]
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    #[must_use]
    pub fn with_radar_host<S: Into<String>>(mut self, host: S) -> Self {
        self.radar_host = host.into();
        self
    }

    #[must_use]
    pub fn with_style<S: Into<String>>(mut self, color_scheme: u8, options: S) -> Self {
        self.color_scheme = color_scheme;
        self.options = options.into();
        self
    }

    #[must_use]
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Grid for the static base map
    pub fn grid(&self, latitude: f64, longitude: f64) -> Result<TileGrid> {
        self.locate(latitude, longitude, None)
    }

    /// Grid bound to a radar snapshot path
    pub fn radar_grid(&self, latitude: f64, longitude: f64, path: &str) -> Result<TileGrid> {
        self.locate(latitude, longitude, Some(path))
    }

    /// Compute the centered 2×2 grid and, with a snapshot path, its URL builder
    #[allow(clippy::cast_possible_truncation, reason = "tile indices fit in i64 up to zoom 30")]
    pub fn locate(&self, latitude: f64, longitude: f64, path: Option<&str>) -> Result<TileGrid> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || latitude.abs() >= MAX_LATITUDE
        {
            return Err(SkyviewError::invalid_coordinate(latitude, longitude));
        }

        let exact_x = WebMercator::lon_to_x(longitude, self.zoom);
        let exact_y = WebMercator::lat_to_y(latitude, self.zoom);
        let base_x = exact_x.floor();
        let base_y = exact_y.floor();

        let left = base_x as i64 - i64::from(exact_x - base_x <= 0.5);
        let top = base_y as i64 - i64::from(exact_y - base_y <= 0.5);
        let tiles = [
            TileCoordinate::new(left, top),
            TileCoordinate::new(left + 1, top),
            TileCoordinate::new(left, top + 1),
            TileCoordinate::new(left + 1, top + 1),
        ];

        debug!(
            "Located ({}, {}) at tile {:.3}/{:.3}, grid origin {}/{}",
            latitude, longitude, exact_x, exact_y, left, top
        );

        Ok(TileGrid {
            zoom: self.zoom,
            base: TileCoordinate::new(base_x as i64, base_y as i64),
            tiles,
            url_builder: path.map(|path| TileUrlBuilder {
                host: self.radar_host.clone(),
                path: path.to_string(),
                tile_size: self.tile_size,
                zoom: self.zoom,
                color_scheme: self.color_scheme,
                options: self.options.clone(),
            }),
        })
    }
}
