//! Grid shape and extent for lon/lat/lev wind grids.

use serde::{Deserialize, Serialize};

/// Number of points along each grid axis.
///
/// Values are laid out row-major with level slowest, then latitude, then
/// longitude: `index = lev * lat_count * lon_count + lat * lon_count + lon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub lon: usize,
    pub lat: usize,
    pub lev: usize,
}

impl Dimensions {
    pub fn new(lon: usize, lat: usize, lev: usize) -> Self {
        Self { lon, lat, lev }
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.lon * self.lat * self.lev
    }

    /// Check if any axis is empty.
    pub fn is_empty(&self) -> bool {
        self.lon == 0 || self.lat == 0 || self.lev == 0
    }

    /// Flat array offset of a grid cell.
    pub fn flat_index(&self, lon: usize, lat: usize, lev: usize) -> usize {
        lev * self.lat * self.lon + lat * self.lon + lon
    }

    /// Axis counts as a `[lon, lat, lev]` triple.
    pub fn as_array(&self) -> [usize; 3] {
        [self.lon, self.lat, self.lev]
    }
}

/// Minimum/maximum corners of a wind grid, in coordinate units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min_lon: f32,
    pub max_lon: f32,
    pub min_lat: f32,
    pub max_lat: f32,
    pub min_lev: f32,
    pub max_lev: f32,
}

impl GridBounds {
    /// `[lon, lat, lev]` minimum corner.
    pub fn minimum(&self) -> [f32; 3] {
        [self.min_lon, self.min_lat, self.min_lev]
    }

    /// `[lon, lat, lev]` maximum corner.
    pub fn maximum(&self) -> [f32; 3] {
        [self.max_lon, self.max_lat, self.max_lev]
    }

    /// Whether the horizontal position lies inside the grid's lon/lat extent.
    pub fn contains_lon_lat(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon as f64
            && lon <= self.max_lon as f64
            && lat >= self.min_lat as f64
            && lat <= self.max_lat as f64
    }

    /// Whether the grid uses a `[0, 360)` longitude convention.
    pub fn uses_positive_longitudes(&self) -> bool {
        self.max_lon > 180.0
    }
}
