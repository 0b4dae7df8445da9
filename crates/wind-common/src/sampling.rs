//! Nearest-neighbour wind sampling at geographic points.
//!
//! This is a surface probe for UI display: it always reads level 0 and never
//! interpolates between cells.

use serde::{Deserialize, Serialize};

use crate::dataset::{CoordinateAxis, WindFieldDataset};

/// Wind vector at a point, in the dataset's units (m/s for GFS).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindVector {
    pub u: f32,
    pub v: f32,
}

impl WindVector {
    pub const ZERO: WindVector = WindVector { u: 0.0, v: 0.0 };

    /// Horizontal wind speed.
    pub fn speed(&self) -> f32 {
        self.u.hypot(self.v)
    }
}

/// Sample the surface wind vector nearest to `(lon, lat)`.
///
/// Longitude is folded into the dataset's own convention (`[0, 360)` when the
/// grid extends past 180°, `[-180, 180)` otherwise) and latitude is clamped to
/// `[-90, 90]`. Points outside the grid's recorded extent yield
/// [`WindVector::ZERO`]; that is a normal no-signal answer, not an error.
pub fn sample_vector(dataset: &WindFieldDataset, lon: f64, lat: f64) -> WindVector {
    let bounds = dataset.bounds();

    let lon = if bounds.uses_positive_longitudes() {
        lon.rem_euclid(360.0)
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    };
    let lat = lat.clamp(-90.0, 90.0);

    if !bounds.contains_lon_lat(lon, lat) {
        return WindVector::ZERO;
    }

    let lon_index = nearest_index(dataset.lon(), lon);
    let lat_index = nearest_index(dataset.lat(), lat);

    let offset = dataset.dimensions().flat_index(lon_index, lat_index, 0);
    match (dataset.u().values().get(offset), dataset.v().values().get(offset)) {
        (Some(&u), Some(&v)) => WindVector { u, v },
        _ => WindVector::ZERO,
    }
}

/// Map a coordinate to the nearest index of an evenly spaced axis.
fn nearest_index(axis: &CoordinateAxis, value: f64) -> usize {
    let count = axis.len();
    if count <= 1 {
        return 0;
    }

    let min = axis.min() as f64;
    let step = (axis.max() as f64 - min) / (count - 1) as f64;
    if step <= 0.0 {
        return 0;
    }

    let index = ((value - min) / step).round();
    index.clamp(0.0, (count - 1) as f64) as usize
}
