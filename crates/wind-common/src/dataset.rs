//! The immutable wind-field dataset.
//!
//! A [`WindFieldDataset`] is built once from a decoded buffer and never
//! mutated afterwards. Replacing the active dataset always swaps the whole
//! value; there are no partial field updates.

use crate::error::{DatasetError, DatasetResult};
use crate::grid::{Dimensions, GridBounds};

/// A coordinate axis with its true extrema.
///
/// The values are not assumed to be monotonic, so `min`/`max` are computed
/// by scanning the whole sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateAxis {
    values: Vec<f32>,
    min: f32,
    max: f32,
}

impl CoordinateAxis {
    pub fn new(values: Vec<f32>) -> Self {
        let (min, max) = values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        Self { values, min, max }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Spacing between grid points assuming an evenly spaced axis.
    ///
    /// Single-point axes report `1.0` so callers never divide by zero.
    pub fn interval(&self) -> f32 {
        if self.values.len() > 1 {
            (self.max - self.min) / (self.values.len() - 1) as f32
        } else {
            1.0
        }
    }
}

/// One wind component (`U` or `V`) and its source-declared value range.
///
/// `min`/`max` come from the source metadata, not from the samples: GPU
/// normalisation must use the declared dynamic range even when individual
/// samples exceed it.
#[derive(Debug, Clone, PartialEq)]
pub struct WindComponent {
    values: Vec<f32>,
    min: f32,
    max: f32,
}

impl WindComponent {
    pub fn new(values: Vec<f32>, min: f32, max: f32) -> Self {
        Self { values, min, max }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Declared minimum.
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Declared maximum.
    pub fn max(&self) -> f32 {
        self.max
    }

    /// `[min, max]` pair as consumed by shader uniforms.
    pub fn range(&self) -> [f32; 2] {
        [self.min, self.max]
    }

    /// Number of samples outside the declared range (NaN counts as outside).
    pub fn out_of_range_count(&self) -> usize {
        self.values
            .iter()
            .filter(|&&v| !(v >= self.min && v <= self.max))
            .count()
    }
}

/// Gridded U/V wind field over a regular lon × lat × lev grid.
#[derive(Debug, Clone, PartialEq)]
pub struct WindFieldDataset {
    dimensions: Dimensions,
    lon: CoordinateAxis,
    lat: CoordinateAxis,
    lev: CoordinateAxis,
    u: WindComponent,
    v: WindComponent,
    run_label: Option<String>,
}

impl WindFieldDataset {
    /// Assemble a dataset, checking every shape invariant.
    pub fn new(
        dimensions: Dimensions,
        lon: CoordinateAxis,
        lat: CoordinateAxis,
        lev: CoordinateAxis,
        u: WindComponent,
        v: WindComponent,
    ) -> DatasetResult<Self> {
        for (name, count) in [
            ("lon", dimensions.lon),
            ("lat", dimensions.lat),
            ("lev", dimensions.lev),
        ] {
            if count == 0 {
                return Err(DatasetError::EmptyDimension(name));
            }
        }

        for (name, expected, axis) in [
            ("lon", dimensions.lon, &lon),
            ("lat", dimensions.lat, &lat),
            ("lev", dimensions.lev, &lev),
        ] {
            if axis.len() != expected {
                return Err(DatasetError::AxisLength {
                    axis: name,
                    expected,
                    actual: axis.len(),
                });
            }
        }

        let expected = dimensions.len();
        for (name, component) in [("U", &u), ("V", &v)] {
            if component.len() != expected {
                return Err(DatasetError::ComponentLength {
                    component: name,
                    expected,
                    actual: component.len(),
                });
            }
        }

        Ok(Self {
            dimensions,
            lon,
            lat,
            lev,
            u,
            v,
            run_label: None,
        })
    }

    /// Return the same dataset labelled with the forecast run that produced it.
    pub fn with_run_label(mut self, label: impl Into<String>) -> Self {
        self.run_label = Some(label.into());
        self
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn lon(&self) -> &CoordinateAxis {
        &self.lon
    }

    pub fn lat(&self) -> &CoordinateAxis {
        &self.lat
    }

    pub fn lev(&self) -> &CoordinateAxis {
        &self.lev
    }

    pub fn u(&self) -> &WindComponent {
        &self.u
    }

    pub fn v(&self) -> &WindComponent {
        &self.v
    }

    pub fn run_label(&self) -> Option<&str> {
        self.run_label.as_deref()
    }

    /// Grid extent derived from the coordinate axes.
    pub fn bounds(&self) -> GridBounds {
        GridBounds {
            min_lon: self.lon.min(),
            max_lon: self.lon.max(),
            min_lat: self.lat.min(),
            max_lat: self.lat.max(),
            min_lev: self.lev.min(),
            max_lev: self.lev.max(),
        }
    }
}
