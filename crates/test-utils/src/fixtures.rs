//! Common test fixtures for wind-field tests.

use crate::generators::{create_axis, create_u_wind_grid, create_v_wind_grid, value_range};
use crate::netcdf::{AttrValue, NcValues, NetCdfBuilder};

/// Common grid shapes.
pub mod grid {
    /// GFS 1° global grid with a single surface level.
    pub const GFS_1DEG: (usize, usize, usize) = (360, 181, 1);

    /// Small global grid, cheap enough for every test.
    pub const SMALL_GLOBAL: (usize, usize, usize) = (4, 5, 2);
}

/// Common time values for testing.
pub mod time {
    /// Run label of the bundled local dataset.
    pub const DEFAULT_RUN_LABEL: &str = "20260226_00Z";

    /// Forecast run hours.
    pub const RUN_HOURS: [u32; 4] = [0, 6, 12, 18];
}

/// A synthetic lon/lat/lev wind grid that can be serialized to NetCDF.
#[derive(Debug, Clone)]
pub struct WindGrid {
    pub lon: Vec<f32>,
    pub lat: Vec<f32>,
    pub lev: Vec<f32>,
    pub u: Vec<f32>,
    pub v: Vec<f32>,
    /// Declared `(min, max)` written to the `U` attributes.
    pub u_range: (f32, f32),
    /// Declared `(min, max)` written to the `V` attributes.
    pub v_range: (f32, f32),
}

impl WindGrid {
    /// Global grid on a `[0, 360)` longitude convention with evenly spaced axes.
    pub fn global(lon_count: usize, lat_count: usize, lev_count: usize) -> Self {
        let lon_step = 360.0 / lon_count as f32;
        let lat_step = if lat_count > 1 {
            180.0 / (lat_count - 1) as f32
        } else {
            0.0
        };

        Self::with_axes(
            create_axis(0.0, lon_step, lon_count),
            create_axis(-90.0, lat_step, lat_count),
            create_axis(1000.0, -150.0, lev_count),
        )
    }

    /// Grid over explicit axes, with position-encoding U/V values.
    pub fn with_axes(lon: Vec<f32>, lat: Vec<f32>, lev: Vec<f32>) -> Self {
        let u = create_u_wind_grid(lon.len(), lat.len(), lev.len());
        let v = create_v_wind_grid(lon.len(), lat.len(), lev.len());
        let u_range = value_range(&u);
        let v_range = value_range(&v);
        Self {
            lon,
            lat,
            lev,
            u,
            v,
            u_range,
            v_range,
        }
    }

    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.lon.len(), self.lat.len(), self.lev.len())
    }

    /// Builder pre-loaded with the dimensions and coordinate variables only.
    pub fn coordinates_builder(&self) -> NetCdfBuilder {
        NetCdfBuilder::new()
            .dimension("lon", self.lon.len())
            .dimension("lat", self.lat.len())
            .dimension("lev", self.lev.len())
            .global_attr("title", "synthetic wind field")
            .variable("lon", &["lon"], NcValues::Float(self.lon.clone()))
            .attr("units", AttrValue::Text("degrees_east".into()))
            .variable("lat", &["lat"], NcValues::Float(self.lat.clone()))
            .attr("units", AttrValue::Text("degrees_north".into()))
            .variable("lev", &["lev"], NcValues::Float(self.lev.clone()))
            .attr("units", AttrValue::Text("hPa".into()))
    }

    /// Builder holding the complete wind file.
    pub fn builder(&self) -> NetCdfBuilder {
        self.coordinates_builder()
            .variable("U", &["lev", "lat", "lon"], NcValues::Float(self.u.clone()))
            .attr("min", AttrValue::Float(self.u_range.0))
            .attr("max", AttrValue::Float(self.u_range.1))
            .variable("V", &["lev", "lat", "lon"], NcValues::Float(self.v.clone()))
            .attr("min", AttrValue::Float(self.v_range.0))
            .attr("max", AttrValue::Float(self.v_range.1))
    }

    /// Serialize to a CDF-1 buffer.
    pub fn to_netcdf(&self) -> Vec<u8> {
        self.builder().build()
    }
}
