//! NetCDF parser for gridded wind data.
//!
//! Reads NetCDF classic (CDF-1) and 64-bit offset (CDF-2) files through the
//! pure-Rust `netcdf3` reader. Works directly on in-memory buffers, so the
//! same decoder serves both the remote API response and the bundled local
//! file.
//!
//! # Wind Data Structure
//!
//! Wind files carry three coordinate dimensions and matching coordinate
//! variables (`lon`, `lat`, `lev`), plus `U` and `V` wind components laid
//! out level-major, then latitude, then longitude. `U` and `V` declare their
//! value range through `min`/`max` attributes, which drive GPU-side
//! normalisation downstream.

pub mod error;
mod reader;
mod wind;

pub use error::{NetCdfError, NetCdfResult};
pub use reader::NetCdfFile;
pub use wind::decode;
