//! Common types and utilities shared across the wind-field crates.
//!
//! Holds the immutable [`WindFieldDataset`] model, forecast run-time
//! resolution and nearest-neighbour point sampling. Everything here is pure:
//! no I/O, no async.

pub mod dataset;
pub mod error;
pub mod grid;
pub mod sampling;
pub mod time;

pub use dataset::{CoordinateAxis, WindComponent, WindFieldDataset};
pub use error::{DatasetError, DatasetResult};
pub use grid::{Dimensions, GridBounds};
pub use sampling::{sample_vector, WindVector};
pub use time::{RunTime, RUN_HOURS};
