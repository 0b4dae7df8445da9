//! Test tooling for the wind-field workspace.
//!
//! - [`netcdf::NetCdfBuilder`] writes classic NetCDF buffers through `netcdf3`
//! - [`WindGrid`] produces position-encoded U/V grids and serializes them
//! - [`stage_local_wind_file`] puts a buffer where a pipeline can read it
//!
//! Add as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod netcdf;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Return early from a test when a real data file is not available.
///
/// Real forecast files are large and not committed.
///
/// ```ignore
/// let path = test_utils::require_test_file!("gfs_20260226_00z.nc");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!("SKIPPED: '{}' not found (set TEST_DATA_DIR)", $name);
                return;
            }
        }
    }};
}

/// Element-wise comparison of two float slices within `epsilon`.
///
/// ```
/// test_utils::assert_all_close!(&[1.0f32, 2.0], &[1.0005f32, 1.9995], 1e-3);
/// ```
#[macro_export]
macro_rules! assert_all_close {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left = $left;
        let right = $right;
        assert_eq!(left.len(), right.len(), "slice lengths differ");
        for (i, (a, b)) in left.iter().zip(right.iter()).enumerate() {
            let diff = (*a as f64 - *b as f64).abs();
            if diff > $epsilon as f64 {
                panic!(
                    "values differ at index {}: {:?} vs {:?} (diff {:?} > {:?})",
                    i, a, b, diff, $epsilon
                );
            }
        }
    }};
}
