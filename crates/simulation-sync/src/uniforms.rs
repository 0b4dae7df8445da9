//! Scalar uniforms derived from a dataset.

use serde::Serialize;
use wind_common::WindFieldDataset;

/// Grid geometry and value ranges consumed by the compute passes.
///
/// Everything the simulation needs to reinterpret textures of unchanged size
/// for a new dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UniformPatch {
    /// Grid counts as floats `[lon, lat, lev]`.
    pub dimension: [f32; 3],
    pub minimum: [f32; 3],
    pub maximum: [f32; 3],
    /// Grid-cell spacing per axis; 1.0 for single-sample axes.
    pub interval: [f32; 3],
    /// Declared `[min, max]` of U.
    pub u_range: [f32; 2],
    /// Declared `[min, max]` of V.
    pub v_range: [f32; 2],
}

impl UniformPatch {
    pub fn from_dataset(dataset: &WindFieldDataset) -> Self {
        let dims = dataset.dimensions();
        let bounds = dataset.bounds();
        Self {
            dimension: [dims.lon as f32, dims.lat as f32, dims.lev as f32],
            minimum: bounds.minimum(),
            maximum: bounds.maximum(),
            interval: [
                dataset.lon().interval(),
                dataset.lat().interval(),
                dataset.lev().interval(),
            ],
            u_range: dataset.u().range(),
            v_range: dataset.v().range(),
        }
    }
}
