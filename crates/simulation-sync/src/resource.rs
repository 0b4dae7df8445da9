//! The simulation resource seam.

use serde::Serialize;
use wind_common::{Dimensions, GridBounds, WindFieldDataset};

use crate::error::ResourceError;
use crate::uniforms::UniformPatch;

/// Compute passes of the particle simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputeStage {
    /// Samples the wind textures into per-particle speed.
    CalculateSpeed,
    /// Advects particle positions by speed.
    UpdatePosition,
    /// Respawns particles that left the grid or aged out.
    PostProcessing,
}

impl ComputeStage {
    /// Execution order; each stage reads the previous stage's output.
    pub const ORDER: [ComputeStage; 3] = [
        ComputeStage::CalculateSpeed,
        ComputeStage::UpdatePosition,
        ComputeStage::PostProcessing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComputeStage::CalculateSpeed => "calculate_speed",
            ComputeStage::UpdatePosition => "update_position",
            ComputeStage::PostProcessing => "post_processing",
        }
    }
}

/// How particles react to a dataset change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleRefresh {
    /// Keep particle positions and ages.
    Soft,
    /// Reseed particles inside the new grid bounds.
    Reseed { bounds: GridBounds },
}

/// GPU-side state of a running particle simulation.
///
/// Mutated only by the synchronizer and the host's frame loop, never both at
/// once. Methods are synchronous: they run between frames and must not
/// suspend.
pub trait SimulationResource: Send {
    /// Dimensions the current wind textures were created for, if any.
    fn bound_dimensions(&self) -> Option<Dimensions>;

    /// Overwrite the contents of the existing U/V textures. Dimensions match.
    fn replace_wind_textures(&mut self, dataset: &WindFieldDataset) -> Result<(), ResourceError>;

    /// Release the U/V textures of the previous dataset.
    fn destroy_wind_textures(&mut self);

    /// Remove every compute stage from the host's ordering.
    fn remove_stages(&mut self);

    /// Create textures and compute resources sized for `dataset`.
    fn rebuild_compute(
        &mut self,
        dataset: &WindFieldDataset,
        uniforms: &UniformPatch,
    ) -> Result<(), ResourceError>;

    /// Append a rebuilt stage to the host's ordering.
    fn add_stage(&mut self, stage: ComputeStage) -> Result<(), ResourceError>;

    /// Apply new scalar uniforms to the existing compute resources.
    fn patch_uniforms(&mut self, patch: &UniformPatch);

    fn refresh_particles(&mut self, refresh: ParticleRefresh);
}
