//! Patch-or-rebuild synchronization of a dataset into a simulation resource.

use metrics::counter;
use serde::Serialize;
use tracing::{debug, info};
use wind_common::WindFieldDataset;

use crate::error::{SyncError, SyncResult};
use crate::resource::{ComputeStage, ParticleRefresh, SimulationResource};
use crate::uniforms::UniformPatch;

/// Which path [`sync`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Same dimensions: textures overwritten, uniforms patched, soft refresh.
    Patched,
    /// New dimensions: compute resources torn down and rebuilt, particles reseeded.
    Rebuilt,
}

/// Whether `next` needs differently sized resources than `previous`.
pub fn dimensions_changed(previous: Option<&WindFieldDataset>, next: &WindFieldDataset) -> bool {
    previous.map_or(true, |prev| prev.dimensions() != next.dimensions())
}

/// Apply `next` to `resource`, replacing `previous`.
///
/// Resources are rebuilt when the grid dimensions change, or when the
/// resource itself is not bound to the new dimensions (first load, or after a
/// failed rebuild). Otherwise only texture contents and uniforms change and
/// particles keep their state.
///
/// A rebuild destroys the old resources before creating the new ones, so a
/// failure part way leaves the resource without a complete stage set. The
/// error is reported; nothing is rolled back.
pub fn sync<R>(
    resource: &mut R,
    previous: Option<&WindFieldDataset>,
    next: &WindFieldDataset,
) -> SyncResult<SyncOutcome>
where
    R: SimulationResource + ?Sized,
{
    let dims = next.dimensions();
    let patch = UniformPatch::from_dataset(next);
    let changed =
        dimensions_changed(previous, next) || resource.bound_dimensions() != Some(dims);

    if !changed {
        resource
            .replace_wind_textures(next)
            .map_err(SyncError::TextureUpdate)?;
        resource.patch_uniforms(&patch);
        resource.refresh_particles(ParticleRefresh::Soft);

        counter!("wind_sync_patches_total").increment(1);
        debug!(
            run_label = next.run_label().unwrap_or_default(),
            "Patched simulation uniforms in place"
        );
        return Ok(SyncOutcome::Patched);
    }

    resource.destroy_wind_textures();
    resource.remove_stages();
    resource
        .rebuild_compute(next, &patch)
        .map_err(SyncError::ResourceRebuild)?;
    for stage in ComputeStage::ORDER {
        resource
            .add_stage(stage)
            .map_err(SyncError::ResourceRebuild)?;
    }
    resource.refresh_particles(ParticleRefresh::Reseed {
        bounds: next.bounds(),
    });

    counter!("wind_sync_rebuilds_total").increment(1);
    info!(
        run_label = next.run_label().unwrap_or_default(),
        previous = ?previous.map(|p| p.dimensions()),
        lon = dims.lon,
        lat = dims.lat,
        lev = dims.lev,
        "Rebuilt simulation resources for new grid dimensions"
    );
    Ok(SyncOutcome::Rebuilt)
}
