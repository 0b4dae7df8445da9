//! Shared doubles for simulation-sync integration tests.
#![allow(dead_code)]

use simulation_sync::{ComputeStage, ParticleRefresh, ResourceError, SimulationResource, UniformPatch};
use wind_common::{CoordinateAxis, Dimensions, WindComponent, WindFieldDataset};

/// One recorded call on [`RecordingResource`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ReplaceTextures(Dimensions),
    DestroyTextures,
    RemoveStages,
    Rebuild(Dimensions),
    AddStage(ComputeStage),
    Patch(UniformPatch),
    Refresh(ParticleRefresh),
}

/// Simulation resource that records every call and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingResource {
    pub calls: Vec<Call>,
    pub bound: Option<Dimensions>,
    pub stages: Vec<ComputeStage>,
    pub fail_rebuild: bool,
    pub fail_stage: Option<ComputeStage>,
}

impl RecordingResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn teardowns(&self) -> usize {
        self.count(|c| matches!(c, Call::DestroyTextures | Call::RemoveStages))
    }

    pub fn rebuilds(&self) -> usize {
        self.count(|c| matches!(c, Call::Rebuild(_)))
    }

    pub fn patches(&self) -> Vec<UniformPatch> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Patch(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

impl SimulationResource for RecordingResource {
    fn bound_dimensions(&self) -> Option<Dimensions> {
        self.bound
    }

    fn replace_wind_textures(&mut self, dataset: &WindFieldDataset) -> Result<(), ResourceError> {
        self.calls.push(Call::ReplaceTextures(dataset.dimensions()));
        Ok(())
    }

    fn destroy_wind_textures(&mut self) {
        self.calls.push(Call::DestroyTextures);
        self.bound = None;
    }

    fn remove_stages(&mut self) {
        self.calls.push(Call::RemoveStages);
        self.stages.clear();
    }

    fn rebuild_compute(
        &mut self,
        dataset: &WindFieldDataset,
        _uniforms: &UniformPatch,
    ) -> Result<(), ResourceError> {
        self.calls.push(Call::Rebuild(dataset.dimensions()));
        if self.fail_rebuild {
            return Err(ResourceError::new("out of GPU memory"));
        }
        self.bound = Some(dataset.dimensions());
        Ok(())
    }

    fn add_stage(&mut self, stage: ComputeStage) -> Result<(), ResourceError> {
        self.calls.push(Call::AddStage(stage));
        if self.fail_stage == Some(stage) {
            return Err(ResourceError::new(format!("{} pipeline failed", stage.as_str())));
        }
        self.stages.push(stage);
        Ok(())
    }

    fn patch_uniforms(&mut self, patch: &UniformPatch) {
        self.calls.push(Call::Patch(*patch));
    }

    fn refresh_particles(&mut self, refresh: ParticleRefresh) {
        self.calls.push(Call::Refresh(refresh));
    }
}

/// Evenly spaced global dataset with constant U/V.
pub fn dataset(lon: usize, lat: usize, lev: usize, u: f32) -> WindFieldDataset {
    let axis = |start: f32, span: f32, n: usize| -> Vec<f32> {
        if n <= 1 {
            return vec![start];
        }
        (0..n)
            .map(|i| start + span * i as f32 / (n - 1) as f32)
            .collect()
    };
    let n = lon * lat * lev;
    WindFieldDataset::new(
        Dimensions::new(lon, lat, lev),
        CoordinateAxis::new(axis(0.0, 359.0, lon)),
        CoordinateAxis::new(axis(-90.0, 180.0, lat)),
        CoordinateAxis::new(axis(1000.0, -500.0, lev)),
        WindComponent::new(vec![u; n], -u.abs() - 1.0, u.abs() + 1.0),
        WindComponent::new(vec![-u; n], -u.abs() - 1.0, u.abs() + 1.0),
    )
    .unwrap()
}
