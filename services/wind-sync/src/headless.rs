//! CPU-side particle simulation standing in for the GPU host.
//!
//! Mirrors the GPU resource lifecycle (wind textures, three compute stages,
//! uniforms, particle state) so the synchronizer drives it exactly as it would
//! drive the real renderer, and advects particles on a fixed frame tick.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use simulation_sync::{
    ComputeStage, HotSwapController, ParticleRefresh, ResourceError, SimulationResource,
    UniformPatch,
};
use tokio::sync::broadcast;
use tracing::{debug, info};
use wind_common::{Dimensions, GridBounds, WindFieldDataset};

/// Frames a particle lives before it is respawned.
const MAX_PARTICLE_AGE: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub lon: f32,
    pub lat: f32,
    pub lev: f32,
    pub age: u32,
    /// Wind speed sampled on the last frame.
    pub speed: f32,
}

#[derive(Debug)]
struct WindTextures {
    dims: Dimensions,
    u: Vec<f32>,
    v: Vec<f32>,
}

/// Observable state for the status API.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSnapshot {
    pub bound_dimensions: Option<Dimensions>,
    pub stages: Vec<ComputeStage>,
    pub uniforms: Option<UniformPatch>,
    pub particles: usize,
    pub frames: u64,
    pub mean_speed: f32,
    pub soft_refreshes: u64,
    pub reseeds: u64,
}

#[derive(Debug)]
pub struct HeadlessSimulation {
    particle_count: usize,
    /// Degrees moved per frame per m/s.
    speed_factor: f32,
    textures: Option<WindTextures>,
    stages: Vec<ComputeStage>,
    uniforms: Option<UniformPatch>,
    particles: Vec<Particle>,
    bounds: Option<GridBounds>,
    frames: u64,
    mean_speed: f32,
    soft_refreshes: u64,
    reseeds: u64,
}

impl HeadlessSimulation {
    pub fn new(particle_count: usize, speed_factor: f32) -> Self {
        Self {
            particle_count,
            speed_factor,
            textures: None,
            stages: Vec::new(),
            uniforms: None,
            particles: Vec::new(),
            bounds: None,
            frames: 0,
            mean_speed: 0.0,
            soft_refreshes: 0,
            reseeds: 0,
        }
    }

    /// Whether every stage is present and in order.
    pub fn is_runnable(&self) -> bool {
        self.textures.is_some() && self.uniforms.is_some() && self.stages == ComputeStage::ORDER
    }

    /// Advance one frame: speed, position, post-processing.
    pub fn step(&mut self) {
        if !self.is_runnable() {
            return;
        }
        let (Some(textures), Some(uniforms), Some(bounds)) =
            (&self.textures, &self.uniforms, &self.bounds)
        else {
            return;
        };

        let mut total_speed = 0.0;
        for (i, particle) in self.particles.iter_mut().enumerate() {
            let (u, v) =
                wind_at(textures, uniforms, particle.lon, particle.lat).unwrap_or((0.0, 0.0));
            particle.speed = (u * u + v * v).sqrt();
            total_speed += particle.speed;

            particle.lon += u * self.speed_factor;
            particle.lat += v * self.speed_factor;
            particle.age += 1;

            let outside = !bounds.contains_lon_lat(particle.lon as f64, particle.lat as f64);
            if outside || particle.age > MAX_PARTICLE_AGE {
                *particle = seed_particle(i as u64 + self.frames, bounds);
            }
        }
        if !self.particles.is_empty() {
            self.mean_speed = total_speed / self.particles.len() as f32;
        }
        self.frames += 1;
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            bound_dimensions: self.bound_dimensions(),
            stages: self.stages.clone(),
            uniforms: self.uniforms,
            particles: self.particles.len(),
            frames: self.frames,
            mean_speed: self.mean_speed,
            soft_refreshes: self.soft_refreshes,
            reseeds: self.reseeds,
        }
    }

    #[cfg(test)]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

impl SimulationResource for HeadlessSimulation {
    fn bound_dimensions(&self) -> Option<Dimensions> {
        self.textures.as_ref().map(|t| t.dims)
    }

    fn replace_wind_textures(&mut self, dataset: &WindFieldDataset) -> Result<(), ResourceError> {
        let textures = self
            .textures
            .as_mut()
            .ok_or_else(|| ResourceError::new("no wind textures to update"))?;
        if textures.dims != dataset.dimensions() {
            return Err(ResourceError::new(format!(
                "texture size {:?} does not match dataset {:?}",
                textures.dims,
                dataset.dimensions()
            )));
        }
        textures.u.copy_from_slice(dataset.u().values());
        textures.v.copy_from_slice(dataset.v().values());
        Ok(())
    }

    fn destroy_wind_textures(&mut self) {
        self.textures = None;
    }

    fn remove_stages(&mut self) {
        self.stages.clear();
    }

    fn rebuild_compute(
        &mut self,
        dataset: &WindFieldDataset,
        uniforms: &UniformPatch,
    ) -> Result<(), ResourceError> {
        if dataset.dimensions().is_empty() {
            return Err(ResourceError::new("cannot allocate empty wind textures"));
        }
        self.textures = Some(WindTextures {
            dims: dataset.dimensions(),
            u: dataset.u().values().to_vec(),
            v: dataset.v().values().to_vec(),
        });
        self.uniforms = Some(*uniforms);
        self.bounds = Some(bounds_from(uniforms));
        debug!(dims = ?dataset.dimensions(), "Allocated wind textures");
        Ok(())
    }

    fn add_stage(&mut self, stage: ComputeStage) -> Result<(), ResourceError> {
        if self.stages.contains(&stage) {
            return Err(ResourceError::new(format!(
                "stage {} already registered",
                stage.as_str()
            )));
        }
        self.stages.push(stage);
        Ok(())
    }

    fn patch_uniforms(&mut self, patch: &UniformPatch) {
        self.uniforms = Some(*patch);
        self.bounds = Some(bounds_from(patch));
    }

    fn refresh_particles(&mut self, refresh: ParticleRefresh) {
        match refresh {
            ParticleRefresh::Soft => self.soft_refreshes += 1,
            ParticleRefresh::Reseed { bounds } => {
                self.bounds = Some(bounds);
                self.particles = (0..self.particle_count as u64)
                    .map(|i| seed_particle(i, &bounds))
                    .collect();
                self.reseeds += 1;
            }
        }
    }
}

fn bounds_from(patch: &UniformPatch) -> GridBounds {
    GridBounds {
        min_lon: patch.minimum[0],
        max_lon: patch.maximum[0],
        min_lat: patch.minimum[1],
        max_lat: patch.maximum[1],
        min_lev: patch.minimum[2],
        max_lev: patch.maximum[2],
    }
}

/// Deterministic, evenly spread particle position inside `bounds`.
fn seed_particle(i: u64, bounds: &GridBounds) -> Particle {
    // Additive recurrence on irrational steps (R3 sequence).
    const A1: f64 = 0.819_172_513_396_164_4;
    const A2: f64 = 0.671_043_606_703_789_2;
    const A3: f64 = 0.549_700_477_901_970_4;
    let n = i as f64 + 1.0;
    let frac = |a: f64| (0.5 + a * n).fract() as f32;

    Particle {
        lon: bounds.min_lon + frac(A1) * (bounds.max_lon - bounds.min_lon),
        lat: bounds.min_lat + frac(A2) * (bounds.max_lat - bounds.min_lat),
        lev: bounds.min_lev + frac(A3) * (bounds.max_lev - bounds.min_lev),
        age: 0,
        speed: 0.0,
    }
}

/// Nearest surface-level texel at `(lon, lat)`.
fn wind_at(
    textures: &WindTextures,
    uniforms: &UniformPatch,
    lon: f32,
    lat: f32,
) -> Option<(f32, f32)> {
    let index = |value: f32, axis: usize, count: usize| -> Option<usize> {
        let i = ((value - uniforms.minimum[axis]) / uniforms.interval[axis]).round();
        (i >= 0.0 && (i as usize) < count).then_some(i as usize)
    };
    let lon_i = index(lon, 0, textures.dims.lon)?;
    let lat_i = index(lat, 1, textures.dims.lat)?;
    let offset = textures.dims.flat_index(lon_i, lat_i, 0);
    Some((*textures.u.get(offset)?, *textures.v.get(offset)?))
}

/// Tick the simulation until shutdown. Each frame holds the resource lock, so
/// frames never interleave with a dataset swap.
pub async fn run_frame_loop(
    controller: Arc<HotSwapController<HeadlessSimulation>>,
    frame_interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(frame_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                info!("Stopping frame loop");
                break;
            }
            _ = ticker.tick() => {
                controller.with_resource_mut(|sim| sim.step()).await;
            }
        }
    }
}
