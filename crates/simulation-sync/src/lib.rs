//! Live synchronization of wind datasets with a running particle simulation.
//!
//! The simulation itself (textures, compute passes, particle state) lives
//! behind the [`SimulationResource`] trait. This crate decides whether a new
//! dataset can be applied by patching uniforms in place or requires the
//! compute resources to be rebuilt, and [`HotSwapController`] serializes
//! acquisitions and swaps against the frame loop.

pub mod controller;
pub mod error;
pub mod resource;
pub mod synchronizer;
pub mod uniforms;

// Re-exports
pub use controller::{HotSwapController, RefreshOutcome, SyncStats};
pub use error::{ControllerError, ResourceError, SyncError, SyncResult};
pub use resource::{ComputeStage, ParticleRefresh, SimulationResource};
pub use synchronizer::{dimensions_changed, sync, SyncOutcome};
pub use uniforms::UniformPatch;
