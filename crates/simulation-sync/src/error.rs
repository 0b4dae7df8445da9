//! Error types for the simulation-sync crate.

use acquisition::AcquisitionError;
use thiserror::Error;

/// Failure reported by a simulation resource while creating GPU-side objects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ResourceError(pub String);

impl ResourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors raised while applying a dataset to a simulation resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Recreating compute resources for new dimensions failed. The resource
    /// may be left without a complete stage set.
    #[error("Failed to rebuild simulation resources: {0}")]
    ResourceRebuild(#[source] ResourceError),

    /// Uploading new wind data into existing textures failed.
    #[error("Failed to update wind textures: {0}")]
    TextureUpdate(#[source] ResourceError),
}

/// Result type for synchronization.
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Errors surfaced by [`crate::HotSwapController`].
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}
