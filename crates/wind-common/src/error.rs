//! Error types for dataset construction.

use thiserror::Error;

/// Result type alias using DatasetError.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Violations of the [`WindFieldDataset`](crate::WindFieldDataset) invariants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DatasetError {
    #[error("dimension '{0}' must be at least 1")]
    EmptyDimension(&'static str),

    #[error("axis '{axis}' has {actual} values, dimension declares {expected}")]
    AxisLength {
        axis: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("component '{component}' has {actual} values, grid holds {expected}")]
    ComponentLength {
        component: &'static str,
        expected: usize,
        actual: usize,
    },
}
