//! Error types for NetCDF parsing operations.
//!
//! Every variant is a structural decode failure: the decoder never
//! substitutes defaults for missing required fields.

use thiserror::Error;
use wind_common::DatasetError;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetCdfError {
    /// Buffer does not start with a `CDF` signature
    #[error("Invalid NetCDF signature: {0}")]
    InvalidSignature(String),

    /// The classic-format reader rejected the header or a data block
    #[error("NetCDF read failed: {0}")]
    Read(String),

    /// A variable's declared shape needs more bytes than the buffer holds
    #[error("Variable '{variable}' needs {needed} bytes but the buffer holds {available}")]
    Truncated {
        variable: String,
        needed: usize,
        available: usize,
    },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Required dimension absent from the dimension table
    #[error("Missing required dimension: {0}")]
    MissingDimension(String),

    /// Required data variable absent
    #[error("Missing required variable: {0}")]
    MissingVariable(String),

    /// Required variable attribute absent
    #[error("Missing required attribute '{attribute}' on variable '{variable}'")]
    MissingAttribute { variable: String, attribute: String },

    /// Decoded arrays do not form a consistent grid
    #[error("Inconsistent wind grid: {0}")]
    Dataset(#[from] DatasetError),
}
