//! Error types for the acquisition crate.

use std::path::PathBuf;

use netcdf_parser::NetCdfError;
use thiserror::Error;

/// Failure of a single remote fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote answered with a non-success status.
    #[error("Remote rejected request with status {status}")]
    Rejected { status: u16 },
}

/// Why one remote attempt did not yield a dataset.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttemptError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Remote payload could not be decoded: {0}")]
    Decode(#[from] NetCdfError),
}

/// Terminal acquisition failure: the local source, the last fallback, failed.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Failed to read local wind data {}: {source}", path.display())]
    LocalRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode local wind data {}: {source}", path.display())]
    LocalDecode {
        path: PathBuf,
        #[source]
        source: NetCdfError,
    },
}

/// Result type for acquisition operations.
pub type Result<T> = std::result::Result<T, AcquisitionError>;
