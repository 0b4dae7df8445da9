//! Wind-field acquisition.
//!
//! Resolves the freshest forecast run, fetches it from the remote forecast
//! API and falls back to a local file when the remote source is unavailable.
//!
//! # Architecture
//!
//! - [`RemoteFetcher`] performs exactly one network request per call. The
//!   production implementation is [`HttpFetcher`]; tests plug in doubles.
//! - [`AcquisitionPipeline`] owns the retry policy: the resolved run, then one
//!   retry six hours earlier, then the local source. Only a failing local
//!   source surfaces as an error.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod pipeline;

// Re-exports
pub use config::AcquisitionConfig;
pub use error::{AcquisitionError, AttemptError, FetchError, Result};
pub use fetcher::{HttpFetcher, RemoteFetcher};
pub use pipeline::AcquisitionPipeline;
