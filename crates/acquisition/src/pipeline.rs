//! Acquisition pipeline: remote with one retry, then the local source.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::{debug, info, instrument, warn};
use wind_common::{RunTime, WindFieldDataset};

use crate::config::AcquisitionConfig;
use crate::error::{AcquisitionError, AttemptError, FetchError, Result};
use crate::fetcher::{HttpFetcher, RemoteFetcher};

/// Remote attempts per acquisition: the resolved run and the one before it.
const MAX_REMOTE_ATTEMPTS: usize = 2;

/// Orchestrates run resolution, remote fetching and the local fallback.
pub struct AcquisitionPipeline {
    config: AcquisitionConfig,
    fetcher: Option<Arc<dyn RemoteFetcher>>,
}

impl AcquisitionPipeline {
    /// Create a pipeline with an explicit fetcher. `None` disables the remote path.
    pub fn new(config: AcquisitionConfig, fetcher: Option<Arc<dyn RemoteFetcher>>) -> Self {
        Self { config, fetcher }
    }

    /// Create a pipeline whose remote path uses [`HttpFetcher`] when a URL is configured.
    pub fn from_config(config: AcquisitionConfig) -> std::result::Result<Self, FetchError> {
        let fetcher = match &config.remote_url {
            Some(url) => {
                let fetcher =
                    HttpFetcher::new(url.clone(), config.forecast, config.request_timeout())?;
                Some(Arc::new(fetcher) as Arc<dyn RemoteFetcher>)
            }
            None => None,
        };
        Ok(Self::new(config, fetcher))
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    pub fn has_remote(&self) -> bool {
        self.fetcher.is_some()
    }

    /// Acquire the freshest available dataset.
    ///
    /// With `use_remote` and a configured fetcher, tries the run nearest to
    /// `target` (or now), then the run six hours earlier. Remote failures are
    /// never returned; they fall through to the local source, whose failure is
    /// the only error this method produces.
    #[instrument(skip(self), fields(remote = self.fetcher.is_some()))]
    pub async fn acquire(
        &self,
        use_remote: bool,
        target: Option<DateTime<Utc>>,
    ) -> Result<WindFieldDataset> {
        if use_remote {
            if let Some(fetcher) = &self.fetcher {
                let run = RunTime::nearest(target.unwrap_or_else(Utc::now));
                if let Some(dataset) = self.acquire_remote(fetcher.as_ref(), run).await {
                    return Ok(dataset);
                }
                counter!("wind_local_fallbacks_total").increment(1);
                warn!(
                    run = %run.label(),
                    path = %self.config.local_path.display(),
                    "Remote wind data unavailable, falling back to local file"
                );
            }
        }

        self.load_local().await
    }

    async fn acquire_remote(
        &self,
        fetcher: &dyn RemoteFetcher,
        run: RunTime,
    ) -> Option<WindFieldDataset> {
        let mut attempt_run = run;
        for attempt in 1..=MAX_REMOTE_ATTEMPTS {
            counter!("wind_fetch_attempts_total").increment(1);
            match self.attempt(fetcher, attempt_run).await {
                Ok(dataset) => {
                    info!(
                        run = %attempt_run.label(),
                        attempt = attempt,
                        "Acquired remote wind data"
                    );
                    return Some(dataset);
                }
                Err(e) => {
                    counter!("wind_fetch_failures_total").increment(1);
                    warn!(
                        run = %attempt_run.label(),
                        attempt = attempt,
                        max_attempts = MAX_REMOTE_ATTEMPTS,
                        error = %e,
                        "Remote wind fetch failed"
                    );
                    attempt_run = attempt_run.previous();
                }
            }
        }
        None
    }

    async fn attempt(
        &self,
        fetcher: &dyn RemoteFetcher,
        run: RunTime,
    ) -> std::result::Result<WindFieldDataset, AttemptError> {
        let bytes = fetcher.fetch(run).await?;
        let dataset = netcdf_parser::decode(&bytes)?;
        self.archive(run, &bytes).await;
        Ok(dataset.with_run_label(run.label()))
    }

    /// Write a successful remote buffer to the archive directory, if configured.
    async fn archive(&self, run: RunTime, bytes: &Bytes) {
        let Some(dir) = &self.config.archive_dir else {
            return;
        };
        let path = dir.join(run.archive_file_name());

        let result = async {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(&path, bytes).await
        }
        .await;

        match result {
            Ok(()) => debug!(path = %path.display(), bytes = bytes.len(), "Archived wind buffer"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to archive wind buffer"),
        }
    }

    /// Read and decode the configured local file.
    #[instrument(skip(self), fields(path = %self.config.local_path.display()))]
    pub async fn load_local(&self) -> Result<WindFieldDataset> {
        let path: &Path = &self.config.local_path;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| AcquisitionError::LocalRead {
                path: path.to_path_buf(),
                source,
            })?;

        let dataset =
            netcdf_parser::decode(&bytes).map_err(|source| AcquisitionError::LocalDecode {
                path: path.to_path_buf(),
                source,
            })?;

        let dataset = match dataset.run_label() {
            Some(_) => dataset,
            None => dataset.with_run_label(self.config.default_run_label.clone()),
        };

        info!(
            run_label = dataset.run_label().unwrap_or_default(),
            bytes = bytes.len(),
            "Loaded local wind data"
        );
        Ok(dataset)
    }
}
