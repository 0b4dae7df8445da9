//! Orchestrates acquisition and hot-swapping for one simulation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use acquisition::AcquisitionPipeline;
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use wind_common::{sample_vector, WindFieldDataset, WindVector};

use crate::error::ControllerError;
use crate::resource::SimulationResource;
use crate::synchronizer::{sync, SyncOutcome};

/// Result of a refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "sync")]
pub enum RefreshOutcome {
    /// The acquired dataset is now active.
    Applied(SyncOutcome),
    /// Another acquisition was in flight; this request was dropped.
    Skipped,
    /// A newer dataset was applied while acquiring; the result was discarded.
    Superseded,
}

/// Counters of applied and dropped updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub patches: u64,
    pub rebuilds: u64,
    pub skipped: u64,
    pub superseded: u64,
    pub failures: u64,
}

struct Active<R> {
    resource: R,
    dataset: Option<Arc<WindFieldDataset>>,
    generation: u64,
    stats: SyncStats,
}

/// Owns the simulation resource and its active dataset.
///
/// At most one acquisition runs at a time; overlapping requests are dropped.
/// The resource, dataset and generation share one lock, so the frame loop
/// (through [`with_resource_mut`](Self::with_resource_mut)) never observes a
/// half-applied swap.
pub struct HotSwapController<R: SimulationResource> {
    pipeline: AcquisitionPipeline,
    active: Mutex<Active<R>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the acquisition ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<R: SimulationResource> HotSwapController<R> {
    pub fn new(pipeline: AcquisitionPipeline, resource: R) -> Self {
        Self {
            pipeline,
            active: Mutex::new(Active {
                resource,
                dataset: None,
                generation: 0,
                stats: SyncStats::default(),
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn pipeline(&self) -> &AcquisitionPipeline {
        &self.pipeline
    }

    /// Bring the simulation up from the local source.
    pub async fn load_initial(&self) -> Result<RefreshOutcome, ControllerError> {
        self.refresh(false, None).await
    }

    /// Acquire a dataset and apply it unless superseded.
    ///
    /// Acquisition failures leave the active dataset and resource untouched.
    #[instrument(skip(self))]
    pub async fn refresh(
        &self,
        use_remote: bool,
        target: Option<DateTime<Utc>>,
    ) -> Result<RefreshOutcome, ControllerError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.active.lock().await.stats.skipped += 1;
            info!("Acquisition already in flight, dropping refresh request");
            return Ok(RefreshOutcome::Skipped);
        }
        let _in_flight = InFlight(&self.in_flight);

        let started_at = self.active.lock().await.generation;

        let dataset = match self.pipeline.acquire(use_remote, target).await {
            Ok(dataset) => dataset,
            Err(e) => {
                self.active.lock().await.stats.failures += 1;
                return Err(e.into());
            }
        };

        let mut active = self.active.lock().await;
        if active.generation != started_at {
            active.stats.superseded += 1;
            counter!("wind_refresh_superseded_total").increment(1);
            warn!(
                run_label = dataset.run_label().unwrap_or_default(),
                "Discarding acquired dataset superseded by a newer one"
            );
            return Ok(RefreshOutcome::Superseded);
        }

        let outcome = Self::apply_locked(&mut active, dataset)?;
        Ok(RefreshOutcome::Applied(outcome))
    }

    /// Apply a dataset immediately, bypassing acquisition.
    pub async fn apply(&self, dataset: WindFieldDataset) -> Result<SyncOutcome, ControllerError> {
        let mut active = self.active.lock().await;
        Ok(Self::apply_locked(&mut active, dataset)?)
    }

    fn apply_locked(
        active: &mut Active<R>,
        dataset: WindFieldDataset,
    ) -> Result<SyncOutcome, ControllerError> {
        let previous = active.dataset.clone();
        match sync(&mut active.resource, previous.as_deref(), &dataset) {
            Ok(outcome) => {
                match outcome {
                    SyncOutcome::Patched => active.stats.patches += 1,
                    SyncOutcome::Rebuilt => active.stats.rebuilds += 1,
                }
                active.dataset = Some(Arc::new(dataset));
                active.generation += 1;
                Ok(outcome)
            }
            Err(e) => {
                active.stats.failures += 1;
                Err(e.into())
            }
        }
    }

    /// The active dataset, if one has been applied.
    pub async fn current(&self) -> Option<Arc<WindFieldDataset>> {
        self.active.lock().await.dataset.clone()
    }

    /// Number of datasets applied so far.
    pub async fn generation(&self) -> u64 {
        self.active.lock().await.generation
    }

    pub async fn stats(&self) -> SyncStats {
        self.active.lock().await.stats
    }

    /// Nearest-neighbour wind at a point of the active dataset; zero when none is loaded.
    pub async fn sample(&self, lon: f64, lat: f64) -> WindVector {
        match self.current().await {
            Some(dataset) => sample_vector(&dataset, lon, lat),
            None => WindVector::ZERO,
        }
    }

    /// Run `f` with exclusive access to the resource, as the frame loop does.
    pub async fn with_resource_mut<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        let mut active = self.active.lock().await;
        f(&mut active.resource)
    }

    pub async fn with_resource<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        let active = self.active.lock().await;
        f(&active.resource)
    }
}
