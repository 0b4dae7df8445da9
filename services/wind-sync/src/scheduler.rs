//! Periodic wind refresh.

use std::sync::Arc;
use std::time::Duration;

use simulation_sync::{HotSwapController, RefreshOutcome};
use tokio::sync::broadcast;
use tracing::{error, info, instrument};

use crate::headless::HeadlessSimulation;

/// Refreshes the active dataset on a fixed interval.
pub struct RefreshScheduler {
    controller: Arc<HotSwapController<HeadlessSimulation>>,
    interval: Duration,
    use_remote: bool,
}

impl RefreshScheduler {
    pub fn new(
        controller: Arc<HotSwapController<HeadlessSimulation>>,
        interval: Duration,
        use_remote: bool,
    ) -> Self {
        Self {
            controller,
            interval,
            use_remote,
        }
    }

    /// Run one refresh, logging instead of failing: the simulation keeps its
    /// last dataset when nothing new can be acquired.
    #[instrument(skip(self), fields(remote = self.use_remote))]
    pub async fn run_once(&self) -> Option<RefreshOutcome> {
        match self.controller.refresh(self.use_remote, None).await {
            Ok(outcome) => {
                let current = self.controller.current().await;
                info!(
                    outcome = ?outcome,
                    run_label = current.as_ref().and_then(|d| d.run_label()).unwrap_or("none"),
                    "Wind refresh finished"
                );
                Some(outcome)
            }
            Err(e) => {
                error!(error = %e, "Wind refresh failed, keeping current dataset");
                None
            }
        }
    }

    /// Refresh immediately, then every `interval` until shutdown.
    pub async fn run_forever(&self, mut shutdown: broadcast::Receiver<()>) {
        loop {
            self.run_once().await;

            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Shutting down refresh scheduler");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {
                    // Next refresh
                }
            }
        }
    }
}
