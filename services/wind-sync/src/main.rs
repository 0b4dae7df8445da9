//! Wind-field sync service.
//!
//! Keeps a particle simulation running on the freshest wind forecast:
//! - Brings the simulation up from the bundled local file
//! - Refreshes from the forecast API on a fixed interval, with fallback
//! - Hot-swaps datasets, patching in place when the grid is unchanged
//! - HTTP status API with a point probe and Prometheus metrics

mod headless;
mod scheduler;
mod server;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use acquisition::{AcquisitionConfig, AcquisitionPipeline};
use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Parser;
use simulation_sync::HotSwapController;
use tokio::sync::broadcast;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use headless::HeadlessSimulation;
use scheduler::RefreshScheduler;
use server::ServerState;

#[derive(Parser, Debug)]
#[command(name = "wind-sync")]
#[command(about = "Keeps a particle simulation in sync with the freshest wind forecast")]
struct Args {
    /// YAML file with acquisition settings
    #[arg(long, env = "WIND_CONFIG")]
    config: Option<PathBuf>,

    /// Forecast API endpoint (overrides config and WIND_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Local NetCDF fallback file (overrides config and WIND_LOCAL_FILE)
    #[arg(long)]
    local_file: Option<PathBuf>,

    /// Seconds between remote refreshes
    #[arg(long, env = "WIND_REFRESH_INTERVAL_SECS", default_value = "3600")]
    refresh_interval_secs: u64,

    /// Simulated particle count
    #[arg(long, default_value = "4096")]
    particles: usize,

    /// Milliseconds between simulation frames
    #[arg(long, default_value = "100")]
    frame_interval_ms: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Port for status HTTP server
    #[arg(long, env = "STATUS_PORT", default_value = "8082")]
    status_port: u16,

    /// Load, refresh once and exit
    #[arg(long)]
    once: bool,

    /// Never contact the forecast API
    #[arg(long)]
    local_only: bool,
}

/// YAML file, then `WIND_*` environment, then CLI flags.
fn load_config(args: &Args) -> Result<AcquisitionConfig> {
    let mut config = match &args.config {
        Some(path) => AcquisitionConfig::from_yaml_file(path).map_err(|e| anyhow!(e))?,
        None => AcquisitionConfig::default(),
    };
    config.apply_env();

    if let Some(url) = &args.api_url {
        config.remote_url = Some(url.clone());
    }
    if let Some(path) = &args.local_file {
        config.local_path = path.clone();
    }

    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Initialize Prometheus metrics exporter
    let prometheus_handle = match metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
    {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Failed to install Prometheus recorder, metrics disabled");
            None
        }
    };

    info!("Starting wind-sync service");

    let config = load_config(&args)?;
    let use_remote = !args.local_only && config.remote_url.is_some();
    info!(
        remote_url = config.remote_url.as_deref().unwrap_or("none"),
        local_path = %config.local_path.display(),
        use_remote = use_remote,
        "Acquisition configured"
    );

    let pipeline = AcquisitionPipeline::from_config(config)?;
    let simulation = HeadlessSimulation::new(args.particles, 0.01);
    let controller = Arc::new(HotSwapController::new(pipeline, simulation));

    // Bring the simulation up from the local file; a failure here is reported
    // but the service keeps running and retries on the next refresh.
    if let Err(e) = controller.load_initial().await {
        error!(error = %e, "Initial local load failed");
    }

    let scheduler = RefreshScheduler::new(
        controller.clone(),
        Duration::from_secs(args.refresh_interval_secs),
        use_remote,
    );

    if args.once {
        info!("Running single refresh");
        scheduler.run_once().await;
    } else {
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        let server_state = Arc::new(ServerState {
            controller: controller.clone(),
            use_remote,
            started_at: Utc::now(),
        });
        let status_port = args.status_port;
        tokio::spawn(async move {
            if let Err(e) = server::run_server(server_state, prometheus_handle, status_port).await
            {
                error!(error = %e, "Status server failed");
            }
        });

        let frame_loop = tokio::spawn(headless::run_frame_loop(
            controller.clone(),
            Duration::from_millis(args.frame_interval_ms.max(1)),
            shutdown_tx.subscribe(),
        ));

        // Handle Ctrl+C
        let shutdown_tx_clone = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Received shutdown signal");
            shutdown_tx_clone.send(()).ok();
        });

        scheduler.run_forever(shutdown_tx.subscribe()).await;
        frame_loop.await.ok();
    }

    let stats = controller.stats().await;
    let current = controller.current().await;
    info!(
        run_label = current.as_ref().and_then(|d| d.run_label()).unwrap_or("none"),
        patches = stats.patches,
        rebuilds = stats.rebuilds,
        skipped = stats.skipped,
        superseded = stats.superseded,
        failures = stats.failures,
        "Wind sync session complete"
    );

    Ok(())
}
