//! HTTP server for simulation status and the wind probe.
//!
//! Provides endpoints for:
//! - Liveness
//! - Active dataset, simulation and sync statistics
//! - Point sampling of the active wind field
//! - Prometheus metrics
//! - Manual refresh

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use simulation_sync::{HotSwapController, SyncStats};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use wind_common::{Dimensions, GridBounds, WindVector};

use crate::headless::{HeadlessSimulation, SimulationSnapshot};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub service: String,
    pub started_at: DateTime<Utc>,
    pub remote_enabled: bool,
    pub dataset: Option<DatasetSummary>,
    pub generation: u64,
    pub sync: SyncStats,
    pub simulation: SimulationSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub run_label: Option<String>,
    pub dimensions: Dimensions,
    pub bounds: GridBounds,
    pub u_range: [f32; 2],
    pub v_range: [f32; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleResponse {
    pub lon: f64,
    pub lat: f64,
    pub u: f32,
    pub v: f32,
    pub speed: f32,
    pub run_label: Option<String>,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SampleQuery {
    pub lon: f64,
    pub lat: f64,
}

// ============================================================================
// Shared State
// ============================================================================

pub struct ServerState {
    pub controller: Arc<HotSwapController<HeadlessSimulation>>,
    pub use_remote: bool,
    pub started_at: DateTime<Utc>,
}

// ============================================================================
// Router
// ============================================================================

/// Create the status API router.
pub fn create_router(state: Arc<ServerState>, metrics: Option<PrometheusHandle>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/sample", get(sample_handler))
        .route("/metrics", get(metrics_handler))
        .route("/refresh", post(refresh_handler))
        .layer(cors)
        .layer(Extension(state))
        .layer(Extension(metrics))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "wind-sync"
    }))
}

/// GET /status - Active dataset, simulation and sync counters
async fn status_handler(Extension(state): Extension<Arc<ServerState>>) -> impl IntoResponse {
    let controller = &state.controller;
    let dataset = controller.current().await.map(|d| DatasetSummary {
        run_label: d.run_label().map(str::to_string),
        dimensions: d.dimensions(),
        bounds: d.bounds(),
        u_range: d.u().range(),
        v_range: d.v().range(),
    });

    Json(StatusResponse {
        service: "wind-sync".to_string(),
        started_at: state.started_at,
        remote_enabled: state.use_remote && controller.pipeline().has_remote(),
        dataset,
        generation: controller.generation().await,
        sync: controller.stats().await,
        simulation: controller.with_resource(|sim| sim.snapshot()).await,
    })
}

/// GET /sample?lon=&lat= - Nearest surface wind at a point
async fn sample_handler(
    Extension(state): Extension<Arc<ServerState>>,
    Query(query): Query<SampleQuery>,
) -> impl IntoResponse {
    if !query.lon.is_finite() || !query.lat.is_finite() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "lon and lat must be finite numbers" })),
        )
            .into_response();
    }

    let current = state.controller.current().await;
    let vector = match &current {
        Some(dataset) => wind_common::sample_vector(dataset, query.lon, query.lat),
        None => WindVector::ZERO,
    };

    Json(SampleResponse {
        lon: query.lon,
        lat: query.lat,
        u: vector.u,
        v: vector.v,
        speed: vector.speed(),
        run_label: current.and_then(|d| d.run_label().map(str::to_string)),
    })
    .into_response()
}

/// GET /metrics - Prometheus exposition
async fn metrics_handler(
    Extension(metrics): Extension<Option<PrometheusHandle>>,
) -> impl IntoResponse {
    match metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => (StatusCode::NOT_FOUND, "metrics exporter not installed").into_response(),
    }
}

/// POST /refresh - Request a refresh; dropped if one is already running
async fn refresh_handler(Extension(state): Extension<Arc<ServerState>>) -> impl IntoResponse {
    info!("Manual refresh requested");
    match state.controller.refresh(state.use_remote, None).await {
        Ok(outcome) => (StatusCode::OK, Json(serde_json::json!(outcome))).into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

// ============================================================================
// Server
// ============================================================================

/// Run the status server.
pub async fn run_server(
    state: Arc<ServerState>,
    metrics: Option<PrometheusHandle>,
    port: u16,
) -> anyhow::Result<()> {
    let app = create_router(state, metrics);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    info!(port = port, "Starting wind status server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
