//! Integration tests for the acquisition pipeline's retry and fallback policy.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use acquisition::{AcquisitionConfig, AcquisitionError, AcquisitionPipeline, FetchError, RemoteFetcher};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;
use test_utils::{stage_local_wind_file, WindGrid};
use wind_common::RunTime;

// ============================================================================
// Test doubles
// ============================================================================

/// Replays scripted responses and records every requested run.
struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<Bytes, FetchError>>>,
    calls: Mutex<Vec<RunTime>>,
}

impl ScriptedFetcher {
    fn new(responses: Vec<Result<Bytes, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<RunTime> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteFetcher for ScriptedFetcher {
    async fn fetch(&self, run: RunTime) -> Result<Bytes, FetchError> {
        self.calls.lock().unwrap().push(run);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FetchError::Transport("no scripted response".into())))
    }
}

fn target() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 4, 13, 20, 0).unwrap()
}

fn local_grid() -> WindGrid {
    WindGrid::global(4, 5, 1)
}

fn remote_grid() -> WindGrid {
    WindGrid::global(8, 5, 2)
}

/// Temp dir holding a valid local file, plus a config pointing at it.
fn local_setup() -> (TempDir, AcquisitionConfig) {
    let (dir, path) = stage_local_wind_file(&local_grid().to_netcdf());
    let config = AcquisitionConfig {
        remote_url: Some("http://forecast.invalid/api/wind".to_string()),
        local_path: path,
        ..Default::default()
    };
    (dir, config)
}

fn pipeline(config: AcquisitionConfig, fetcher: &Arc<ScriptedFetcher>) -> AcquisitionPipeline {
    AcquisitionPipeline::new(config, Some(fetcher.clone() as Arc<dyn RemoteFetcher>))
}

// ============================================================================
// Remote path
// ============================================================================

#[tokio::test]
async fn test_remote_success_uses_resolved_run() {
    let (_dir, config) = local_setup();
    let fetcher = ScriptedFetcher::new(vec![Ok(Bytes::from(remote_grid().to_netcdf()))]);

    let dataset = pipeline(config, &fetcher)
        .acquire(true, Some(target()))
        .await
        .unwrap();

    assert_eq!(dataset.run_label(), Some("20260304_12Z"));
    assert_eq!(dataset.dimensions().lon, 8);
    assert_eq!(fetcher.calls(), vec![RunTime::nearest(target())]);
}

#[tokio::test]
async fn test_retry_targets_previous_run() {
    let (_dir, config) = local_setup();
    let fetcher = ScriptedFetcher::new(vec![
        Err(FetchError::Rejected { status: 404 }),
        Ok(Bytes::from(remote_grid().to_netcdf())),
    ]);

    let dataset = pipeline(config, &fetcher)
        .acquire(true, Some(target()))
        .await
        .unwrap();

    assert_eq!(dataset.run_label(), Some("20260304_06Z"));
    let calls = fetcher.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], calls[0].previous());
}

#[tokio::test]
async fn test_both_attempts_fail_falls_back_to_local() {
    let (_dir, config) = local_setup();
    let fetcher = ScriptedFetcher::new(vec![
        Err(FetchError::Transport("connection refused".into())),
        Err(FetchError::Rejected { status: 503 }),
    ]);

    let dataset = pipeline(config, &fetcher)
        .acquire(true, Some(target()))
        .await
        .unwrap();

    assert_eq!(dataset.run_label(), Some("20260226_00Z"));
    assert_eq!(dataset.dimensions().lon, 4);

    let run = RunTime::nearest(target());
    assert_eq!(fetcher.calls(), vec![run, run.previous()]);
}

#[tokio::test]
async fn test_undecodable_remote_payload_counts_as_failure() {
    let (_dir, config) = local_setup();
    let fetcher = ScriptedFetcher::new(vec![
        Ok(Bytes::from_static(b"<html>maintenance</html>")),
        Ok(Bytes::from(remote_grid().to_netcdf())),
    ]);

    let dataset = pipeline(config, &fetcher)
        .acquire(true, Some(target()))
        .await
        .unwrap();

    assert_eq!(dataset.run_label(), Some("20260304_06Z"));
    assert_eq!(fetcher.calls().len(), 2);
}

#[tokio::test]
async fn test_never_more_than_two_attempts() {
    let (_dir, config) = local_setup();
    let fetcher = ScriptedFetcher::new(vec![]);

    pipeline(config, &fetcher)
        .acquire(true, Some(target()))
        .await
        .unwrap();

    assert_eq!(fetcher.calls().len(), 2);
}

#[tokio::test]
async fn test_wraparound_retry_crosses_midnight() {
    let (_dir, config) = local_setup();
    let fetcher = ScriptedFetcher::new(vec![
        Err(FetchError::Rejected { status: 404 }),
        Ok(Bytes::from(remote_grid().to_netcdf())),
    ]);
    let early = Utc.with_ymd_and_hms(2026, 3, 4, 1, 0, 0).unwrap();

    let dataset = pipeline(config, &fetcher)
        .acquire(true, Some(early))
        .await
        .unwrap();

    assert_eq!(dataset.run_label(), Some("20260303_18Z"));
}

// ============================================================================
// Local path
// ============================================================================

#[tokio::test]
async fn test_use_remote_false_skips_fetcher() {
    let (_dir, config) = local_setup();
    let fetcher = ScriptedFetcher::new(vec![Ok(Bytes::from(remote_grid().to_netcdf()))]);

    let dataset = pipeline(config, &fetcher)
        .acquire(false, Some(target()))
        .await
        .unwrap();

    assert_eq!(dataset.run_label(), Some("20260226_00Z"));
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_no_fetcher_configured_goes_local() {
    let (_dir, mut config) = local_setup();
    config.remote_url = None;
    let pipeline = AcquisitionPipeline::from_config(config).unwrap();
    assert!(!pipeline.has_remote());

    let dataset = pipeline.acquire(true, None).await.unwrap();
    assert_eq!(dataset.dimensions().lon, 4);
}

#[tokio::test]
async fn test_custom_default_label() {
    let (_dir, mut config) = local_setup();
    config.default_run_label = "bundled".to_string();
    let pipeline = AcquisitionPipeline::new(config, None);

    let dataset = pipeline.acquire(false, None).await.unwrap();
    assert_eq!(dataset.run_label(), Some("bundled"));
}

#[tokio::test]
async fn test_missing_local_file_is_terminal() {
    let config = AcquisitionConfig {
        local_path: PathBuf::from("/nonexistent/wind/gfs.nc"),
        ..Default::default()
    };
    let fetcher = ScriptedFetcher::new(vec![]);

    let err = pipeline(config, &fetcher)
        .acquire(true, Some(target()))
        .await
        .unwrap_err();

    assert!(matches!(err, AcquisitionError::LocalRead { .. }));
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_corrupt_local_file_is_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.nc");
    std::fs::write(&path, b"CDF\x01garbage").unwrap();
    let config = AcquisitionConfig {
        local_path: path.clone(),
        ..Default::default()
    };

    let err = AcquisitionPipeline::new(config, None)
        .acquire(false, None)
        .await
        .unwrap_err();

    match err {
        AcquisitionError::LocalDecode { path: p, .. } => assert_eq!(p, path),
        other => panic!("expected LocalDecode, got {:?}", other),
    }
}

// ============================================================================
// Archive
// ============================================================================

#[tokio::test]
async fn test_remote_buffer_is_archived() {
    let (dir, mut config) = local_setup();
    let archive_dir = dir.path().join("archive");
    config.archive_dir = Some(archive_dir.clone());
    let payload = remote_grid().to_netcdf();
    let fetcher = ScriptedFetcher::new(vec![Ok(Bytes::from(payload.clone()))]);

    pipeline(config, &fetcher)
        .acquire(true, Some(target()))
        .await
        .unwrap();

    let archived = std::fs::read(archive_dir.join("gfs_20260304_12z.nc")).unwrap();
    assert_eq!(archived, payload);
}

#[tokio::test]
async fn test_archive_failure_does_not_fail_acquisition() {
    let (dir, mut config) = local_setup();
    // A regular file where the archive directory should be.
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").unwrap();
    config.archive_dir = Some(blocker);
    let fetcher = ScriptedFetcher::new(vec![Ok(Bytes::from(remote_grid().to_netcdf()))]);

    let dataset = pipeline(config, &fetcher)
        .acquire(true, Some(target()))
        .await
        .unwrap();

    assert_eq!(dataset.run_label(), Some("20260304_12Z"));
}
