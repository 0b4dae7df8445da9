//! Integration tests for `HttpFetcher` against a local axum server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use acquisition::{FetchError, HttpFetcher, RemoteFetcher};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use chrono::{TimeZone, Utc};
use wind_common::RunTime;

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Serve `status` + `body` on a random port, recording query parameters.
async fn serve(status: StatusCode, body: Vec<u8>) -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route(
            "/api/wind",
            get(
                move |State(seen): State<Seen>, Query(params): Query<HashMap<String, String>>| {
                    let body = body.clone();
                    async move {
                        seen.lock().unwrap().push(params);
                        (status, body)
                    }
                },
            ),
        )
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/wind", addr), seen)
}

fn run() -> RunTime {
    RunTime::nearest(Utc.with_ymd_and_hms(2026, 2, 26, 5, 0, 0).unwrap())
}

#[tokio::test]
async fn test_fetch_sends_time_and_forecast() {
    let (url, seen) = serve(StatusCode::OK, vec![1, 2, 3, 4]).await;
    let fetcher = HttpFetcher::new(url, -1, Duration::from_secs(5)).unwrap();

    let bytes = fetcher.fetch(run()).await.unwrap();
    assert_eq!(bytes.as_ref(), &[1, 2, 3, 4]);

    let params = seen.lock().unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0]["time"], "2026-02-26T06:00:00.000Z");
    assert_eq!(params[0]["forecast"], "-1");
}

#[tokio::test]
async fn test_non_ok_status_is_rejected() {
    let (url, seen) = serve(StatusCode::NOT_FOUND, Vec::new()).await;
    let fetcher = HttpFetcher::new(url, -1, Duration::from_secs(5)).unwrap();

    let err = fetcher.fetch(run()).await.unwrap_err();
    assert_eq!(err, FetchError::Rejected { status: 404 });
    // No internal retry.
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = HttpFetcher::new(
        format!("http://{}/api/wind", addr),
        -1,
        Duration::from_secs(5),
    )
    .unwrap();

    let err = fetcher.fetch(run()).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_oversized_content_length_does_not_preallocate() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Declares a terabyte, then sends four bytes and hangs up.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000000000000\r\n\r\nCDF\x01")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let fetcher = HttpFetcher::new(
        format!("http://{}/api/wind", addr),
        -1,
        Duration::from_secs(5),
    )
    .unwrap();

    let err = fetcher.fetch(run()).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}
