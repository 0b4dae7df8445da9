//! Remote forecast fetching.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::{header, Client, StatusCode};
use tracing::{debug, instrument};
use wind_common::RunTime;

use crate::error::FetchError;

/// Bytes between progress log lines.
const PROGRESS_INTERVAL: usize = 1_000_000;

/// Upper bound on the buffer reserved from `Content-Length` before any body arrives.
const MAX_PREALLOCATION: usize = 64 << 20;

/// One network fetch of the buffer for a forecast run.
///
/// Implementations issue exactly one request per call and never retry;
/// retrying is the pipeline's concern.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, run: RunTime) -> Result<Bytes, FetchError>;
}

/// Fetches wind buffers from the forecast HTTP API.
///
/// Requests `GET <base_url>?time=<ISO-8601>&forecast=<n>`.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    forecast: i32,
}

impl HttpFetcher {
    pub fn new(
        base_url: impl Into<String>,
        forecast: i32,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            forecast,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    #[instrument(skip(self), fields(url = %self.base_url, run = %run.label()))]
    async fn fetch(&self, run: RunTime) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("time", run.to_iso8601()),
                ("forecast", self.forecast.to_string()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Rejected {
                status: status.as_u16(),
            });
        }

        let total_bytes: Option<usize> = response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());

        let mut body = BytesMut::with_capacity(total_bytes.unwrap_or(0).min(MAX_PREALLOCATION));
        let mut since_update = 0usize;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::Transport(e.to_string()))?;
            body.extend_from_slice(&chunk);
            since_update += chunk.len();

            if since_update >= PROGRESS_INTERVAL {
                since_update = 0;
                match total_bytes {
                    Some(total) if total > 0 => debug!(
                        downloaded = body.len(),
                        total = total,
                        percent = format!("{:.1}%", body.len() as f64 / total as f64 * 100.0),
                        "Download progress"
                    ),
                    _ => debug!(downloaded = body.len(), "Download progress"),
                }
            }
        }

        debug!(bytes = body.len(), "Download completed");
        Ok(body.freeze())
    }
}
