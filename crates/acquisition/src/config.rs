//! Acquisition configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the acquisition pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Forecast API endpoint. `None` disables the remote path.
    pub remote_url: Option<String>,

    /// Local NetCDF file used when the remote path is disabled or exhausted.
    pub local_path: PathBuf,

    /// Run label given to datasets loaded from the local file.
    pub default_run_label: String,

    /// Value of the `forecast` query parameter.
    pub forecast: i32,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Directory where successful remote buffers are archived.
    pub archive_dir: Option<PathBuf>,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            local_path: PathBuf::from("data/gfs_20260226_00z.nc"),
            default_run_label: "20260226_00Z".to_string(),
            forecast: -1,
            request_timeout_secs: 300,
            archive_dir: None,
        }
    }
}

impl AcquisitionConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Parse configuration from a YAML document. Missing fields keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Invalid acquisition config: {}", e))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_yaml_str(&contents)
    }

    /// Override fields from `WIND_*` environment variables.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("WIND_API_URL") {
            self.remote_url = if val.trim().is_empty() { None } else { Some(val) };
        }

        if let Ok(val) = std::env::var("WIND_LOCAL_FILE") {
            self.local_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("WIND_DEFAULT_RUN_LABEL") {
            self.default_run_label = val;
        }

        if let Ok(val) = std::env::var("WIND_FORECAST") {
            if let Ok(forecast) = val.parse() {
                self.forecast = forecast;
            }
        }

        if let Ok(val) = std::env::var("WIND_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.request_timeout_secs = secs;
            }
        }

        if let Ok(val) = std::env::var("WIND_ARCHIVE_DIR") {
            self.archive_dir = Some(PathBuf::from(val));
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_run_label.trim().is_empty() {
            return Err("default_run_label must not be empty".to_string());
        }

        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be > 0".to_string());
        }

        if let Some(url) = &self.remote_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("remote_url must be an http(s) URL, got '{}'", url));
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
