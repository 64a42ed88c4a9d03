use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use uuid::Uuid;

pub const DEFAULT_BASE_URL: &str = "https://back-vynils-qa.herokuapp.com/";

/// Static configuration shared by the transport client and the profiler.
#[derive(Clone, Debug)]
pub struct AppConfig {
    base_url: String,
    data_dir: PathBuf,
    metrics_path: PathBuf,
    request_timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
    client_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let base = PathBuf::from("data");
        let metrics_path = base.join("profiling_metrics.csv");

        let client_id = format!("vinilos-client-{}", Uuid::new_v4());
        let user_agent = format!(
            "vinilos/{} ( unique-id={client_id} )",
            env!("CARGO_PKG_VERSION")
        );

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: base,
            metrics_path,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(30),
            user_agent,
            client_id,
        }
    }
}

impl AppConfig {
    /// Overrides the backend root. A trailing slash is added so relative
    /// endpoint paths join underneath it instead of replacing its last segment.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn with_metrics_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metrics_path = path.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn parsed_base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .with_context(|| format!("Invalid backend base url: {}", self.base_url))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn metrics_path(&self) -> &Path {
        &self.metrics_path
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Ensures the directory holding the metrics file exists.
    pub fn ensure_filesystem(&self) -> Result<()> {
        let metrics_dir = self
            .metrics_path()
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| self.data_dir());

        fs::create_dir_all(metrics_dir)
            .with_context(|| format!("Failed to create directory: {}", metrics_dir.display()))?;

        Ok(())
    }
}
