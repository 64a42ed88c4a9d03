use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::ResourceMetrics;

pub const CSV_HEADER: &str = "Timestamp,UserStory,DeviceModel,AndroidVersion,InitialMemory,FinalMemory,MemoryUsed,InitialBattery,FinalBattery,BatteryUsed,TimeTakenMs";

/// Append-only CSV file of profiling rows. Clones share one write lock.
#[derive(Clone, Debug)]
pub struct MetricsSink {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl MetricsSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row, writing the header first if the file is new or empty.
    pub async fn append(&self, metrics: &ResourceMetrics) -> Result<()> {
        let _guard = self.lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open metrics file {}", self.path.display()))?;

        let is_empty = file
            .metadata()
            .await
            .with_context(|| format!("Failed to stat metrics file {}", self.path.display()))?
            .len()
            == 0;

        let mut chunk = String::new();
        if is_empty {
            chunk.push_str(CSV_HEADER);
            chunk.push('\n');
        }
        chunk.push_str(&metrics.csv_row());
        chunk.push('\n');

        file.write_all(chunk.as_bytes())
            .await
            .with_context(|| format!("Failed to append to metrics file {}", self.path.display()))?;
        file.flush().await?;

        Ok(())
    }
}

/// Quotes a field when it would otherwise break the row apart.
pub(crate) fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
