//! Timing and resource sampling around async operations.

mod probe;
mod sink;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use tokio::task;
use tracing::{debug, error, info, warn};

pub use probe::{DeviceProbe, HostProbe};
pub use sink::{CSV_HEADER, MetricsSink};

use sink::csv_field;

/// One profiled operation, as logged and persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMetrics {
    pub timestamp: String,
    pub user_story: String,
    pub device_model: String,
    pub os_version: String,
    pub initial_memory: i64,
    pub final_memory: i64,
    pub memory_used: i64,
    pub initial_battery: i32,
    pub final_battery: i32,
    pub battery_used: i32,
    pub time_taken_ms: i64,
}

impl ResourceMetrics {
    pub fn csv_row(&self) -> String {
        [
            csv_field(&self.timestamp),
            csv_field(&self.user_story),
            csv_field(&self.device_model),
            csv_field(&self.os_version),
            self.initial_memory.to_string(),
            self.final_memory.to_string(),
            self.memory_used.to_string(),
            self.initial_battery.to_string(),
            self.final_battery.to_string(),
            self.battery_used.to_string(),
            self.time_taken_ms.to_string(),
        ]
        .join(",")
    }
}

/// Side-channel decorator: the wrapped operation's output is returned as is
/// and a panic inside it unwinds through `profile` untouched.
#[derive(Clone)]
pub struct Profiler {
    sink: MetricsSink,
    probe: Arc<dyn DeviceProbe>,
}

impl Profiler {
    pub fn new(sink: MetricsSink, probe: Arc<dyn DeviceProbe>) -> Self {
        Self { sink, probe }
    }

    pub fn with_host_probe(sink: MetricsSink) -> Self {
        Self::new(sink, Arc::new(HostProbe))
    }

    pub async fn profile<F, T>(&self, user_story: &str, operation: F) -> T
    where
        F: Future<Output = T>,
    {
        let (device_model, os_version) = self
            .on_blocking_pool(|probe| (probe.device_model(), probe.os_version()))
            .await
            .unwrap_or_default();
        let (initial_memory, initial_battery) = self.sample().await;

        debug!(user_story, device = %device_model, "starting profiling");

        let started = Instant::now();
        let output = operation.await;
        let elapsed = started.elapsed();

        let (final_memory, final_battery) = self.sample().await;

        let metrics = ResourceMetrics {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            user_story: user_story.to_string(),
            device_model,
            os_version,
            initial_memory,
            final_memory,
            memory_used: final_memory - initial_memory,
            initial_battery,
            final_battery,
            battery_used: initial_battery - final_battery,
            time_taken_ms: i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
        };

        info!(
            user_story = %metrics.user_story,
            device = %metrics.device_model,
            os = %metrics.os_version,
            time_ms = metrics.time_taken_ms,
            memory_used = metrics.memory_used,
            battery_used = metrics.battery_used,
            timestamp = %metrics.timestamp,
            "profiling metrics"
        );

        if let Err(err) = self.sink.append(&metrics).await {
            error!(path = %self.sink.path().display(), error = %err, "failed to save metrics");
        }

        output
    }

    async fn sample(&self) -> (i64, i32) {
        self.on_blocking_pool(|probe| (probe.memory_usage(), probe.battery_level()))
            .await
            .unwrap_or_default()
    }

    /// Probes read `/proc` and `/sys` synchronously, so they run off the
    /// async workers.
    async fn on_blocking_pool<R, F>(&self, read: F) -> Option<R>
    where
        R: Send + 'static,
        F: FnOnce(&dyn DeviceProbe) -> R + Send + 'static,
    {
        let probe = Arc::clone(&self.probe);
        match task::spawn_blocking(move || read(&*probe)).await {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(error = %err, "device probe failed");
                None
            }
        }
    }
}
