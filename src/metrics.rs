//! Run counters and reporting.
//!
//! One [`RunMetrics`] instance is shared across a whole run: the
//! partitioner owns the record-level counters, each worker bumps the device
//! counter at publish time, and the orchestrator records rows and timing.
//! [`MetricsSnapshot`] is the read side, serializable for reporting.
//!
//! Malformed and pre-cutoff records are dropped by design, but how many
//! were dropped is part of a run's story, so it is counted rather than
//! discarded silently.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters for one pipeline run. All methods take `&self`.
#[derive(Debug, Default)]
pub struct RunMetrics {
    records_read: AtomicU64,
    records_malformed: AtomicU64,
    records_before_cutoff: AtomicU64,
    observations_routed: AtomicU64,
    devices_published: AtomicU64,
    rows_written: AtomicU64,
    timing: Mutex<Timing>,
}

#[derive(Debug, Default)]
struct Timing {
    started: Option<Instant>,
    finished: Option<Instant>,
}

impl RunMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one data record seen by the partitioner (header excluded).
    pub fn record_read(&self) {
        self.records_read.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one record dropped for structural reasons.
    pub fn record_malformed(&self) {
        self.records_malformed.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one record dropped for predating the cutoff.
    pub fn record_before_cutoff(&self) {
        self.records_before_cutoff.fetch_add(1, Ordering::Relaxed);
    }

    /// Count observations fanned out to the shard queues.
    pub fn add_observations(&self, n: u64) {
        self.observations_routed.fetch_add(n, Ordering::Relaxed);
    }

    /// Count devices handed to the shared collection by one worker.
    pub fn add_devices(&self, n: u64) {
        self.devices_published.fetch_add(n, Ordering::Relaxed);
    }

    /// Count rows serialized by the writer.
    pub fn add_rows(&self, n: u64) {
        self.rows_written.fetch_add(n, Ordering::Relaxed);
    }

    /// Record the start of the run.
    pub fn record_start(&self) {
        self.timing.lock().unwrap().started = Some(Instant::now());
    }

    /// Record the end of the run.
    pub fn record_end(&self) {
        self.timing.lock().unwrap().finished = Some(Instant::now());
    }

    /// Wall-clock time between `record_start` and `record_end`, if both
    /// were called.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        let timing = self.timing.lock().unwrap();
        match (timing.started, timing.finished) {
            (Some(started), Some(finished)) => Some(finished.duration_since(started)),
            _ => None,
        }
    }

    /// Point-in-time view of every counter.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_read: self.records_read.load(Ordering::Relaxed),
            records_malformed: self.records_malformed.load(Ordering::Relaxed),
            records_before_cutoff: self.records_before_cutoff.load(Ordering::Relaxed),
            observations_routed: self.observations_routed.load(Ordering::Relaxed),
            devices_published: self.devices_published.load(Ordering::Relaxed),
            rows_written: self.rows_written.load(Ordering::Relaxed),
            execution_time_ms: self.elapsed().map(|d| d.as_millis() as u64),
        }
    }
}

/// Serializable view of [`RunMetrics`] at one point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub records_read: u64,
    pub records_malformed: u64,
    pub records_before_cutoff: u64,
    pub observations_routed: u64,
    pub devices_published: u64,
    pub rows_written: u64,
    /// `None` when the run never completed.
    pub execution_time_ms: Option<u64>,
}

impl MetricsSnapshot {
    /// All counters as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::json!(self)
    }

    /// Print the counters to stdout in a human-readable format.
    pub fn print(&self) {
        println!("Run metrics:");
        println!("  records_read: {}", self.records_read);
        println!("  records_malformed: {}", self.records_malformed);
        println!("  records_before_cutoff: {}", self.records_before_cutoff);
        println!("  observations_routed: {}", self.observations_routed);
        println!("  devices_published: {}", self.devices_published);
        println!("  rows_written: {}", self.rows_written);
        if let Some(ms) = self.execution_time_ms {
            println!("  execution_time_ms: {ms}");
        }
    }

    /// Save the counters to a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file =
            File::create(path).with_context(|| format!("create {}", path.display()))?;
        let json = serde_json::to_string_pretty(&self.to_json())?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}
