//! Run configuration.

use anyhow::{Context, bail};
use std::fmt;
use std::str::FromStr;

/// Default bounded capacity of each shard queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 2048;

/// Inclusive lower bound on the periods that are aggregated.
///
/// Records dated before the cutoff are dropped at the partitioner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cutoff {
    pub year: i32,
    pub month: u32,
}

impl Cutoff {
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Whether a record dated `(year, month)` is at or after the cutoff.
    #[must_use]
    pub fn admits(&self, year: i32, month: u32) -> bool {
        year > self.year || (year == self.year && month >= self.month)
    }
}

impl Default for Cutoff {
    fn default() -> Self {
        Self::new(2024, 3)
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Cutoff {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((year, month)) = s.split_once('-') else {
            bail!("cutoff must read YYYY-MM, got {s:?}");
        };
        let year = year
            .parse()
            .with_context(|| format!("cutoff year in {s:?}"))?;
        let month: u32 = month
            .parse()
            .with_context(|| format!("cutoff month in {s:?}"))?;
        if !(1..=12).contains(&month) {
            bail!("cutoff month out of range in {s:?}");
        }
        Ok(Self::new(year, month))
    }
}

/// Knobs for one pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Records before this period are dropped.
    pub cutoff: Cutoff,
    /// Worker count; also the shard and queue count. Minimum 1.
    pub workers: usize,
    /// Bounded capacity of each shard queue. Minimum 1.
    pub queue_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cutoff: Cutoff::default(),
            workers: num_cpus::get().max(1),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn with_cutoff(mut self, cutoff: Cutoff) -> Self {
        self.cutoff = cutoff;
        self
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }
}
