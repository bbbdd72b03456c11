//! # Shardflow
//!
//! A **sharded worker-pool pipeline** for aggregating large delimited IoT
//! sensor logs: per-device, per-month, per-sensor min/max/average for every
//! record at or after a configurable cutoff period.
//!
//! ## Key Features
//!
//! - **Hash partitioning** - each device id maps to one worker via
//!   MurmurHash3, so the aggregation hot path is contention-free
//! - **Bounded backpressure** - one blocking queue per worker caps memory
//!   when a worker lags behind the reader
//! - **Graceful multi-queue shutdown** - an idempotent close signal drains
//!   every queue before workers publish
//! - **Single synchronized hand-off** - workers touch shared state exactly
//!   once, in a bulk publish under one lock
//! - **Deterministic output** - results sorted by device then period,
//!   identical for 1 or N workers
//! - **Run metrics** - dropped-record and throughput counters with JSON
//!   reporting
//!
//! ## Quick Start
//!
//! ```ignore
//! use shardflow::{Cutoff, Pipeline, PipelineConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = PipelineConfig::default()
//!     .with_cutoff(Cutoff::new(2024, 3))
//!     .with_workers(8);
//!
//! let summary = Pipeline::new(config).run_file("devices.csv", "output/results.csv")?;
//! summary.metrics.print();
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline Stages
//!
//! ```text
//! reader/partitioner ──► N shard queues ──► N workers ──► shared collection ──► writer
//! ```
//!
//! 1. A single reader parses each line, decomposes it into up to six
//!    per-sensor observations, and routes them by device-id hash.
//! 2. Each worker drains its own bounded queue into a private aggregation
//!    table until the queue reports end of data.
//! 3. Each worker appends its finished aggregates to the shared collection
//!    in one synchronized publish step, then exits.
//! 4. After every worker has joined, the writer finalizes averages, sorts,
//!    and serializes.
//!
//! ## Module Overview
//!
//! - [`record`] - input layout, strict field parsing, [`Observation`]
//! - [`hash`] - MurmurHash3 shard selection
//! - [`queue`] - the bounded blocking [`ShardQueue`]
//! - [`aggregate`] - per-worker min/max/sum/count state
//! - [`reader`] / [`worker`] / [`writer`] - the three pipeline stages
//! - [`collection`] - the single-lock worker-to-writer hand-off
//! - [`pipeline`] - orchestration and the [`Pipeline`] entry point
//! - [`config`] / [`metrics`] - run knobs and run counters
//! - [`testing`] - fixtures for building inputs in tests

pub mod aggregate;
pub mod collection;
pub mod config;
pub mod hash;
pub mod metrics;
pub mod pipeline;
pub mod queue;
pub mod reader;
pub mod record;
pub mod testing;
pub mod worker;
pub mod writer;

pub use aggregate::{DeviceAggregates, PeriodAggregates, SensorStats};
pub use collection::SharedCollection;
pub use config::{Cutoff, DEFAULT_QUEUE_CAPACITY, PipelineConfig};
pub use hash::{murmur3_32, shard_index};
pub use metrics::{MetricsSnapshot, RunMetrics};
pub use pipeline::{Pipeline, RunSummary};
pub use queue::ShardQueue;
pub use record::{FIELD_COUNT, Observation, ParsedLine, SensorKind};
pub use writer::OUTPUT_HEADER;
