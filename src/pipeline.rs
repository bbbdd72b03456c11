//! Pipeline orchestration: partitioner → shard queues → workers → writer.
//!
//! The orchestrator builds an explicit per-run context (queues, shared
//! collection, metrics) and threads it by reference through the stages;
//! there are no ambient globals. Ordering is enforced with explicit
//! barriers: each worker publishes only after its queue's finished signal,
//! and the writer starts only after every worker has joined.

use crate::collection::SharedCollection;
use crate::config::PipelineConfig;
use crate::metrics::{MetricsSnapshot, RunMetrics};
use crate::queue::ShardQueue;
use crate::record::Observation;
use crate::{reader, worker, writer};
use anyhow::{Context, Result, anyhow};
use std::fs::{File, create_dir_all};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::thread;

/// What a finished run reports back.
#[derive(Clone, Copy, Debug)]
pub struct RunSummary {
    pub metrics: MetricsSnapshot,
}

/// The sharded aggregation pipeline.
///
/// A `Pipeline` value is reusable: each run builds a fresh context, so no
/// state leaks between runs.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run end to end from any reader to any writer.
    ///
    /// Spawns one worker thread per shard, runs the partitioner on the
    /// calling thread, joins every worker, then drains the shared
    /// collection and serializes results.
    ///
    /// # Errors
    /// Returns an error if the input fails mid-read, a worker thread
    /// cannot be spawned or panics, or the output cannot be written.
    /// Malformed input lines are dropped and counted, not errors.
    pub fn run<R: Read, W: Write>(&self, input: R, output: W) -> Result<RunSummary> {
        let metrics = RunMetrics::new();
        metrics.record_start();

        let queues: Vec<ShardQueue<Observation>> = (0..self.config.workers.max(1))
            .map(|_| ShardQueue::with_capacity(self.config.queue_capacity))
            .collect();
        let shared = SharedCollection::new();

        let routed: Result<()> = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(queues.len());
            for (index, queue) in queues.iter().enumerate() {
                let shared = &shared;
                let metrics = &metrics;
                let spawned = thread::Builder::new()
                    .name(format!("shard-worker-{index}"))
                    .spawn_scoped(scope, move || worker::run_worker(queue, shared, metrics));
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        // Unblock the workers already spawned before bailing,
                        // or the scope would never join them.
                        for queue in &queues {
                            queue.close();
                        }
                        return Err(err).context("spawn worker thread");
                    }
                }
            }

            let routed = reader::partition(input, &self.config, &queues, &metrics);

            for handle in handles {
                handle
                    .join()
                    .map_err(|_| anyhow!("worker thread panicked"))?;
            }
            routed
        });
        routed?;

        let rows = writer::write_results(shared.drain(), output)?;
        metrics.add_rows(rows);
        metrics.record_end();

        Ok(RunSummary {
            metrics: metrics.snapshot(),
        })
    }

    /// Run end to end between files, creating the output's parent
    /// directories as needed.
    ///
    /// # Errors
    /// Failing to open the input or create the output is fatal for the
    /// run; see [`Pipeline::run`] for the rest.
    pub fn run_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<RunSummary> {
        let input = input.as_ref();
        let output = output.as_ref();

        let source = File::open(input).with_context(|| format!("open {}", input.display()))?;
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
        }
        let sink = File::create(output).with_context(|| format!("create {}", output.display()))?;

        self.run(BufReader::new(source), BufWriter::new(sink))
    }
}
