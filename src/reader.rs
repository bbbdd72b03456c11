//! The partitioner: the pipeline's single reader stage.
//!
//! One thread parses the delimited input, decomposes each valid record into
//! per-sensor observations, and routes every observation to a shard queue
//! chosen by hashing the device id. Routing is the only place where shard
//! assignment happens; workers never see another shard's devices.

use crate::config::PipelineConfig;
use crate::hash::shard_index;
use crate::metrics::RunMetrics;
use crate::queue::ShardQueue;
use crate::record::{self, Observation, SensorKind};
use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use std::io::Read;

/// Read `input`, fan out observations to `queues`, and close every queue.
///
/// The header row is discarded unread. Malformed records and records dated
/// before the cutoff are dropped and counted; a sensor field that fails
/// its strict parse only drops that one sensor. Every queue is closed
/// exactly once when this returns, on the error path too, so workers
/// always observe the finished signal.
///
/// # Errors
/// Returns an error if the underlying reader fails mid-input. Per-record
/// parse failures are not errors.
pub fn partition<R: Read>(
    input: R,
    config: &PipelineConfig,
    queues: &[ShardQueue<Observation>],
    metrics: &RunMetrics,
) -> Result<()> {
    let result = route_records(input, config, queues, metrics);
    for queue in queues {
        queue.close();
    }
    result
}

fn route_records<R: Read>(
    input: R,
    config: &PipelineConfig,
    queues: &[ShardQueue<Observation>],
    metrics: &RunMetrics,
) -> Result<()> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(input);

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => {
                return Err(err).context("read input records");
            }
            Err(_) => {
                // Not decodable as a record at all (e.g. invalid UTF-8).
                metrics.record_read();
                metrics.record_malformed();
                continue;
            }
        };
        metrics.record_read();

        let Some(line) = record::parse_line(&record) else {
            metrics.record_malformed();
            continue;
        };
        if !config.cutoff.admits(line.year, line.month) {
            metrics.record_before_cutoff();
            continue;
        }

        let shard = shard_index(&line.device_id, queues.len());
        let mut routed = 0u64;
        for (sensor, value) in SensorKind::ALL.into_iter().zip(line.values) {
            let Some(value) = value else { continue };
            let obs = Observation {
                device_id: line.device_id.clone(),
                period: line.period.clone(),
                sensor,
                value,
            };
            if queues[shard].push(obs).is_err() {
                bail!("shard queue {shard} closed while routing");
            }
            routed += 1;
        }
        metrics.add_observations(routed);
    }

    Ok(())
}
