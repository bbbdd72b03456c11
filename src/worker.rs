//! Shard workers: drain one queue each, aggregate privately, publish once.

use crate::aggregate::DeviceAggregates;
use crate::collection::SharedCollection;
use crate::metrics::RunMetrics;
use crate::queue::ShardQueue;
use crate::record::Observation;
use std::collections::HashMap;

/// Drain `queue` until it reports end of data, folding every observation
/// into a table private to this call, then hand the finished aggregates to
/// `shared` in a single publish step.
///
/// Workers never communicate with each other; the shared collection's lock
/// is taken exactly once, after the queue's finished signal.
pub fn run_worker(
    queue: &ShardQueue<Observation>,
    shared: &SharedCollection,
    metrics: &RunMetrics,
) {
    let mut devices: HashMap<String, DeviceAggregates> = HashMap::new();

    while let Some(obs) = queue.pop() {
        match devices.get_mut(&obs.device_id) {
            Some(device) => device.apply(&obs),
            None => {
                devices
                    .entry(obs.device_id.clone())
                    .or_insert_with(|| DeviceAggregates::new(obs.device_id.clone()))
                    .apply(&obs);
            }
        }
    }

    metrics.add_devices(devices.len() as u64);
    shared.publish(devices.into_values().collect());
}
