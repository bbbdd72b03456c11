//! The shared hand-off point between workers and the writer.

use crate::aggregate::DeviceAggregates;
use std::mem;
use std::sync::Mutex;

/// Process-wide list of finalized per-worker device aggregates.
///
/// This is the pipeline's only multi-writer resource. The single lock is
/// held for each worker's brief bulk append and for the writer's drain,
/// never during per-observation work, which keeps it off the hot path.
#[derive(Debug, Default)]
pub struct SharedCollection {
    devices: Mutex<Vec<DeviceAggregates>>,
}

impl SharedCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A worker's single publish step: append everything it aggregated
    /// under one lock acquisition, transferring ownership.
    pub fn publish(&self, batch: Vec<DeviceAggregates>) {
        self.devices.lock().unwrap().extend(batch);
    }

    /// Take every published device, leaving the collection empty.
    #[must_use]
    pub fn drain(&self) -> Vec<DeviceAggregates> {
        mem::take(&mut *self.devices.lock().unwrap())
    }

    /// Devices published so far.
    pub fn len(&self) -> usize {
        self.devices.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
