//! Per-worker aggregation state.
//!
//! Workers mutate these structures privately; nothing here is shared until
//! the one-shot publish into the
//! [`SharedCollection`](crate::collection::SharedCollection).

use crate::record::{Observation, SensorKind};
use std::collections::HashMap;

/// Running min/max/sum/count for one (device, period, sensor) triple.
///
/// `avg` is only meaningful after [`SensorStats::finalize`]. A sensor that
/// never saw a value keeps `count == 0` and is skipped at serialization.
#[derive(Clone, Copy, Debug, Default)]
pub struct SensorStats {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: u64,
    pub avg: f64,
}

impl SensorStats {
    /// Fold one value in. The first value initializes min and max.
    pub fn record(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            if value < self.min {
                self.min = value;
            }
            if value > self.max {
                self.max = value;
            }
        }
        self.sum += value;
        self.count += 1;
    }

    /// Compute the average, once, after all values have been folded.
    pub fn finalize(&mut self) {
        if self.count > 0 {
            self.avg = self.sum / self.count as f64;
        }
    }

    /// Whether this sensor saw at least one value.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}

/// Aggregates for one device over one `YYYY-MM` period.
#[derive(Clone, Debug)]
pub struct PeriodAggregates {
    pub period: String,
    pub sensors: [SensorStats; SensorKind::COUNT],
}

impl PeriodAggregates {
    #[must_use]
    pub fn new(period: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            sensors: [SensorStats::default(); SensorKind::COUNT],
        }
    }
}

/// Everything one worker aggregated for a single device, keyed by period.
#[derive(Clone, Debug)]
pub struct DeviceAggregates {
    pub device_id: String,
    pub periods: HashMap<String, PeriodAggregates>,
}

impl DeviceAggregates {
    #[must_use]
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            periods: HashMap::new(),
        }
    }

    /// Fold one observation into the addressed sensor slot, creating the
    /// period entry on first contact.
    pub fn apply(&mut self, obs: &Observation) {
        self.periods
            .entry(obs.period.clone())
            .or_insert_with(|| PeriodAggregates::new(obs.period.clone()))
            .sensors[obs.sensor.index()]
            .record(obs.value);
    }

    /// Finalize every average and hand back the periods sorted by key.
    ///
    /// `YYYY-MM` keys are zero-padded, so lexicographic order is
    /// chronological order.
    #[must_use]
    pub fn into_sorted_periods(self) -> Vec<PeriodAggregates> {
        let mut periods: Vec<PeriodAggregates> = self.periods.into_values().collect();
        periods.sort_by(|a, b| a.period.cmp(&b.period));
        for period in &mut periods {
            for stats in &mut period.sensors {
                stats.finalize();
            }
        }
        periods
    }
}
