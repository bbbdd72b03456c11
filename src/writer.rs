//! The writer: finalize averages, sort, and serialize results.
//!
//! Runs strictly after every worker has joined, so it sees the complete
//! shared collection and owns it exclusively.

use crate::aggregate::DeviceAggregates;
use crate::record::SensorKind;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::io::Write;

/// Header of the results file.
pub const OUTPUT_HEADER: [&str; 6] = [
    "device",
    "ano-mes",
    "sensor",
    "valor_maximo",
    "valor_medio",
    "valor_minimo",
];

/// Serialize `devices` to `out` as `;`-separated rows.
///
/// Devices are sorted by id and each device's periods by `YYYY-MM` key,
/// both lexicographic. One row per device/period/sensor that saw data:
/// `device;ano-mes;sensor;max;avg;min`, values to two decimals. A sensor
/// with no observed values never appears.
///
/// Consumes the aggregates; on return all aggregate memory is released.
///
/// # Returns
/// The number of data rows written (header excluded).
///
/// # Errors
/// Returns an error on serialization or flush failure.
pub fn write_results<W: Write>(mut devices: Vec<DeviceAggregates>, out: W) -> Result<u64> {
    devices.sort_by(|a, b| a.device_id.cmp(&b.device_id));

    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(csv::QuoteStyle::Never)
        .has_headers(false)
        .from_writer(out);

    writer
        .write_record(OUTPUT_HEADER)
        .context("write output header")?;

    let mut rows = 0u64;
    for device in devices {
        let device_id = device.device_id.clone();
        for period in device.into_sorted_periods() {
            for sensor in SensorKind::ALL {
                let stats = &period.sensors[sensor.index()];
                if !stats.has_data() {
                    continue;
                }
                let max = format!("{:.2}", stats.max);
                let avg = format!("{:.2}", stats.avg);
                let min = format!("{:.2}", stats.min);
                writer
                    .write_record([
                        device_id.as_str(),
                        period.period.as_str(),
                        sensor.name(),
                        max.as_str(),
                        avg.as_str(),
                        min.as_str(),
                    ])
                    .with_context(|| format!("serialize row for device {device_id}"))?;
                rows += 1;
            }
        }
    }

    writer.flush().context("flush output")?;
    Ok(rows)
}
