use shardflow::aggregate::{DeviceAggregates, SensorStats};
use shardflow::record::{Observation, SensorKind};

fn obs(device: &str, period: &str, sensor: SensorKind, value: f64) -> Observation {
    Observation {
        device_id: device.to_string(),
        period: period.to_string(),
        sensor,
        value,
    }
}

#[test]
fn first_value_initializes_min_and_max() {
    let mut stats = SensorStats::default();
    stats.record(21.5);

    assert_eq!(stats.min, 21.5);
    assert_eq!(stats.max, 21.5);
    assert_eq!(stats.sum, 21.5);
    assert_eq!(stats.count, 1);
}

#[test]
fn later_values_update_extremes_by_comparison() {
    let mut stats = SensorStats::default();
    for value in [21.5, 23.5, 19.0, 22.0] {
        stats.record(value);
    }

    assert_eq!(stats.min, 19.0);
    assert_eq!(stats.max, 23.5);
    assert_eq!(stats.sum, 86.0);
    assert_eq!(stats.count, 4);
}

#[test]
fn finalize_computes_the_average_once() {
    let mut stats = SensorStats::default();
    stats.record(21.5);
    stats.record(23.5);
    stats.finalize();

    assert_eq!(stats.avg, 22.5);
}

#[test]
fn untouched_sensor_reports_no_data() {
    let mut stats = SensorStats::default();
    assert!(!stats.has_data());
    stats.finalize();
    assert_eq!(stats.avg, 0.0);
}

#[test]
fn apply_creates_period_entries_on_first_contact() {
    let mut device = DeviceAggregates::new("dev-A");
    device.apply(&obs("dev-A", "2024-03", SensorKind::Temperatura, 21.5));
    device.apply(&obs("dev-A", "2024-04", SensorKind::Temperatura, 25.0));
    device.apply(&obs("dev-A", "2024-03", SensorKind::Temperatura, 23.5));

    assert_eq!(device.periods.len(), 2);
    let march = &device.periods["2024-03"];
    assert_eq!(march.sensors[SensorKind::Temperatura.index()].count, 2);
    let april = &device.periods["2024-04"];
    assert_eq!(april.sensors[SensorKind::Temperatura.index()].count, 1);
}

#[test]
fn sensors_within_a_period_are_independent() {
    let mut device = DeviceAggregates::new("dev-A");
    device.apply(&obs("dev-A", "2024-03", SensorKind::Temperatura, 21.5));
    device.apply(&obs("dev-A", "2024-03", SensorKind::Umidade, 60.0));

    let march = &device.periods["2024-03"];
    assert_eq!(march.sensors[SensorKind::Temperatura.index()].count, 1);
    assert_eq!(march.sensors[SensorKind::Umidade.index()].count, 1);
    assert_eq!(march.sensors[SensorKind::Luminosidade.index()].count, 0);
}

#[test]
fn into_sorted_periods_sorts_and_finalizes() {
    let mut device = DeviceAggregates::new("dev-A");
    device.apply(&obs("dev-A", "2024-12", SensorKind::Temperatura, 10.0));
    device.apply(&obs("dev-A", "2024-03", SensorKind::Temperatura, 21.5));
    device.apply(&obs("dev-A", "2024-03", SensorKind::Temperatura, 23.5));
    device.apply(&obs("dev-A", "2025-01", SensorKind::Temperatura, 5.0));

    let periods = device.into_sorted_periods();
    let keys: Vec<&str> = periods.iter().map(|p| p.period.as_str()).collect();
    assert_eq!(keys, vec!["2024-03", "2024-12", "2025-01"]);

    let march = &periods[0].sensors[SensorKind::Temperatura.index()];
    assert_eq!(march.avg, 22.5);
}
