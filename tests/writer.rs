use shardflow::aggregate::DeviceAggregates;
use shardflow::record::{Observation, SensorKind};
use shardflow::writer::write_results;

fn obs(device: &str, period: &str, sensor: SensorKind, value: f64) -> Observation {
    Observation {
        device_id: device.to_string(),
        period: period.to_string(),
        sensor,
        value,
    }
}

fn device_with(device: &str, points: &[(&str, SensorKind, f64)]) -> DeviceAggregates {
    let mut aggregates = DeviceAggregates::new(device);
    for (period, sensor, value) in points {
        aggregates.apply(&obs(device, period, *sensor, *value));
    }
    aggregates
}

#[test]
fn header_then_two_decimal_rows() -> anyhow::Result<()> {
    let device = device_with(
        "dev-A",
        &[
            ("2024-03", SensorKind::Temperatura, 21.5),
            ("2024-03", SensorKind::Temperatura, 23.5),
        ],
    );

    let mut out = Vec::new();
    let rows = write_results(vec![device], &mut out)?;
    assert_eq!(rows, 1);

    let text = String::from_utf8(out)?;
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("device;ano-mes;sensor;valor_maximo;valor_medio;valor_minimo")
    );
    assert_eq!(
        lines.next(),
        Some("dev-A;2024-03;temperatura;23.50;22.50;21.50")
    );
    assert_eq!(lines.next(), None);
    Ok(())
}

#[test]
fn devices_and_periods_come_out_sorted() -> anyhow::Result<()> {
    let second = device_with(
        "sensor-b",
        &[
            ("2024-05", SensorKind::Umidade, 55.0),
            ("2024-03", SensorKind::Umidade, 60.0),
        ],
    );
    let first = device_with("sensor-a", &[("2024-04", SensorKind::Umidade, 50.0)]);

    let mut out = Vec::new();
    write_results(vec![second, first], &mut out)?;

    let text = String::from_utf8(out)?;
    let rows: Vec<&str> = text.lines().skip(1).collect();
    assert_eq!(
        rows,
        vec![
            "sensor-a;2024-04;umidade;50.00;50.00;50.00",
            "sensor-b;2024-03;umidade;60.00;60.00;60.00",
            "sensor-b;2024-05;umidade;55.00;55.00;55.00",
        ]
    );
    Ok(())
}

#[test]
fn sensors_without_data_never_appear() -> anyhow::Result<()> {
    let device = device_with(
        "dev-A",
        &[
            ("2024-03", SensorKind::Temperatura, 20.0),
            ("2024-03", SensorKind::Etvoc, 7.0),
        ],
    );

    let mut out = Vec::new();
    let rows = write_results(vec![device], &mut out)?;
    assert_eq!(rows, 2);

    let text = String::from_utf8(out)?;
    assert!(!text.contains("umidade"));
    assert!(!text.contains("luminosidade"));
    assert!(!text.contains("ruido"));
    assert!(!text.contains("eco2"));
    Ok(())
}

#[test]
fn sensors_within_a_period_follow_column_order() -> anyhow::Result<()> {
    let device = device_with(
        "dev-A",
        &[
            ("2024-03", SensorKind::Etvoc, 7.0),
            ("2024-03", SensorKind::Temperatura, 20.0),
            ("2024-03", SensorKind::Ruido, 35.0),
        ],
    );

    let mut out = Vec::new();
    write_results(vec![device], &mut out)?;

    let text = String::from_utf8(out)?;
    let sensors: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|row| row.split(';').nth(2).unwrap())
        .collect();
    assert_eq!(sensors, vec!["temperatura", "ruido", "etvoc"]);
    Ok(())
}

#[test]
fn negative_values_format_with_sign() -> anyhow::Result<()> {
    let device = device_with("dev-A", &[("2024-03", SensorKind::Temperatura, -3.5)]);

    let mut out = Vec::new();
    write_results(vec![device], &mut out)?;

    let text = String::from_utf8(out)?;
    assert_eq!(
        text.lines().nth(1),
        Some("dev-A;2024-03;temperatura;-3.50;-3.50;-3.50")
    );
    Ok(())
}

#[test]
fn empty_input_writes_only_the_header() -> anyhow::Result<()> {
    let mut out = Vec::new();
    let rows = write_results(Vec::new(), &mut out)?;
    assert_eq!(rows, 0);

    let text = String::from_utf8(out)?;
    assert_eq!(text.lines().count(), 1);
    Ok(())
}
