//! The record parser: one raw delimited line in, field values out.
//!
//! Input lines carry exactly [`FIELD_COUNT`] `|`-separated fields: row id,
//! device id, count, date, the six sensor channels, latitude, longitude.
//! Only the device id, the date, and the sensor channels feed aggregation.
//!
//! A line is dropped as a whole when its structure is wrong (field count,
//! device id, date); a sensor field that fails the strict numeric grammar
//! only blanks that one sensor, so a line contributes anywhere from zero to
//! six observations.

use csv::StringRecord;

/// Fields a well-formed input line carries.
pub const FIELD_COUNT: usize = 12;

const FIELD_DEVICE: usize = 1;
const FIELD_DATE: usize = 3;
const FIELD_FIRST_SENSOR: usize = 4;

/// The six aggregated sensor channels, in input-column order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Temperatura,
    Umidade,
    Luminosidade,
    Ruido,
    Eco2,
    Etvoc,
}

impl SensorKind {
    /// Number of sensor channels.
    pub const COUNT: usize = 6;

    /// All channels, in input-column (and output) order.
    pub const ALL: [SensorKind; Self::COUNT] = [
        SensorKind::Temperatura,
        SensorKind::Umidade,
        SensorKind::Luminosidade,
        SensorKind::Ruido,
        SensorKind::Eco2,
        SensorKind::Etvoc,
    ];

    /// Name used in the results file.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SensorKind::Temperatura => "temperatura",
            SensorKind::Umidade => "umidade",
            SensorKind::Luminosidade => "luminosidade",
            SensorKind::Ruido => "ruido",
            SensorKind::Eco2 => "eco2",
            SensorKind::Etvoc => "etvoc",
        }
    }

    /// Position in a per-period stats array.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One (device, period, sensor, value) data point from one input line.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub device_id: String,
    /// `YYYY-MM` period key.
    pub period: String,
    pub sensor: SensorKind,
    pub value: f64,
}

/// A structurally valid input line: identity fields plus up to six
/// independently parsed sensor values.
#[derive(Clone, Debug)]
pub struct ParsedLine {
    pub device_id: String,
    pub year: i32,
    pub month: u32,
    /// First seven characters of the date field.
    pub period: String,
    pub values: [Option<f64>; SensorKind::COUNT],
}

/// Parse one record into a [`ParsedLine`].
///
/// Returns `None` when the line as a whole is malformed: wrong field
/// count, empty device id, or a date that does not start with `YYYY-MM`.
/// Fields are expected pre-trimmed (the reader configures `csv` to trim).
#[must_use]
pub fn parse_line(record: &StringRecord) -> Option<ParsedLine> {
    if record.len() != FIELD_COUNT {
        return None;
    }

    let device_id = record.get(FIELD_DEVICE)?;
    if device_id.is_empty() {
        return None;
    }

    let date = record.get(FIELD_DATE)?;
    let (year, month) = parse_period(date)?;

    let mut values = [None; SensorKind::COUNT];
    for (offset, slot) in values.iter_mut().enumerate() {
        *slot = record.get(FIELD_FIRST_SENSOR + offset).and_then(parse_value);
    }

    Some(ParsedLine {
        device_id: device_id.to_string(),
        year,
        month,
        period: date[..7].to_string(),
        values,
    })
}

/// Extract `(year, month)` from a date field.
///
/// The field must start with `YYYY-MM`; whatever follows (day, time) is
/// ignored. A month outside `01..=12` is unparsable.
fn parse_period(date: &str) -> Option<(i32, u32)> {
    let bytes = date.as_bytes();
    if bytes.len() < 7 || bytes[4] != b'-' {
        return None;
    }
    if !bytes[..4].iter().chain(&bytes[5..7]).all(u8::is_ascii_digit) {
        return None;
    }

    let year = date[..4].parse().ok()?;
    let month = date[5..7].parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}

/// Strict numeric parse for a sensor field.
///
/// Accepts `[+|-]digits[.digits]` with nothing but whitespace around it;
/// a decimal comma is read as a dot. Empty fields, exponent notation, and
/// trailing garbage all reject the field.
#[must_use]
pub fn parse_value(field: &str) -> Option<f64> {
    let bytes = field.trim().as_bytes();
    if bytes.is_empty() {
        return None;
    }

    let mut i = 0;
    let negative = bytes[0] == b'-';
    if negative || bytes[0] == b'+' {
        i = 1;
    }

    let mut value = 0f64;
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        value = value * 10.0 + f64::from(bytes[i] - b'0');
        i += 1;
    }
    if i == int_start {
        return None;
    }

    if i < bytes.len() && (bytes[i] == b'.' || bytes[i] == b',') {
        i += 1;
        let frac_start = i;
        let mut frac = 0f64;
        let mut scale = 1f64;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            frac = frac * 10.0 + f64::from(bytes[i] - b'0');
            scale *= 10.0;
            i += 1;
        }
        if i == frac_start {
            return None;
        }
        value += frac / scale;
    }

    if i != bytes.len() {
        return None;
    }

    Some(if negative { -value } else { value })
}
