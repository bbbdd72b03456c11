//! Testing utilities for shardflow pipelines.
//!
//! Fixtures for building input files in the expected 12-field layout and
//! reading results back, used by the integration tests and available to
//! downstream users writing their own.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Header row of the input format.
pub const INPUT_HEADER: &str =
    "id|device|contagem|data|temperatura|umidade|luminosidade|ruido|eco2|etvoc|latitude|longitude";

/// Build one input line with the given device, date, and six sensor
/// fields (pass `""` for an absent sensor).
#[must_use]
pub fn input_line(device: &str, date: &str, sensors: [&str; 6]) -> String {
    format!(
        "1|{device}|1|{date}|{}|{}|{}|{}|{}|{}|-23.55|-46.63",
        sensors[0], sensors[1], sensors[2], sensors[3], sensors[4], sensors[5],
    )
}

/// Shorthand for a line that only carries a temperature reading.
#[must_use]
pub fn temperature_line(device: &str, date: &str, value: &str) -> String {
    input_line(device, date, [value, "", "", "", "", ""])
}

/// Materialize an input file (header plus `lines`) in a fresh temp dir.
///
/// Keep the returned [`TempDir`] alive for as long as the path is used.
///
/// # Errors
/// Returns an error if the directory or file cannot be created.
pub fn write_input(lines: &[String]) -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new().context("create temp dir")?;
    let path = dir.path().join("devices.csv");

    let mut contents = String::from(INPUT_HEADER);
    for line in lines {
        contents.push('\n');
        contents.push_str(line);
    }
    contents.push('\n');

    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok((dir, path))
}

/// Read output rows back as strings, header excluded.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_output_rows(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(contents.lines().skip(1).map(str::to_string).collect())
}
