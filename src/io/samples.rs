//! CSV ingestion of raw 5-minute station telemetry.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::debug;

use crate::error::DataError;
use crate::features::RawSample;

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// One CSV row; extra columns in the file are ignored.
#[derive(Debug, Deserialize)]
struct SampleRow {
    time: String,
    busy: Option<f64>,
    idle: Option<f64>,
    s_price: Option<f64>,
    e_price: Option<f64>,
    duration: Option<f64>,
    volume: Option<f64>,
}

/// Parses a naive timestamp in any of the accepted layouts.
///
/// # Errors
///
/// Returns [`DataError::Timestamp`] if no layout matches.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, DataError> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| DataError::Timestamp {
            value: value.to_string(),
        })
}

/// Reads station samples from CSV with a header row.
///
/// Rows with an empty or non-finite (`NaN`, `inf`) numeric cell are dropped.
///
/// # Errors
///
/// Returns [`DataError::Csv`] for malformed CSV and [`DataError::Timestamp`]
/// for unparseable times.
pub fn read_samples(reader: impl io::Read) -> Result<Vec<RawSample>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut samples = Vec::new();
    let mut dropped = 0_usize;

    for row in rdr.deserialize::<SampleRow>() {
        let row = row?;
        let timestamp = parse_timestamp(&row.time)?;
        let (Some(busy), Some(idle), Some(s_price), Some(e_price), Some(duration), Some(volume)) = (
            row.busy,
            row.idle,
            row.s_price,
            row.e_price,
            row.duration,
            row.volume,
        ) else {
            dropped += 1;
            continue;
        };
        if ![busy, idle, s_price, e_price, duration, volume]
            .iter()
            .all(|v| v.is_finite())
        {
            dropped += 1;
            continue;
        }
        samples.push(RawSample {
            timestamp,
            busy,
            idle,
            s_price,
            e_price,
            duration,
            volume,
        });
    }

    debug!(n_samples = samples.len(), dropped, "read station samples");
    Ok(samples)
}

/// Reads station samples from a CSV file.
///
/// # Errors
///
/// Returns [`DataError::Io`] if the file cannot be opened, otherwise as
/// [`read_samples`].
pub fn read_samples_from_path(path: &Path) -> Result<Vec<RawSample>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_samples(BufReader::new(file))
}
