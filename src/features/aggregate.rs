use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};
use tracing::debug;

use super::sample::{HourlyRecord, RawSample};

/// Fixed-width time bucket used for aggregation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// One-hour buckets (the training granularity).
    #[default]
    Hour,
    /// Calendar-day buckets.
    Day,
}

impl Bucket {
    /// Truncates `timestamp` to the start of its bucket.
    pub fn truncate(self, timestamp: NaiveDateTime) -> NaiveDateTime {
        let date = timestamp.date();
        let hour = match self {
            Self::Hour => timestamp.hour(),
            Self::Day => 0,
        };
        // `and_hms_opt` only fails on out-of-range fields; hour comes from a valid time.
        date.and_hms_opt(hour, 0, 0).unwrap_or(timestamp)
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    count: usize,
    busy: f64,
    idle: f64,
    s_price: f64,
    e_price: f64,
    duration: f64,
    volume: f64,
}

impl Accumulator {
    fn add(&mut self, sample: &RawSample) {
        self.count += 1;
        self.busy += sample.busy;
        self.idle += sample.idle;
        self.s_price += sample.s_price;
        self.e_price += sample.e_price;
        self.duration += sample.duration;
        self.volume += sample.volume;
    }

    fn finish(self, timestamp: NaiveDateTime) -> HourlyRecord {
        let n = self.count as f64;
        HourlyRecord {
            timestamp,
            busy: self.busy / n,
            idle: self.idle / n,
            s_price: self.s_price / n,
            e_price: self.e_price / n,
            duration: self.duration,
            volume: self.volume,
        }
    }
}

/// Aggregates one station's samples into per-bucket records.
///
/// Output is sorted by bucket start and holds exactly one record per bucket
/// that received at least one sample. Empty buckets are omitted, so consumers
/// must tolerate gaps in the series.
///
/// # Arguments
///
/// * `samples` - Readings from a single station, in a consistent time base
/// * `bucket` - Bucket width
pub fn aggregate(samples: &[RawSample], bucket: Bucket) -> Vec<HourlyRecord> {
    let mut buckets: BTreeMap<NaiveDateTime, Accumulator> = BTreeMap::new();
    for sample in samples {
        buckets
            .entry(bucket.truncate(sample.timestamp))
            .or_default()
            .add(sample);
    }

    let records: Vec<HourlyRecord> = buckets
        .into_iter()
        .map(|(timestamp, acc)| acc.finish(timestamp))
        .collect();
    debug!(
        n_samples = samples.len(),
        n_buckets = records.len(),
        ?bucket,
        "aggregated station samples"
    );
    records
}
