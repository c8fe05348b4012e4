//! Raw and aggregated station telemetry records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One station-interval reading (typically a 5-minute slot).
///
/// Samples arrive sorted by timestamp within a station. There is no ordering
/// guarantee across stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Naive local timestamp of the interval start.
    pub timestamp: NaiveDateTime,
    /// Fraction of piles busy during the interval.
    pub busy: f64,
    /// Fraction of piles idle during the interval.
    pub idle: f64,
    /// Service fee (CNY/kWh).
    pub s_price: f64,
    /// Electricity price (CNY/kWh).
    pub e_price: f64,
    /// Charging session duration accumulated in the interval.
    pub duration: f64,
    /// Charged energy volume in the interval (kWh).
    pub volume: f64,
}

/// Aggregate of all [`RawSample`]s falling into one time bucket.
///
/// Prices and occupancy are averaged, duration and volume are summed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    /// Bucket start (timestamp truncated to the bucket boundary).
    pub timestamp: NaiveDateTime,
    /// Mean busy fraction.
    pub busy: f64,
    /// Mean idle fraction.
    pub idle: f64,
    /// Mean service fee.
    pub s_price: f64,
    /// Mean electricity price.
    pub e_price: f64,
    /// Summed duration.
    pub duration: f64,
    /// Summed volume (kWh); the demand target.
    pub volume: f64,
}
