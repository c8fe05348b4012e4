use std::f64::consts::PI;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::sample::HourlyRecord;

/// Calendar features of one time bucket.
///
/// The cyclical hour encoding is computed on demand from `hour`, so the
/// sine/cosine pair always lies on the unit circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Hour of day, 0–23.
    pub hour: u32,
    /// Day of week, 0–6 with Monday = 0.
    pub day_of_week: u32,
    /// `true` iff `day_of_week` is Saturday (5) or Sunday (6).
    pub is_weekend: bool,
    /// Calendar month, 1–12.
    pub month: u32,
}

impl FeatureVector {
    pub fn from_timestamp(timestamp: NaiveDateTime) -> Self {
        let day_of_week = timestamp.weekday().num_days_from_monday();
        Self {
            hour: timestamp.hour(),
            day_of_week,
            is_weekend: is_weekend(day_of_week),
            month: timestamp.month(),
        }
    }

    /// `sin(2π·hour/24)`.
    pub fn hour_sin(&self) -> f64 {
        (2.0 * PI * f64::from(self.hour) / 24.0).sin()
    }

    /// `cos(2π·hour/24)`.
    pub fn hour_cos(&self) -> f64 {
        (2.0 * PI * f64::from(self.hour) / 24.0).cos()
    }
}

/// Weekend flag for a Monday-based day index.
pub fn is_weekend(day_of_week: u32) -> bool {
    matches!(day_of_week, 5 | 6)
}

/// Derives one [`FeatureVector`] per record, in input order.
pub fn derive_features(records: &[HourlyRecord]) -> Vec<FeatureVector> {
    records
        .iter()
        .map(|record| FeatureVector::from_timestamp(record.timestamp))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    #[test]
    fn cyclical_encoding_on_unit_circle_for_every_hour() {
        for hour in 0..24 {
            let fv = FeatureVector {
                hour,
                day_of_week: 0,
                is_weekend: false,
                month: 1,
            };
            let norm = fv.hour_sin().powi(2) + fv.hour_cos().powi(2);
            assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn weekend_flag_only_for_saturday_and_sunday() {
        for day in 0..7 {
            assert_eq!(is_weekend(day), day >= 5, "day {day}");
        }
    }

    #[test]
    fn from_timestamp_uses_monday_zero() {
        // 2022-09-05 was a Monday, 2022-09-11 a Sunday.
        let monday = NaiveDate::from_ymd_opt(2022, 9, 5)
            .and_then(|d| d.and_hms_opt(13, 0, 0))
            .unwrap();
        let sunday = NaiveDate::from_ymd_opt(2022, 9, 11)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();

        let fv = FeatureVector::from_timestamp(monday);
        assert_eq!((fv.hour, fv.day_of_week, fv.month), (13, 0, 9));
        assert!(!fv.is_weekend);

        let fv = FeatureVector::from_timestamp(sunday);
        assert_eq!(fv.day_of_week, 6);
        assert!(fv.is_weekend);
    }

    #[test]
    fn derive_preserves_order_and_input() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let records: Vec<HourlyRecord> = (0..5)
            .map(|h| HourlyRecord {
                timestamp: start + chrono::TimeDelta::hours(h),
                busy: 0.0,
                idle: 1.0,
                s_price: 0.5,
                e_price: 1.0,
                duration: 0.0,
                volume: 0.0,
            })
            .collect();
        let before = records.clone();
        let features = derive_features(&records);
        assert_eq!(records, before);
        let hours: Vec<u32> = features.iter().map(|f| f.hour).collect();
        assert_eq!(hours, vec![0, 1, 2, 3, 4]);
    }
}
