//! Point and 24-hour demand forecasts built on a trained model.

use crate::error::ModelError;
use crate::features::derive::is_weekend;
use crate::features::{FeatureRow, FeatureTable};
use crate::model::{FEATURE_COLUMNS, PredictionInput, TrainedModel};

/// Day names indexed Monday = 0.
pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Parses a day given as a name (case-insensitive, three-letter prefix
/// accepted) or a Monday-based index `0..=6`.
pub fn parse_day(s: &str) -> Option<u32> {
    if let Ok(index) = s.parse::<u32>() {
        return (index < 7).then_some(index);
    }
    let lower = s.to_ascii_lowercase();
    if lower.len() < 3 {
        return None;
    }
    DAY_NAMES
        .iter()
        .position(|name| name.to_ascii_lowercase().starts_with(&lower))
        .and_then(|i| u32::try_from(i).ok())
}

/// Conditions of a single demand prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandQuery {
    /// Hour of day, 0–23.
    pub hour: u32,
    /// Day of week, Monday = 0.
    pub day_of_week: u32,
    /// Service fee (CNY/kWh).
    pub s_price: f64,
    /// Electricity price (CNY/kWh).
    pub e_price: f64,
}

impl DemandQuery {
    /// # Panics
    ///
    /// Panics if `hour >= 24` or `day_of_week >= 7`.
    pub fn new(hour: u32, day_of_week: u32, s_price: f64, e_price: f64) -> Self {
        assert!(hour < 24, "hour must be in 0..24");
        assert!(day_of_week < 7, "day_of_week must be in 0..7");
        Self {
            hour,
            day_of_week,
            s_price,
            e_price,
        }
    }

    pub fn is_weekend(&self) -> bool {
        is_weekend(self.day_of_week)
    }

    pub fn day_name(&self) -> &'static str {
        DAY_NAMES[self.day_of_week as usize]
    }

    /// Single model row for this query.
    pub fn row(&self) -> FeatureRow {
        FeatureRow::new(FEATURE_COLUMNS.into_iter().zip(self.values_at(self.hour)))
    }

    /// Table with one row per hour `0..24`, other inputs held fixed.
    pub fn daily_sweep(&self) -> FeatureTable {
        let mut table = FeatureTable::new(FEATURE_COLUMNS);
        for hour in 0..24 {
            table.push_row(self.values_at(hour).to_vec());
        }
        table
    }

    fn values_at(&self, hour: u32) -> [f64; 5] {
        [
            f64::from(hour),
            f64::from(self.day_of_week),
            f64::from(u8::from(self.is_weekend())),
            self.s_price,
            self.e_price,
        ]
    }
}

impl PredictionInput for DemandQuery {
    type Output = f64;

    fn predict_with(&self, model: &TrainedModel) -> Result<f64, ModelError> {
        self.row().predict_with(model)
    }
}

/// Prediction for one query plus the full 24-hour curve around it.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub(crate) query: DemandQuery,
    pub(crate) hourly_kwh: Vec<f64>,
}

impl DailyForecast {
    /// Runs the model over the daily sweep of `query`.
    ///
    /// # Errors
    ///
    /// Propagates [`ModelError::Schema`] from prediction.
    pub fn predict(model: &TrainedModel, query: DemandQuery) -> Result<Self, ModelError> {
        let hourly_kwh = model.predict(&query.daily_sweep())?;
        Ok(Self { query, hourly_kwh })
    }

    pub fn query(&self) -> &DemandQuery {
        &self.query
    }

    /// Predicted volume per hour `0..24` (kWh).
    pub fn hourly_kwh(&self) -> &[f64] {
        &self.hourly_kwh
    }

    /// Predicted volume at the query hour, `NaN` if the curve lacks that hour.
    pub fn point_kwh(&self) -> f64 {
        self.hourly_kwh
            .get(self.query.hour as usize)
            .copied()
            .unwrap_or(f64::NAN)
    }

    /// Hour with the highest predicted volume; the earliest wins ties.
    pub fn peak_hour(&self) -> usize {
        self.hourly_kwh
            .iter()
            .enumerate()
            .fold(0, |best, (h, v)| if *v > self.hourly_kwh[best] { h } else { best })
    }

    pub fn peak_kwh(&self) -> f64 {
        self.hourly_kwh
            .get(self.peak_hour())
            .copied()
            .unwrap_or(f64::NAN)
    }

    pub fn total_kwh(&self) -> f64 {
        self.hourly_kwh.iter().sum()
    }

    /// One-sentence demand summary, suitable as planning workflow input.
    pub fn summary(&self) -> String {
        let q = &self.query;
        format!(
            "Predicted charging volume of {:.2} kWh at {:02}:00 on {} \
             (service fee {:.2} CNY/kWh, electricity {:.2} CNY/kWh); \
             daily peak {:.2} kWh at {:02}:00, daily total {:.2} kWh",
            self.point_kwh(),
            q.hour,
            q.day_name(),
            q.s_price,
            q.e_price,
            self.peak_kwh(),
            self.peak_hour(),
            self.total_kwh(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_accepts_names_and_indices() {
        assert_eq!(parse_day("Monday"), Some(0));
        assert_eq!(parse_day("sat"), Some(5));
        assert_eq!(parse_day("SUNDAY"), Some(6));
        assert_eq!(parse_day("3"), Some(3));
        assert_eq!(parse_day("7"), None);
        assert_eq!(parse_day("mo"), None);
        assert_eq!(parse_day("funday"), None);
    }

    #[test]
    fn row_carries_weekend_flag() {
        let row = DemandQuery::new(12, 6, 0.5, 1.0).row();
        assert_eq!(row.get("is_weekend"), Some(1.0));
        assert_eq!(row.get("hour"), Some(12.0));
        let row = DemandQuery::new(12, 4, 0.5, 1.0).row();
        assert_eq!(row.get("is_weekend"), Some(0.0));
    }

    #[test]
    fn sweep_covers_hours_in_order() {
        let sweep = DemandQuery::new(9, 2, 0.5, 1.0).daily_sweep();
        assert_eq!(sweep.len(), 24);
        let hours: Vec<f64> = sweep.select(&["hour"]).unwrap().into_iter().map(|r| r[0]).collect();
        assert_eq!(hours, (0..24).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn peak_and_total() {
        let mut hourly_kwh = vec![1.0; 24];
        hourly_kwh[18] = 9.0;
        hourly_kwh[19] = 9.0;
        let forecast = DailyForecast {
            query: DemandQuery::new(18, 0, 0.5, 1.0),
            hourly_kwh,
        };
        assert_eq!(forecast.peak_hour(), 18);
        assert_eq!(forecast.peak_kwh(), 9.0);
        assert_eq!(forecast.total_kwh(), 22.0 + 18.0);
        assert_eq!(forecast.point_kwh(), 9.0);
        let summary = forecast.summary();
        assert!(summary.contains("at 18:00 on Monday"));
        assert!(summary.contains("daily total 40.00 kWh"));
    }

    #[test]
    fn short_curve_does_not_panic() {
        let forecast = DailyForecast {
            query: DemandQuery::new(18, 0, 0.5, 1.0),
            hourly_kwh: vec![2.0, 5.0],
        };
        assert_eq!(forecast.hourly_kwh(), &[2.0, 5.0]);
        assert!(forecast.point_kwh().is_nan());
        assert_eq!(forecast.peak_kwh(), 5.0);

        let empty = DailyForecast {
            query: DemandQuery::new(0, 0, 0.5, 1.0),
            hourly_kwh: Vec::new(),
        };
        assert!(empty.point_kwh().is_nan());
        assert!(empty.peak_kwh().is_nan());
    }

    #[test]
    #[should_panic]
    fn hour_out_of_range_panics() {
        DemandQuery::new(24, 0, 0.5, 1.0);
    }
}
