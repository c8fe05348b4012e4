use crate::error::ModelError;

use super::derive::FeatureVector;
use super::sample::HourlyRecord;

/// Columns produced by [`FeatureTable::from_hourly`].
pub const HOURLY_COLUMNS: &[&str] = &[
    "hour",
    "day_of_week",
    "is_weekend",
    "month",
    "hour_sin",
    "hour_cos",
    "s_price",
    "e_price",
    "busy",
    "idle",
];

/// Row-major table of named numeric columns.
///
/// Column names are looked up at prediction time, so a table may carry more
/// columns than a model needs and in any order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureTable {
    /// Creates an empty table with the given column names.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds the training/prediction table for a run of hourly records.
    ///
    /// Calendar features are derived from each record's timestamp; prices and
    /// occupancy come from the record itself.
    pub fn from_hourly(records: &[HourlyRecord]) -> Self {
        let mut table = Self::new(HOURLY_COLUMNS.iter().copied());
        table.rows.reserve(records.len());
        for record in records {
            let fv = FeatureVector::from_timestamp(record.timestamp);
            table.rows.push(vec![
                f64::from(fv.hour),
                f64::from(fv.day_of_week),
                f64::from(u8::from(fv.is_weekend)),
                f64::from(fv.month),
                fv.hour_sin(),
                fv.hour_cos(),
                record.s_price,
                record.e_price,
                record.busy,
                record.idle,
            ]);
        }
        table
    }

    /// Appends one row.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` differs from the number of columns.
    pub fn push_row(&mut self, values: Vec<f64>) {
        assert_eq!(
            values.len(),
            self.columns.len(),
            "row width must match column count"
        );
        self.rows.push(values);
    }

    /// Appends all rows of `other`, matching columns by name.
    ///
    /// An empty column-less table adopts the schema of `other`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Schema`] if `other` lacks one of this table's columns.
    pub fn append(&mut self, other: &Self) -> Result<(), ModelError> {
        if self.columns.is_empty() && self.rows.is_empty() {
            self.columns.clone_from(&other.columns);
        }
        let names: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        let indices = resolve_columns(&other.columns, &names)?;
        self.rows.extend(
            other
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i]).collect::<Vec<f64>>()),
        );
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns row `index` as a standalone [`FeatureRow`].
    pub fn row(&self, index: usize) -> Option<FeatureRow> {
        self.rows.get(index).map(|values| FeatureRow {
            columns: self.columns.clone(),
            values: values.clone(),
        })
    }

    /// Projects every row onto `names`, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Schema`] naming the first absent column.
    pub fn select(&self, names: &[&str]) -> Result<Vec<Vec<f64>>, ModelError> {
        let indices = resolve_columns(&self.columns, names)?;
        Ok(self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i]).collect())
            .collect())
    }
}

/// A single named feature row, the scalar counterpart of [`FeatureTable`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureRow {
    /// Builds a row from `(column, value)` pairs.
    pub fn new<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        let (columns, values) = pairs
            .into_iter()
            .map(|(name, value)| (Into::<String>::into(name), value))
            .unzip();
        Self { columns, values }
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    /// Projects the row onto `names`, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Schema`] naming the first absent column.
    pub fn select(&self, names: &[&str]) -> Result<Vec<f64>, ModelError> {
        let indices = resolve_columns(&self.columns, names)?;
        Ok(indices.iter().map(|&i| self.values[i]).collect())
    }
}

fn resolve_columns(columns: &[String], names: &[&str]) -> Result<Vec<usize>, ModelError> {
    names
        .iter()
        .map(|name| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| ModelError::Schema {
                    column: (*name).to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(hour: u32, s_price: f64) -> HourlyRecord {
        HourlyRecord {
            timestamp: NaiveDate::from_ymd_opt(2022, 9, 10)
                .and_then(|d| d.and_hms_opt(hour, 0, 0))
                .unwrap(),
            busy: 0.25,
            idle: 0.75,
            s_price,
            e_price: 1.1,
            duration: 30.0,
            volume: 12.0,
        }
    }

    #[test]
    fn from_hourly_fills_every_column() {
        let table = FeatureTable::from_hourly(&[record(8, 0.4), record(9, 0.6)]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns().len(), HOURLY_COLUMNS.len());
        let selected = table
            .select(&["s_price", "is_weekend", "hour"])
            .unwrap();
        // 2022-09-10 was a Saturday.
        assert_eq!(selected[0], vec![0.4, 1.0, 8.0]);
        assert_eq!(selected[1], vec![0.6, 1.0, 9.0]);
    }

    #[test]
    fn select_reports_missing_column() {
        let table = FeatureTable::new(["hour", "day_of_week"]);
        let err = table.select(&["hour", "e_price"]).unwrap_err();
        assert!(matches!(err, ModelError::Schema { column } if column == "e_price"));
    }

    #[test]
    fn append_matches_columns_by_name() {
        let mut left = FeatureTable::new(["a", "b"]);
        left.push_row(vec![1.0, 2.0]);
        let mut right = FeatureTable::new(["b", "a", "c"]);
        right.push_row(vec![20.0, 10.0, 99.0]);

        left.append(&right).unwrap();
        assert_eq!(left.rows(), &[vec![1.0, 2.0], vec![10.0, 20.0]]);
    }

    #[test]
    fn append_to_default_adopts_schema() {
        let mut all = FeatureTable::default();
        all.append(&FeatureTable::from_hourly(&[record(1, 0.5)])).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all.columns().len(), HOURLY_COLUMNS.len());
    }

    #[test]
    fn row_lookup_by_name() {
        let row = FeatureRow::new([("hour", 7.0), ("e_price", 0.9)]);
        assert_eq!(row.get("e_price"), Some(0.9));
        assert_eq!(row.get("month"), None);
        assert_eq!(row.select(&["e_price", "hour"]).unwrap(), vec![0.9, 7.0]);
    }
}
