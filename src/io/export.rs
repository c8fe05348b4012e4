//! CSV export for training tables and daily forecasts.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::forecast::DailyForecast;
use crate::features::FeatureTable;
use crate::model::TARGET_COLUMN;

/// Column header for daily forecast export.
const FORECAST_HEADER: &str = "hour,day_of_week,is_weekend,s_price,e_price,predicted_kwh";

/// Exports a feature table and its targets to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_training_csv(table: &FeatureTable, targets: &[f64], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_training_csv(table, targets, io::BufWriter::new(file))
}

/// Writes a feature table followed by a `volume` target column.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
///
/// # Panics
///
/// Panics if `targets.len()` differs from the table's row count.
pub fn write_training_csv(
    table: &FeatureTable,
    targets: &[f64],
    writer: impl Write,
) -> io::Result<()> {
    assert_eq!(table.len(), targets.len(), "one target per row");
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(
        table
            .columns()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(TARGET_COLUMN)),
    )?;

    for (row, target) in table.rows().iter().zip(targets) {
        wtr.write_record(
            row.iter()
                .chain(std::iter::once(target))
                .map(|v| format!("{v:.6}")),
        )?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports a daily forecast to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_forecast_csv(forecast: &DailyForecast, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_forecast_csv(forecast, io::BufWriter::new(file))
}

/// Writes one row per hour of a daily forecast.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_forecast_csv(forecast: &DailyForecast, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(FORECAST_HEADER.split(','))?;

    let q = forecast.query();
    for (hour, kwh) in forecast.hourly_kwh().iter().enumerate() {
        wtr.write_record(&[
            hour.to_string(),
            q.day_of_week.to_string(),
            u8::from(q.is_weekend()).to_string(),
            format!("{:.4}", q.s_price),
            format!("{:.4}", q.e_price),
            format!("{kwh:.4}"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::DemandQuery;

    fn forecast() -> DailyForecast {
        DailyForecast {
            query: DemandQuery::new(8, 5, 0.5, 1.0),
            hourly_kwh: (0..24).map(f64::from).collect(),
        }
    }

    #[test]
    fn forecast_header_and_row_count() {
        let mut buf = Vec::new();
        write_forecast_csv(&forecast(), &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], FORECAST_HEADER);
        // 1 header + 24 hourly rows
        assert_eq!(lines.len(), 25);
        assert_eq!(lines[1], "0,5,1,0.5000,1.0000,0.0000");
    }

    #[test]
    fn training_csv_appends_target_column() {
        let mut table = FeatureTable::new(["hour", "s_price"]);
        table.push_row(vec![1.0, 0.5]);
        table.push_row(vec![2.0, 0.6]);
        let mut buf = Vec::new();
        write_training_csv(&table, &[3.0, 4.0], &mut buf).unwrap();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["hour", "s_price", "volume"]);
        let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        let volume: f64 = rows[1][2].parse().unwrap();
        assert_eq!(volume, 4.0);
    }

    #[test]
    fn deterministic_output() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        write_forecast_csv(&forecast(), &mut a).unwrap();
        write_forecast_csv(&forecast(), &mut b).unwrap();
        assert_eq!(a, b);
    }
}
