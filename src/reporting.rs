//! Plain-text planning report.

use chrono::NaiveDateTime;

use crate::model::Metrics;

/// Report title line.
pub const REPORT_TITLE: &str = "EV Charging Infrastructure Planning Report";

/// Renders the planning document handed to the report sink.
///
/// # Arguments
///
/// * `demand_summary` - Interpreted demand text
/// * `recommendations` - Generated recommendation sections
/// * `metrics` - Validation metrics of the model behind the summary, if any
/// * `generated_at` - Timestamp printed in the header
pub fn render_report(
    demand_summary: &str,
    recommendations: &str,
    metrics: Option<&Metrics>,
    generated_at: NaiveDateTime,
) -> String {
    let mut out = String::new();
    out.push_str(REPORT_TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(REPORT_TITLE.len()));
    out.push_str("\n\n");
    out.push_str(&format!(
        "Generated on: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    out.push_str("1. Charging Demand Summary\n\n");
    out.push_str(demand_summary.trim());
    out.push('\n');
    if let Some(m) = metrics {
        out.push_str(&format!("Model validation: {m}\n"));
    }
    out.push('\n');

    out.push_str("2. Infrastructure & Scheduling Recommendations\n\n");
    out.push_str(recommendations.trim());
    out.push_str("\n\n");

    out.push_str(
        "Supporting references: UrbanEV Dataset & Shenzhen EV Planning Guidelines.\n",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap()
    }

    #[test]
    fn sections_appear_in_order() {
        let report = render_report("High demand at peak", "Add 5 chargers", None, at());
        let summary = report.find("1. Charging Demand Summary").unwrap();
        let recs = report.find("2. Infrastructure & Scheduling Recommendations").unwrap();
        assert!(report.starts_with(REPORT_TITLE));
        assert!(summary < recs);
        assert!(report.contains("Generated on: 2024-03-01 09:30:00"));
        assert!(report.contains("Add 5 chargers"));
        assert!(!report.contains("Model validation"));
    }

    #[test]
    fn metrics_line_when_available() {
        let m = Metrics {
            mae: 1.0,
            rmse: 2.0,
        };
        let report = render_report("s", "r", Some(&m), at());
        assert!(report.contains("Model validation: MAE: 1.0000, RMSE: 2.0000"));
    }
}
