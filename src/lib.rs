//! EV charging demand forecasting and infrastructure planning.
//!
//! Raw 5-minute station telemetry is aggregated to hourly records, turned
//! into calendar and price features, and fed to a tree-ensemble regressor.
//! Predictions drive a three-step planning workflow whose output is
//! rendered as a plain-text report.

pub mod config;
pub mod error;
pub mod features;
pub mod forecast;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod planning;
pub mod reporting;
