//! File-level collaborators: telemetry ingestion, model artifacts, CSV export.

pub mod artifact;
pub mod export;
pub mod samples;
