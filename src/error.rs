//! Error types shared by the ingestion, model, and planning layers.

use thiserror::Error;

/// Failures raised by training, prediction, and artifact handling.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Not enough rows to carve out both a train and a test partition.
    #[error("insufficient data: {rows} row(s) available, at least 2 required")]
    InsufficientData { rows: usize },

    /// Feature table and target vector disagree on row count.
    #[error("shape mismatch: {features} feature row(s) vs {targets} target(s)")]
    ShapeMismatch { features: usize, targets: usize },

    /// A column required by the model is absent from the prediction input.
    #[error("schema error: missing required column `{column}`")]
    Schema { column: String },

    /// A training option is outside its valid range.
    #[error("invalid training option `{field}`: {message}")]
    InvalidParams { field: String, message: String },

    /// The model holds values that cannot be written to a blob.
    #[error("model cannot be persisted: {reason}")]
    InvalidModel { reason: String },

    /// The persisted model blob is absent, unreadable, or incompatible.
    #[error("model artifact unavailable: {reason}")]
    MissingArtifact { reason: String },

    #[error("failed to encode model artifact: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("cannot write model artifact \"{path}\": {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures raised by the planning workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanningError {
    /// The recommendation template needs at least one hot zone.
    #[error("no hot zone available for recommendation generation")]
    MissingZone,
}

/// Failures while reading raw station telemetry.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("cannot read \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unrecognized timestamp \"{value}\"")]
    Timestamp { value: String },
}

/// Failures of the end-to-end training pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
