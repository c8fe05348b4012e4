use tracing::debug;

use crate::error::ModelError;

use super::{FEATURE_COLUMNS, TrainedModel};

/// Encodes a trained model together with its metrics into an opaque blob.
///
/// Floats are written in shortest round-trip form, so a restored model
/// predicts bit-identically.
///
/// # Errors
///
/// Returns [`ModelError::InvalidModel`] if the metrics or any tree hold
/// non-finite values, and [`ModelError::Encode`] if serialization fails.
pub fn persist(model: &TrainedModel) -> Result<Vec<u8>, ModelError> {
    let metrics = model.metrics();
    if !(metrics.mae.is_finite() && metrics.rmse.is_finite()) {
        return Err(ModelError::InvalidModel {
            reason: format!("non-finite metrics ({metrics})"),
        });
    }
    model
        .regressor
        .validate(FEATURE_COLUMNS.len())
        .map_err(|reason| ModelError::InvalidModel { reason })?;

    let blob = serde_json::to_vec(model)?;
    debug!(bytes = blob.len(), kind = model.kind(), "persisted model");
    Ok(blob)
}

/// Decodes a blob produced by [`persist`].
///
/// # Errors
///
/// Returns [`ModelError::MissingArtifact`] if the blob is empty, corrupt,
/// structurally invalid, or was written for a different feature column order.
pub fn restore(blob: &[u8]) -> Result<TrainedModel, ModelError> {
    if blob.is_empty() {
        return Err(ModelError::MissingArtifact {
            reason: "empty blob".to_string(),
        });
    }

    let model: TrainedModel =
        serde_json::from_slice(blob).map_err(|e| ModelError::MissingArtifact {
            reason: format!("corrupt blob: {e}"),
        })?;

    if model.columns() != FEATURE_COLUMNS {
        return Err(ModelError::MissingArtifact {
            reason: format!(
                "feature columns {:?} do not match expected {FEATURE_COLUMNS:?}",
                model.columns()
            ),
        });
    }

    model
        .regressor
        .validate(FEATURE_COLUMNS.len())
        .map_err(|reason| ModelError::MissingArtifact {
            reason: format!("invalid model: {reason}"),
        })?;

    Ok(model)
}
