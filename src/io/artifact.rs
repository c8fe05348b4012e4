//! Model artifact files.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::ModelError;
use crate::model::{TrainedModel, persist, restore};

/// Writes the model blob to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ModelError::Write`] on filesystem failure or
/// [`ModelError::Encode`] if the model cannot be encoded.
pub fn save(path: &Path, model: &TrainedModel) -> Result<(), ModelError> {
    let write_err = |source: std::io::Error| ModelError::Write {
        path: path.display().to_string(),
        source,
    };
    let blob = persist(model)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, blob).map_err(write_err)?;
    info!(path = %path.display(), kind = model.kind(), "saved model artifact");
    Ok(())
}

/// Reads and restores the model blob at `path`.
///
/// # Errors
///
/// Returns [`ModelError::MissingArtifact`] if the file is absent, unreadable,
/// or does not hold a compatible model.
pub fn load(path: &Path) -> Result<TrainedModel, ModelError> {
    let blob = fs::read(path).map_err(|e| ModelError::MissingArtifact {
        reason: format!("cannot read \"{}\": {e}", path.display()),
    })?;
    restore(&blob)
}

/// Like [`load`], but treats an unavailable model as "no model" and logs why.
pub fn load_optional(path: &Path) -> Option<TrainedModel> {
    match load(path) {
        Ok(model) => Some(model),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "no model available");
            None
        }
    }
}
