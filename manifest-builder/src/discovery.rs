use constants::path::MODEL_EXTENSIONS;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BuildError;

fn is_model_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            MODEL_EXTENSIONS
                .iter()
                .any(|known| extension.eq_ignore_ascii_case(known))
        })
}

/// Model files directly inside `dir`, sorted by file name.
pub fn discover_models(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    if !dir.is_dir() {
        return Err(BuildError::NotADirectory(dir.to_path_buf()));
    }

    let mut models = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| BuildError::io(dir, e))? {
        let path = entry.map_err(|e| BuildError::io(dir, e))?.path();
        if path.is_file() && is_model_file(&path) {
            models.push(path);
        }
    }

    if models.is_empty() {
        return Err(BuildError::NoModels(dir.to_path_buf()));
    }

    models.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(models)
}
