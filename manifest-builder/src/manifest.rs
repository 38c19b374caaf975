use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::BuildError;

/// Shape of the written manifest. The viewer reads both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `[{"file": ..., "displayName": ...}]`
    Records,
    /// `["a.glb", "b.glb"]`
    Files,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestRecord {
    pub file: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

/// Default label for a model: file stem with underscores as spaces.
pub fn display_name(file: &str) -> String {
    let stem = Path::new(file)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());
    stem.replace('_', " ")
}

pub fn build_manifest(files: &[String], format: OutputFormat) -> serde_json::Value {
    match format {
        OutputFormat::Files => serde_json::json!(files),
        OutputFormat::Records => {
            let records: Vec<ManifestRecord> = files
                .iter()
                .map(|file| ManifestRecord {
                    file: file.clone(),
                    display_name: display_name(file),
                })
                .collect();
            serde_json::json!(records)
        }
    }
}

pub fn write_manifest(path: &Path, manifest: &serde_json::Value) -> Result<(), BuildError> {
    let json = serde_json::to_string_pretty(manifest)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    fs::write(path, json + "\n").map_err(|e| BuildError::io(path, e))
}
