use std::path::PathBuf;

/// Errors that can occur while building a manifest.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    /// The directory has no `.glb` or `.gltf` files.
    #[error("no models found in {0}")]
    NoModels(PathBuf),

    #[error("invalid model {path}: {reason}")]
    InvalidModel { path: PathBuf, reason: String },

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
