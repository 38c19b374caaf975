use bevy::asset::AssetLoadError;
use bevy::asset::io::AssetReaderError;
use bevy::prelude::*;
use constants::ui_text::LOAD_FAILED_TEXT;

/// Every way startup can fail. Each variant is terminal once it reaches
/// [`LoadFailure`]; the reason is for logs and the host, never for the label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewerError {
    #[error("could not fetch manifest '{path}': {reason}")]
    ManifestFetch { path: String, reason: String },
    #[error("manifest '{path}' is malformed: {reason}")]
    ManifestInvalid { path: String, reason: String },
    #[error("snapshot {index} ('{file}') failed to load: {reason}")]
    SnapshotLoad {
        index: usize,
        file: String,
        reason: String,
    },
    #[error("snapshot {index} ('{file}') contains no scene")]
    SnapshotWithoutScene { index: usize, file: String },
    #[error("backdrop '{path}' failed to load: {reason}")]
    Backdrop { path: String, reason: String },
}

impl ViewerError {
    /// Classify a failed manifest load: transport problems versus bad content.
    pub fn from_manifest_load(path: &str, error: &AssetLoadError) -> Self {
        match error {
            AssetLoadError::AssetReaderError(AssetReaderError::NotFound(_))
            | AssetLoadError::AssetReaderError(AssetReaderError::HttpError(_))
            | AssetLoadError::AssetReaderError(AssetReaderError::Io(_)) => Self::ManifestFetch {
                path: path.to_string(),
                reason: error.to_string(),
            },
            _ => Self::ManifestInvalid {
                path: path.to_string(),
                reason: error.to_string(),
            },
        }
    }

    /// Fixed text for the status label.
    pub fn user_message(&self) -> &'static str {
        LOAD_FAILED_TEXT
    }

    /// Short machine-readable category for host notifications.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ManifestFetch { .. } => "manifest_fetch",
            Self::ManifestInvalid { .. } => "manifest_invalid",
            Self::SnapshotLoad { .. } => "snapshot_load",
            Self::SnapshotWithoutScene { .. } => "snapshot_without_scene",
            Self::Backdrop { .. } => "backdrop",
        }
    }
}

/// Present once startup has failed. Inserted right before entering `AppState::Failed`.
#[derive(Resource, Debug, Clone)]
pub struct LoadFailure(pub ViewerError);

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn reader_errors_are_fetch_failures() {
        let error = AssetLoadError::AssetReaderError(AssetReaderError::NotFound(PathBuf::from(
            "models.json",
        )));
        let viewer_error = ViewerError::from_manifest_load("models.json", &error);
        assert_eq!(viewer_error.kind(), "manifest_fetch");

        let error = AssetLoadError::AssetReaderError(AssetReaderError::HttpError(404));
        assert!(matches!(
            ViewerError::from_manifest_load("models.json", &error),
            ViewerError::ManifestFetch { .. }
        ));
    }

    #[test]
    fn every_failure_shows_the_same_label() {
        let errors = [
            ViewerError::ManifestFetch {
                path: "m".into(),
                reason: "404".into(),
            },
            ViewerError::SnapshotLoad {
                index: 1,
                file: "b.glb".into(),
                reason: "truncated".into(),
            },
            ViewerError::Backdrop {
                path: "sky.ktx2".into(),
                reason: "missing".into(),
            },
        ];
        for error in errors {
            assert_eq!(error.user_message(), LOAD_FAILED_TEXT);
        }
    }
}
