use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::assets::manifest::{ManifestOrdering, SnapshotManifest};
use crate::engine::assets::snapshot_assets::SnapshotAssets;
use crate::engine::core::app_state::{AppState, fail_loading};
use crate::engine::core::config::{ManifestSource, ViewerConfig};
use crate::engine::loading::error::ViewerError;
use crate::engine::loading::progress::LoadingProgress;

/// Fetch the manifest, or build it from the configured file pattern.
pub fn request_manifest(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    asset_server: Res<AssetServer>,
    mut manifests: ResMut<Assets<SnapshotManifest>>,
    mut assets: ResMut<SnapshotAssets>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if !loading_progress.backdrop_resolved || loading_progress.manifest_requested {
        return;
    }
    loading_progress.manifest_requested = true;

    match &config.manifest_source {
        ManifestSource::Fetch { path } => {
            info!("Fetching manifest '{}'", path);
            assets.manifest = Some(asset_server.load(path.clone()));
        }
        ManifestSource::Pattern {
            template,
            start,
            count,
        } => match SnapshotManifest::from_pattern(template, *start, *count) {
            Ok(manifest) => {
                info!("Using implicit manifest '{}' × {}", template, count);
                assets.manifest = Some(manifests.add(manifest));
            }
            Err(error) => fail_loading(
                &mut commands,
                &mut next_state,
                ViewerError::ManifestInvalid {
                    path: template.clone(),
                    reason: error.to_string(),
                },
            ),
        },
    }
}

/// Commit to the manifest once it is available and fan out every snapshot load.
pub fn load_manifest_system(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<SnapshotManifest>>,
    mut assets: ResMut<SnapshotAssets>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if !loading_progress.manifest_requested || loading_progress.manifest_loaded {
        return;
    }
    let Some(handle) = assets.manifest.clone() else {
        return;
    };

    if let Some(manifest) = manifests.get(&handle) {
        // Generated file names already carry their order.
        let ordering = match config.manifest_source {
            ManifestSource::Pattern { .. } => ManifestOrdering::Listed,
            ManifestSource::Fetch { .. } => config.ordering,
        };
        let manifest = manifest.clone().ordered(ordering);
        let asset_paths = manifest.asset_paths(&config.model_directory);

        info!("✓ Manifest loaded: {} snapshots", manifest.len());
        assets.request_snapshots(&asset_server, asset_paths);
        loading_progress.snapshots_total = manifest.len();
        loading_progress.manifest_loaded = true;
        commands.insert_resource(manifest);
    } else if let Some(LoadState::Failed(error)) = asset_server.get_load_state(&handle) {
        fail_loading(
            &mut commands,
            &mut next_state,
            ViewerError::from_manifest_load(config.manifest_source.location(), &error),
        );
    }
}
