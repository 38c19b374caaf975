use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::assets::snapshot_assets::SnapshotAssets;
use crate::engine::camera::orbit_camera::ViewerCamera;
use crate::engine::core::app_state::{AppState, fail_loading};
use crate::engine::core::config::{BackdropPolicy, ViewerConfig};
use crate::engine::loading::error::ViewerError;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::environment::{EnvironmentMaps, attach_backdrop, prepare_cubemap};

/// Request the backdrop and any prefiltered lighting maps.
/// The manifest is only requested once the backdrop resolves.
pub fn request_backdrop(
    config: Res<ViewerConfig>,
    asset_server: Res<AssetServer>,
    mut assets: ResMut<SnapshotAssets>,
    mut loading_progress: ResMut<LoadingProgress>,
) {
    match &config.backdrop_path {
        Some(path) => {
            info!("Loading backdrop '{}'", path);
            assets.backdrop = Some(asset_server.load(path.clone()));

            if let Some(maps) = &config.environment_maps {
                info!(
                    "Loading environment maps '{}' and '{}'",
                    maps.diffuse, maps.specular
                );
                assets.environment_maps = Some(EnvironmentMaps {
                    diffuse: asset_server.load(maps.diffuse.clone()),
                    specular: asset_server.load(maps.specular.clone()),
                });
            }
        }
        None => {
            info!("Backdrop disabled");
            loading_progress.backdrop_resolved = true;
        }
    }
}

enum LightingStatus {
    Pending,
    Backdrop,
    Prefiltered(EnvironmentMaps),
}

/// Prefiltered maps when both loaded as cubemaps. Any failure falls back to
/// lighting from the backdrop itself.
fn resolve_lighting(
    asset_server: &AssetServer,
    images: &mut Assets<Image>,
    maps: Option<&EnvironmentMaps>,
) -> LightingStatus {
    let Some(maps) = maps else {
        return LightingStatus::Backdrop;
    };

    for handle in [&maps.diffuse, &maps.specular] {
        match asset_server.get_load_state(handle) {
            Some(LoadState::Loaded) => {}
            Some(LoadState::Failed(error)) => {
                warn!("Environment map failed to load: {}; lighting from backdrop", error);
                return LightingStatus::Backdrop;
            }
            _ => return LightingStatus::Pending,
        }
        let Some(image) = images.get_mut(handle) else {
            return LightingStatus::Pending;
        };
        if !prepare_cubemap(image) {
            warn!("Environment map is not a cubemap; lighting from backdrop");
            return LightingStatus::Backdrop;
        }
    }

    LightingStatus::Prefiltered(maps.clone())
}

pub fn check_backdrop_loading(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    asset_server: Res<AssetServer>,
    assets: Res<SnapshotAssets>,
    mut images: ResMut<Assets<Image>>,
    camera: Query<Entity, With<ViewerCamera>>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.backdrop_resolved {
        return;
    }
    let (Some(handle), Some(path)) = (&assets.backdrop, &config.backdrop_path) else {
        return;
    };

    let reason = match asset_server.get_load_state(handle) {
        Some(LoadState::Loaded) => {
            let lighting =
                match resolve_lighting(&asset_server, &mut images, assets.environment_maps.as_ref()) {
                    LightingStatus::Pending => return,
                    LightingStatus::Backdrop => None,
                    LightingStatus::Prefiltered(maps) => Some(maps),
                };
            let Some(image) = images.get_mut(handle) else {
                return;
            };
            if prepare_cubemap(image) {
                if let Ok(camera) = camera.single() {
                    attach_backdrop(&mut commands, camera, handle.clone(), lighting);
                }
                info!("✓ Backdrop applied");
                loading_progress.backdrop_resolved = true;
                return;
            }
            "image is neither a cubemap nor six stacked faces".to_string()
        }
        Some(LoadState::Failed(error)) => error.to_string(),
        _ => return,
    };

    let error = ViewerError::Backdrop {
        path: path.clone(),
        reason,
    };
    match config.backdrop_policy {
        BackdropPolicy::Required => fail_loading(&mut commands, &mut next_state, error),
        BackdropPolicy::Optional => {
            warn!("{}; continuing without skybox or reflections", error);
            loading_progress.backdrop_resolved = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::app_setup::test_app::{headless_app, run_until_failed};
    use crate::engine::loading::error::LoadFailure;
    use crate::rpc::web_rpc::WebRpcInterface;
    use crate::ui::status_label::StatusLabel;
    use constants::ui_text::LOAD_FAILED_TEXT;

    fn missing_backdrop_config(policy: BackdropPolicy) -> ViewerConfig {
        ViewerConfig {
            backdrop_path: Some("missing/backdrop_cubemap.ktx2".into()),
            backdrop_policy: policy,
            ..default()
        }
    }

    #[test]
    fn required_backdrop_failure_stops_before_the_manifest() {
        let mut app = headless_app(missing_backdrop_config(BackdropPolicy::Required), &[]);
        run_until_failed(&mut app);

        let world = app.world();
        let Some(LoadFailure(error)) = world.get_resource::<LoadFailure>() else {
            panic!("expected a recorded failure");
        };
        assert_eq!(error.kind(), "backdrop");
        assert_eq!(world.resource::<StatusLabel>().text(), LOAD_FAILED_TEXT);

        let progress = world.resource::<LoadingProgress>();
        assert!(!progress.backdrop_resolved);
        assert!(!progress.manifest_requested);
        assert!(world.resource::<SnapshotAssets>().manifest.is_none());

        let notifications = world.resource::<WebRpcInterface>().pending_notifications();
        assert_eq!(notifications[0].params["kind"], "backdrop");
    }

    #[test]
    fn optional_backdrop_failure_still_requests_the_manifest() {
        let mut config = missing_backdrop_config(BackdropPolicy::Optional);
        config.manifest_source = crate::engine::core::config::ManifestSource::Fetch {
            path: "missing/models.json".into(),
        };
        let mut app = headless_app(config, &[]);
        run_until_failed(&mut app);

        let world = app.world();
        let progress = world.resource::<LoadingProgress>();
        assert!(progress.backdrop_resolved);
        assert!(progress.manifest_requested);

        // The run ends on the manifest, not on the backdrop.
        let Some(LoadFailure(error)) = world.get_resource::<LoadFailure>() else {
            panic!("expected a recorded failure");
        };
        assert_eq!(error.kind(), "manifest_fetch");
    }
}
