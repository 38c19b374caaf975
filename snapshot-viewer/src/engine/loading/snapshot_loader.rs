use bevy::asset::{LoadState, RecursiveDependencyLoadState};
use bevy::gltf::Gltf;
use bevy::prelude::*;

use crate::engine::assets::manifest::SnapshotManifest;
use crate::engine::assets::snapshot_assets::SnapshotAssets;
use crate::engine::core::app_state::{AppState, fail_loading};
use crate::engine::core::config::ViewerConfig;
use crate::engine::loading::batch_join::{BatchStatus, SlotLoadState, join_batch};
use crate::engine::loading::error::ViewerError;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::spawner::spawn_snapshots;


/// A snapshot is ready only when the glTF and every mesh, material and
/// texture it references have loaded.
pub fn slot_load_state(asset_server: &AssetServer, handle: &Handle<Gltf>) -> SlotLoadState {
    match asset_server.get_load_states(handle) {
        Some((LoadState::Failed(error), _, _))
        | Some((_, _, RecursiveDependencyLoadState::Failed(error))) => {
            SlotLoadState::Failed(error.to_string())
        }
        Some((_, _, RecursiveDependencyLoadState::Loaded)) => SlotLoadState::Ready,
        _ => SlotLoadState::Pending,
    }
}

/// Scene to instance for a snapshot: the default scene, else the first one.
pub fn snapshot_scene(gltf: &Gltf) -> Option<Handle<Scene>> {
    gltf.default_scene
        .clone()
        .or_else(|| gltf.scenes.first().cloned())
}

/// Join the whole batch; on success spawn every snapshot and build the registry.
pub fn check_snapshot_loading(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    manifest: Option<Res<SnapshotManifest>>,
    assets: Res<SnapshotAssets>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if !loading_progress.manifest_loaded || loading_progress.registry_populated {
        return;
    }
    let Some(manifest) = manifest else {
        return;
    };

    let status = join_batch(
        assets
            .snapshots
            .iter()
            .map(|handle| slot_load_state(&asset_server, handle)),
    );

    match status {
        BatchStatus::Pending { ready, total } => {
            if ready != loading_progress.snapshots_loaded {
                loading_progress.snapshots_loaded = ready;
                info!("Loaded {}/{} snapshots", ready, total);
            }
        }
        BatchStatus::Failed { index, reason } => fail_loading(
            &mut commands,
            &mut next_state,
            ViewerError::SnapshotLoad {
                index,
                file: assets.snapshot_path(index).to_string(),
                reason,
            },
        ),
        BatchStatus::Ready { total } => {
            let mut scenes = Vec::with_capacity(total);
            for (index, handle) in assets.snapshots.iter().enumerate() {
                match gltfs.get(handle).and_then(snapshot_scene) {
                    Some(scene) => scenes.push(scene),
                    None => {
                        fail_loading(
                            &mut commands,
                            &mut next_state,
                            ViewerError::SnapshotWithoutScene {
                                index,
                                file: assets.snapshot_path(index).to_string(),
                            },
                        );
                        return;
                    }
                }
            }

            let labels: Vec<String> = manifest.entries().iter().map(|entry| entry.label()).collect();
            let registry =
                spawn_snapshots(&mut commands, scenes, &labels, config.warm_up_frames > 0);

            info!("✓ All {} snapshots loaded, instancing scenes", total);
            commands.insert_resource(registry);
            loading_progress.snapshots_loaded = total;
            loading_progress.registry_populated = true;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::app_setup::test_app::{headless_app, run_until_failed};
    use crate::engine::loading::error::LoadFailure;
    use crate::engine::scene::registry::SnapshotRegistry;
    use crate::ui::slider::SnapshotSlider;
    use crate::ui::status_label::StatusLabel;
    use constants::ui_text::LOAD_FAILED_TEXT;

    const SINGLE_NODE_SCENE: &str = r#"{
        "asset": { "version": "2.0" },
        "nodes": [{ "name": "Ground" }],
        "scene": 0,
        "scenes": [{ "nodes": [0] }]
    }"#;

    const SCENELESS: &str = r#"{ "asset": { "version": "2.0" } }"#;

    fn run_with(files: &[(&str, &[u8])]) -> App {
        let mut app = headless_app(
            ViewerConfig {
                backdrop_path: None,
                ..default()
            },
            files,
        );
        run_until_failed(&mut app);
        app
    }

    fn failure(app: &App) -> ViewerError {
        let Some(LoadFailure(error)) = app.world().get_resource::<LoadFailure>() else {
            panic!("expected a recorded failure");
        };
        error.clone()
    }

    #[test]
    fn missing_snapshot_fails_the_whole_batch() {
        let app = run_with(&[("models.json", br#"["day_1.glb"]"#)]);

        assert!(matches!(
            failure(&app),
            ViewerError::SnapshotLoad { index: 0, ref file, .. } if file == "models/day_1.glb"
        ));
        let world = app.world();
        assert_eq!(world.resource::<StatusLabel>().text(), LOAD_FAILED_TEXT);
        assert!(!world.resource::<SnapshotSlider>().configured);
        assert!(world.get_resource::<SnapshotRegistry>().is_none());
    }

    #[test]
    fn corrupt_snapshot_is_reported_by_index() {
        let app = run_with(&[
            ("models.json", br#"["a.gltf", "b.glb"]"#),
            ("models/a.gltf", SINGLE_NODE_SCENE.as_bytes()),
            ("models/b.glb", b"not a model"),
        ]);

        assert!(matches!(
            failure(&app),
            ViewerError::SnapshotLoad { index: 1, ref file, .. } if file == "models/b.glb"
        ));
        assert!(app.world().get_resource::<SnapshotRegistry>().is_none());
    }

    #[test]
    fn gltf_without_a_scene_is_a_failed_snapshot() {
        let app = run_with(&[
            ("models.json", br#"["empty.gltf"]"#),
            ("models/empty.gltf", SCENELESS.as_bytes()),
        ]);

        assert_eq!(
            failure(&app),
            ViewerError::SnapshotWithoutScene {
                index: 0,
                file: "models/empty.gltf".into(),
            }
        );
        assert!(app.world().get_resource::<SnapshotRegistry>().is_none());
    }
}
