use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use bevy::scene::SceneInstance;

use crate::engine::assets::manifest::SnapshotManifest;
use crate::engine::camera::auto_frame::frame_snapshots;
use crate::engine::camera::orbit_camera::{OrbitCamera, ViewerCamera};
use crate::engine::core::config::ViewerConfig;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::registry::{SnapshotRegistry, SnapshotRoot, apply_registry_visibility};
use crate::rpc::web_rpc::WebRpcInterface;
use crate::ui::slider::SnapshotSlider;
use crate::ui::status_label::StatusLabel;

/// Count snapshot roots whose scene has been fully spawned.
pub fn check_instances_ready(
    scene_spawner: Res<SceneSpawner>,
    roots: Query<(&SnapshotRoot, &SceneInstance)>,
    mut loading_progress: ResMut<LoadingProgress>,
) {
    let pending: Vec<usize> = roots
        .iter()
        .filter(|(_, instance)| !scene_spawner.instance_is_ready(***instance))
        .map(|(root, _)| root.index)
        .collect();
    let ready = roots.iter().count() - pending.len();

    if ready != loading_progress.instances_ready {
        loading_progress.instances_ready = ready;
        debug!(
            "Instanced {}/{} snapshots, waiting on {:?}",
            ready, loading_progress.snapshots_total, pending
        );
    }
}

/// Frame the camera on every snapshot, then keep them all on screen for the
/// configured frames and hand over to the running viewer: registry flags
/// applied, slider and label set.
pub fn run_warm_up(
    config: Res<ViewerConfig>,
    registry: Res<SnapshotRegistry>,
    manifest: Res<SnapshotManifest>,
    children: Query<&Children>,
    meshes: Query<(&Aabb, &GlobalTransform)>,
    mut visibilities: Query<&mut Visibility>,
    mut camera: Query<&mut Transform, With<ViewerCamera>>,
    mut orbit: ResMut<OrbitCamera>,
    mut slider: ResMut<SnapshotSlider>,
    mut label: ResMut<StatusLabel>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut loading_progress: ResMut<LoadingProgress>,
) {
    if loading_progress.viewer_ready {
        return;
    }

    // Warm-up draws only what the camera sees, so frame first.
    if !loading_progress.camera_framed {
        match camera.single_mut() {
            Ok(mut camera_transform) => {
                frame_snapshots(
                    &registry,
                    &children,
                    &meshes,
                    config.camera_fov_radians(),
                    config.frame_margin,
                    &mut camera_transform,
                    &mut orbit,
                );
            }
            Err(error) => warn!("Camera not framed: {}", error),
        }
        loading_progress.camera_framed = true;
    }

    // At least one settle frame before the flags are applied.
    loading_progress.warm_up_frames_elapsed += 1;
    if loading_progress.warm_up_frames_elapsed < config.warm_up_frames.max(1) {
        return;
    }

    apply_registry_visibility(&registry, &mut visibilities);

    slider.configure(registry.len());
    let current = registry.current_index();
    let current_label = manifest.label(current).unwrap_or_default();
    label.set_if_neq(StatusLabel::new(current_label.clone()));

    rpc_interface.send_notification(
        "snapshots_ready",
        serde_json::json!({
            "count": registry.len(),
            "current_index": current,
            "label": current_label,
        }),
    );

    info!(
        "✓ Viewer ready with {} snapshots after {} warm-up frames",
        registry.len(),
        loading_progress.warm_up_frames_elapsed
    );
    loading_progress.viewer_ready = true;
}
