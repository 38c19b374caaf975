use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::render_settings::LOG_FILTER;

use crate::engine::assets::manifest::SnapshotManifest;
use crate::engine::assets::snapshot_assets::SnapshotAssets;
use crate::engine::camera::orbit_camera::{camera_controller, spawn_viewer_camera};
use crate::engine::core::app_state::{
    AppState, report_failure, transition_to_instancing, transition_to_running,
    transition_to_warming_up,
};
use crate::engine::core::config::{ViewerConfig, configure_viewer};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::backdrop_loader::{check_backdrop_loading, request_backdrop};
use crate::engine::loading::manifest_loader::{load_manifest_system, request_manifest};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::snapshot_loader::check_snapshot_loading;
use crate::engine::loading::warm_up::{check_instances_ready, run_warm_up};
use crate::engine::scene::lighting::spawn_lighting;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::selection::handle_slider_input;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::ui::ViewerUiPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::fps_text_update_system;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers SnapshotManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<SnapshotManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(ViewerUiPlugin)
        .init_resource::<LoadingProgress>()
        .init_resource::<SnapshotAssets>();

    app.add_systems(Startup, (configure_viewer, setup, request_backdrop).chain());
    add_lifecycle_systems(&mut app);

    app.add_systems(
        Update,
        (camera_controller, fps_notification_system).run_if(in_state(AppState::Running)),
    );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

/// Systems for every application state, from loading to the running viewer.
pub fn add_lifecycle_systems(app: &mut App) {
    app.add_systems(
        Update,
        (
            check_backdrop_loading,
            request_manifest,
            load_manifest_system,
            check_snapshot_loading,
            transition_to_instancing,
        )
            .chain()
            .run_if(in_state(AppState::Loading)),
    )
    .add_systems(
        Update,
        (check_instances_ready, transition_to_warming_up)
            .chain()
            .run_if(in_state(AppState::Instancing)),
    )
    .add_systems(
        Update,
        (run_warm_up, transition_to_running)
            .chain()
            .run_if(in_state(AppState::WarmingUp)),
    )
    .add_systems(
        Update,
        handle_slider_input.run_if(in_state(AppState::Running)),
    )
    .add_systems(OnEnter(AppState::Failed), report_failure);
}

fn setup(mut commands: Commands, config: Res<ViewerConfig>) {
    spawn_lighting(&mut commands);
    spawn_viewer_camera(&mut commands, config.camera_fov_radians());
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        filter: LOG_FILTER.into(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}

/// Headless app running the lifecycle systems against an in-memory asset source.
#[cfg(test)]
pub(crate) mod test_app {
    use super::*;
    use crate::ui::slider::{SliderInput, SnapshotSlider};
    use crate::ui::status_label::StatusLabel;
    use crate::rpc::web_rpc::WebRpcInterface;
    use bevy::asset::io::memory::{Dir, MemoryAssetReader};
    use bevy::asset::io::{AssetSource, AssetSourceId};
    use bevy::gltf::GltfPlugin;
    use bevy::render::mesh::MeshPlugin;
    use bevy::scene::ScenePlugin;
    use bevy::state::app::StatesPlugin;
    use std::path::Path;
    use std::time::Duration;

    pub fn headless_app(config: ViewerConfig, files: &[(&str, &[u8])]) -> App {
        let dir = Dir::default();
        for (path, bytes) in files {
            dir.insert_asset(Path::new(path), bytes.to_vec());
        }
        let reader = MemoryAssetReader { root: dir };

        let mut app = App::new();
        app.register_asset_source(
            AssetSourceId::Default,
            AssetSource::build().with_reader(move || Box::new(reader.clone())),
        )
        .add_plugins((MinimalPlugins, AssetPlugin::default(), StatesPlugin))
        .add_plugins((ScenePlugin, MeshPlugin, GltfPlugin::default()))
        .add_plugins(JsonAssetPlugin::<SnapshotManifest>::new(&["json"]))
        .init_asset::<Image>()
        .init_state::<AppState>()
        .add_event::<SliderInput>()
        .init_resource::<SnapshotSlider>()
        .init_resource::<StatusLabel>()
        .init_resource::<WebRpcInterface>()
        .init_resource::<LoadingProgress>()
        .init_resource::<SnapshotAssets>()
        .insert_resource(config)
        .add_systems(Startup, request_backdrop);
        add_lifecycle_systems(&mut app);

        app.finish();
        app.cleanup();
        app
    }

    /// Update until the app reaches `Failed`, giving the asset tasks time to finish.
    pub fn run_until_failed(app: &mut App) {
        for _ in 0..500 {
            app.update();
            if *app.world().resource::<State<AppState>>().get() == AppState::Failed {
                return;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        panic!("app never reached the Failed state");
    }
}

#[cfg(test)]
mod tests {
    use super::test_app::{headless_app, run_until_failed};
    use super::*;
    use crate::engine::core::config::{ManifestSource, ViewerConfig};
    use crate::rpc::web_rpc::WebRpcInterface;
    use crate::ui::slider::SnapshotSlider;
    use crate::ui::status_label::StatusLabel;
    use constants::ui_text::LOAD_FAILED_TEXT;

    #[test]
    fn missing_manifest_fails_with_fixed_label_and_no_slider() {
        let mut app = headless_app(
            ViewerConfig {
                manifest_source: ManifestSource::Fetch {
                    path: "does-not-exist/models.json".into(),
                },
                backdrop_path: None,
                ..default()
            },
            &[],
        );
        run_until_failed(&mut app);

        let world = app.world();
        assert_eq!(world.resource::<StatusLabel>().text(), LOAD_FAILED_TEXT);
        assert_eq!(*world.resource::<SnapshotSlider>(), SnapshotSlider::default());

        let notifications = world.resource::<WebRpcInterface>().pending_notifications();
        assert_eq!(notifications[0].method, "loading_failed");
        assert_eq!(notifications[0].params["kind"], "manifest_fetch");
    }
}
