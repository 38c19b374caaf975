use bevy::prelude::*;

use crate::engine::loading::error::{LoadFailure, ViewerError};
use crate::engine::loading::progress::LoadingProgress;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::ui::status_label::StatusLabel;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    /// Backdrop, manifest and every snapshot asset are loading.
    #[default]
    Loading,
    /// Snapshot scenes are spawned and waiting for their instances.
    Instancing,
    /// Every snapshot is drawn behind the loading screen so materials get prepared.
    WarmingUp,
    Running,
    /// Terminal for the session.
    Failed,
}

impl AppState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Instancing => "instancing",
            Self::WarmingUp => "warming_up",
            Self::Running => "running",
            Self::Failed => "failed",
        }
    }
}

/// Abort startup. The error is logged here and reported on entering `Failed`.
pub fn fail_loading(
    commands: &mut Commands,
    next_state: &mut NextState<AppState>,
    error: ViewerError,
) {
    error!("Loading failed: {}", error);
    commands.insert_resource(LoadFailure(error));
    next_state.set(AppState::Failed);
}

pub fn transition_to_instancing(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.registry_populated {
        info!("→ Transitioning to Instancing state");
        next_state.set(AppState::Instancing);
    }
}

pub fn transition_to_warming_up(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.all_instances_ready() {
        info!("→ Transitioning to WarmingUp state");
        next_state.set(AppState::WarmingUp);
    }
}

pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.viewer_ready {
        info!("→ Viewer ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

/// Show the fixed failure label and tell the host page why.
pub fn report_failure(
    failure: Option<Res<LoadFailure>>,
    mut label: ResMut<StatusLabel>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let Some(failure) = failure else {
        return;
    };
    let error = &failure.0;

    label.set_if_neq(StatusLabel::new(error.user_message()));
    rpc_interface.send_notification(
        "loading_failed",
        serde_json::json!({
            "message": error.user_message(),
            "kind": error.kind(),
            "reason": error.to_string(),
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;
    use constants::ui_text::{LOAD_FAILED_TEXT, LOADING_TEXT};

    #[test]
    fn progress_flags_drive_the_startup_states() {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<AppState>()
            .init_resource::<LoadingProgress>()
            .add_systems(
                Update,
                transition_to_instancing.run_if(in_state(AppState::Loading)),
            )
            .add_systems(
                Update,
                transition_to_warming_up.run_if(in_state(AppState::Instancing)),
            )
            .add_systems(
                Update,
                transition_to_running.run_if(in_state(AppState::WarmingUp)),
            );

        app.update();
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Loading
        );

        {
            let mut progress = app.world_mut().resource_mut::<LoadingProgress>();
            progress.snapshots_total = 2;
            progress.registry_populated = true;
        }
        app.update();
        app.update();
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Instancing
        );

        app.world_mut().resource_mut::<LoadingProgress>().instances_ready = 2;
        app.update();
        app.update();
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::WarmingUp
        );

        app.world_mut().resource_mut::<LoadingProgress>().viewer_ready = true;
        app.update();
        app.update();
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Running
        );
    }

    #[test]
    fn failure_sets_fixed_label_and_notifies_host() {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<AppState>()
            .init_resource::<StatusLabel>()
            .init_resource::<WebRpcInterface>()
            .add_systems(OnEnter(AppState::Failed), report_failure)
            .add_systems(Startup, |mut commands: Commands, mut next: ResMut<NextState<AppState>>| {
                fail_loading(
                    &mut commands,
                    &mut next,
                    ViewerError::SnapshotLoad {
                        index: 1,
                        file: "models/b.glb".into(),
                        reason: "unexpected end of file".into(),
                    },
                );
            });

        assert_eq!(app.world().resource::<StatusLabel>().text(), LOADING_TEXT);
        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Failed
        );
        assert_eq!(app.world().resource::<StatusLabel>().text(), LOAD_FAILED_TEXT);

        let notifications = app.world().resource::<WebRpcInterface>().pending_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].method, "loading_failed");
        assert_eq!(notifications[0].params["kind"], "snapshot_load");
    }
}
