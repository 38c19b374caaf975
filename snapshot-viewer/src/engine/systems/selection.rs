use bevy::prelude::*;

use crate::engine::assets::manifest::SnapshotManifest;
use crate::engine::scene::registry::{ShowOutcome, SnapshotRegistry, apply_visibility_change};
use crate::rpc::web_rpc::WebRpcInterface;
use crate::ui::slider::{SliderInput, SnapshotSlider};
use crate::ui::status_label::StatusLabel;

/// Route slider inputs through the visibility switch and keep slider, label
/// and host in step with the shown snapshot.
pub fn handle_slider_input(
    mut inputs: EventReader<SliderInput>,
    mut slider: ResMut<SnapshotSlider>,
    mut registry: ResMut<SnapshotRegistry>,
    manifest: Res<SnapshotManifest>,
    mut visibilities: Query<&mut Visibility>,
    mut label: ResMut<StatusLabel>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for input in inputs.read() {
        let Some(index) = slider.accept(input.raw) else {
            debug!("Ignoring {:?} slider input before loading finished", input.source);
            continue;
        };

        match registry.show_model(index) {
            ShowOutcome::Unchanged => {}
            ShowOutcome::Switched(change) => {
                apply_visibility_change(change, &mut visibilities);
                debug_assert!(registry.visible_count() <= 1);

                let current_label = manifest.label(index).unwrap_or_default();
                label.set_if_neq(StatusLabel::new(current_label.clone()));
                rpc_interface.send_notification(
                    "snapshot_changed",
                    serde_json::json!({
                        "index": index,
                        "label": current_label,
                    }),
                );
                debug!("Showing snapshot {} ({:?})", index, input.source);
            }
            ShowOutcome::OutOfRange { index, len } => {
                warn!("Snapshot {} requested but only {} exist", index, len);
                continue;
            }
        }

        if slider.value != index {
            slider.value = index;
        }
    }
}
