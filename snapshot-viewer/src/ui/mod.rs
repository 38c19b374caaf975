//! Snapshot selection surface: slider state, status label and loading screen.
//!
//! On the web the slider and label are the page's own `#slider` and
//! `#date-display` elements; native builds draw an equivalent overlay.

#[cfg(target_arch = "wasm32")]
pub mod dom_bridge;

/// Full-screen cover shown during loading and warm-up.
pub mod loading_screen;

#[cfg(not(target_arch = "wasm32"))]
pub mod native_overlay;

/// Slider range, value and input events.
pub mod slider;

pub mod status_label;

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;
use loading_screen::{despawn_loading_screen, spawn_loading_screen, update_loading_text};
use slider::{SliderInput, SnapshotSlider};
use status_label::StatusLabel;

pub struct ViewerUiPlugin;

impl Plugin for ViewerUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SnapshotSlider>()
            .init_resource::<StatusLabel>()
            .add_event::<SliderInput>()
            .add_systems(Startup, spawn_loading_screen)
            .add_systems(Update, update_loading_text)
            .add_systems(OnEnter(AppState::Running), despawn_loading_screen)
            .add_systems(OnEnter(AppState::Failed), despawn_loading_screen);

        #[cfg(not(target_arch = "wasm32"))]
        {
            use native_overlay::{
                handle_keyboard_navigation, handle_step_buttons, spawn_native_overlay,
                sync_slider_thumb, sync_status_label_text,
            };

            app.add_systems(Startup, spawn_native_overlay).add_systems(
                Update,
                (
                    handle_step_buttons,
                    handle_keyboard_navigation,
                    sync_status_label_text,
                    sync_slider_thumb,
                ),
            );
        }

        #[cfg(target_arch = "wasm32")]
        {
            use dom_bridge::{
                forward_dom_slider_input, setup_dom_slider, sync_dom_label, sync_dom_slider,
            };

            app.add_systems(Startup, setup_dom_slider).add_systems(
                Update,
                (forward_dom_slider_input, sync_dom_slider, sync_dom_label),
            );
        }
    }
}
