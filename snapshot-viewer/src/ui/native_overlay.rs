use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;
use constants::ui_text::{LOADING_TEXT, NEXT_BUTTON_TEXT, PREVIOUS_BUTTON_TEXT};

use crate::engine::systems::fps_tracking::FpsText;
use crate::ui::slider::{SliderInput, SliderInputSource, SnapshotSlider};
use crate::ui::status_label::StatusLabel;

#[derive(Component)]
pub struct StatusLabelText;

#[derive(Component)]
pub struct SliderThumb;

/// ◀ / ▶ buttons moving the slider by `delta`.
#[derive(Component)]
pub struct StepButton {
    pub delta: i64,
}

const TRACK_WIDTH_PX: f32 = 360.0;
const THUMB_WIDTH_PX: f32 = 14.0;

pub fn spawn_native_overlay(mut commands: Commands) {
    commands
        .spawn((
            Name::new("SnapshotControls"),
            Node {
                width: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                bottom: Val::Px(0.0),
                padding: UiRect::all(Val::Px(12.0)),
                row_gap: Val::Px(8.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.08, 0.09, 0.11, 0.8)),
        ))
        .with_children(|panel| {
            panel.spawn((
                StatusLabelText,
                Text::new(LOADING_TEXT),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            panel
                .spawn(Node {
                    column_gap: Val::Px(10.0),
                    align_items: AlignItems::Center,
                    ..default()
                })
                .with_children(|row| {
                    spawn_step_button(row, PREVIOUS_BUTTON_TEXT, -1);

                    row.spawn((
                        Name::new("SliderTrack"),
                        Node {
                            width: Val::Px(TRACK_WIDTH_PX),
                            height: Val::Px(6.0),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(0.3, 0.32, 0.36)),
                    ))
                    .with_children(|track| {
                        track.spawn((
                            SliderThumb,
                            Node {
                                width: Val::Px(THUMB_WIDTH_PX),
                                height: Val::Px(18.0),
                                position_type: PositionType::Absolute,
                                left: Val::Px(0.0),
                                top: Val::Px(-6.0),
                                ..default()
                            },
                            BackgroundColor(Color::srgb(0.85, 0.87, 0.9)),
                        ));
                    });

                    spawn_step_button(row, NEXT_BUTTON_TEXT, 1);
                });
        });

    commands.spawn((
        FpsText,
        Text::new("FPS: "),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.3, 0.3)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            right: Val::Px(12.0),
            ..default()
        },
    ));
}

fn spawn_step_button(parent: &mut ChildSpawnerCommands, text: &str, delta: i64) {
    parent
        .spawn((
            Button,
            StepButton { delta },
            Node {
                width: Val::Px(28.0),
                height: Val::Px(28.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(Color::srgb(0.22, 0.24, 0.28)),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Thumb offset along the track for the slider's current value.
pub fn thumb_offset(slider: &SnapshotSlider) -> f32 {
    let span = slider.max.saturating_sub(slider.min);
    if span == 0 {
        return 0.0;
    }
    let fraction = slider.value.saturating_sub(slider.min) as f32 / span as f32;
    fraction * (TRACK_WIDTH_PX - THUMB_WIDTH_PX)
}

pub fn handle_step_buttons(
    buttons: Query<(&Interaction, &StepButton), Changed<Interaction>>,
    slider: Res<SnapshotSlider>,
    mut inputs: EventWriter<SliderInput>,
) {
    for (interaction, button) in &buttons {
        if *interaction == Interaction::Pressed {
            inputs.write(SliderInput::new(
                slider.value as i64 + button.delta,
                SliderInputSource::Overlay,
            ));
        }
    }
}

/// Left/Right step, Home/End jump to the ends.
pub fn handle_keyboard_navigation(
    keyboard: Res<ButtonInput<KeyCode>>,
    slider: Res<SnapshotSlider>,
    mut inputs: EventWriter<SliderInput>,
) {
    let value = slider.value as i64;
    let raw = if keyboard.just_pressed(KeyCode::ArrowLeft) {
        value - 1
    } else if keyboard.just_pressed(KeyCode::ArrowRight) {
        value + 1
    } else if keyboard.just_pressed(KeyCode::Home) {
        slider.min as i64
    } else if keyboard.just_pressed(KeyCode::End) {
        slider.max as i64
    } else {
        return;
    };
    inputs.write(SliderInput::new(raw, SliderInputSource::Keyboard));
}

pub fn sync_status_label_text(
    label: Res<StatusLabel>,
    mut texts: Query<&mut Text, With<StatusLabelText>>,
) {
    if !label.is_changed() {
        return;
    }
    for mut text in &mut texts {
        text.0 = label.text().to_string();
    }
}

pub fn sync_slider_thumb(slider: Res<SnapshotSlider>, mut thumbs: Query<&mut Node, With<SliderThumb>>) {
    if !slider.is_changed() {
        return;
    }
    for mut node in &mut thumbs {
        node.left = Val::Px(thumb_offset(&slider));
    }
}
