use bevy::prelude::*;
use constants::ui_text::LOADING_TEXT;

use crate::engine::loading::progress::LoadingProgress;

/// Opaque full-screen cover shown until the viewer is running or has failed.
/// Snapshots drawn during warm-up stay hidden behind it.
#[derive(Component)]
pub struct LoadingScreen;

#[derive(Component)]
pub struct LoadingScreenText;

pub fn spawn_loading_screen(mut commands: Commands) {
    commands
        .spawn((
            LoadingScreen,
            Name::new("LoadingScreen"),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(Color::srgb(0.06, 0.07, 0.09)),
            GlobalZIndex(i32::MAX),
        ))
        .with_children(|parent| {
            parent.spawn((
                LoadingScreenText,
                Text::new(LOADING_TEXT),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.87, 0.9)),
            ));
        });
}

pub fn loading_text(progress: &LoadingProgress) -> String {
    if progress.snapshots_total == 0 {
        LOADING_TEXT.to_string()
    } else {
        format!(
            "{} {}/{}",
            LOADING_TEXT, progress.snapshots_loaded, progress.snapshots_total
        )
    }
}

pub fn update_loading_text(
    progress: Res<LoadingProgress>,
    mut query: Query<&mut Text, With<LoadingScreenText>>,
) {
    if !progress.is_changed() {
        return;
    }
    for mut text in &mut query {
        text.0 = loading_text(&progress);
    }
}

pub fn despawn_loading_screen(mut commands: Commands, screens: Query<Entity, With<LoadingScreen>>) {
    for entity in &screens {
        commands.entity(entity).despawn();
    }
}
