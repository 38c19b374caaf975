use bevy::prelude::*;

use crate::engine::scene::registry::{SnapshotRegistry, SnapshotRoot, visibility_from_flag};

/// Spawn one scene root per loaded snapshot and build the registry from them.
///
/// With `warm_up` every root starts visible so all materials get prepared;
/// otherwise each root starts with its registry flag.
pub fn spawn_snapshots(
    commands: &mut Commands,
    scenes: Vec<Handle<Scene>>,
    labels: &[String],
    warm_up: bool,
) -> SnapshotRegistry {
    let entities: Vec<Entity> = scenes
        .into_iter()
        .enumerate()
        .map(|(index, scene)| {
            let label = labels.get(index).cloned().unwrap_or_default();
            commands
                .spawn((
                    SceneRoot(scene),
                    SnapshotRoot { index },
                    Name::new(format!("snapshot:{index}:{label}")),
                    Transform::default(),
                    visibility_from_flag(warm_up || index == 0),
                ))
                .id()
        })
        .collect();

    SnapshotRegistry::populate(entities)
}
