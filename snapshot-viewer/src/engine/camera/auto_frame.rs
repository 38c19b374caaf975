use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use constants::render_settings::MIN_FRAME_DISTANCE;

use crate::engine::assets::bounds::SceneBounds;
use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::scene::registry::SnapshotRegistry;

/// Camera pose that fits a bounding volume in view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraFrame {
    /// Distance is the one that makes the largest dimension span the vertical
    /// field of view, scaled by `margin`. The camera sits on the +Z side of the
    /// centre, raised by half the height.
    pub fn fit(bounds: &SceneBounds, fov_radians: f32, margin: f32) -> Self {
        let center = bounds.center();
        let size = bounds.size();
        let max_dimension = bounds.max_dimension();

        let distance = if max_dimension <= f32::EPSILON {
            MIN_FRAME_DISTANCE
        } else {
            (max_dimension / 2.0 / (fov_radians / 2.0).tan()).abs() * margin
        };

        Self {
            position: Vec3::new(center.x, center.y + size.y / 2.0, center.z + distance),
            target: center,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.target, Vec3::Y)
    }
}

/// World-space union of every mesh under every registered snapshot, hidden ones included.
pub fn collect_snapshot_bounds(
    registry: &SnapshotRegistry,
    children: &Query<&Children>,
    meshes: &Query<(&Aabb, &GlobalTransform)>,
) -> Option<SceneBounds> {
    let mesh_bounds = registry.iter().flat_map(move |(_, root, _)| {
        std::iter::once(root)
            .chain(children.iter_descendants(root))
            .filter_map(move |entity| meshes.get(entity).ok())
            .map(|(aabb, transform)| SceneBounds::from_aabb(aabb, transform))
    });

    SceneBounds::union_all(mesh_bounds)
}

/// Move the camera to the frame immediately and re-seed the orbit controller from it.
pub fn apply_camera_frame(frame: CameraFrame, camera: &mut Transform, orbit: &mut OrbitCamera) {
    *camera = frame.transform();
    *orbit = OrbitCamera::from_look(frame.position, frame.target);
}

/// Frame every snapshot. Returns `false` and leaves the camera alone when
/// no snapshot has any geometry.
pub fn frame_snapshots(
    registry: &SnapshotRegistry,
    children: &Query<&Children>,
    meshes: &Query<(&Aabb, &GlobalTransform)>,
    fov_radians: f32,
    margin: f32,
    camera: &mut Transform,
    orbit: &mut OrbitCamera,
) -> bool {
    let Some(bounds) = collect_snapshot_bounds(registry, children, meshes) else {
        warn!("No snapshot geometry to frame; camera keeps its default pose");
        return false;
    };

    let frame = CameraFrame::fit(&bounds, fov_radians, margin);
    info!(
        "Framing {} snapshots: centre {:?}, size {:?}, camera at {:?}",
        registry.len(),
        bounds.center(),
        bounds.size(),
        frame.position
    );
    apply_camera_frame(frame, camera, orbit);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use constants::render_settings::FRAME_MARGIN;
    use std::f32::consts::FRAC_PI_3;

    fn unit_cube_snapshot(world: &mut World, offset: Vec3) -> Entity {
        let root = world.spawn(GlobalTransform::default()).id();
        world.spawn((
            Aabb::from_min_max(Vec3::ZERO, Vec3::ONE),
            GlobalTransform::from_translation(offset),
            ChildOf(root),
        ));
        root
    }

    fn bounds_of(world: &mut World) -> Option<SceneBounds> {
        world
            .run_system_once(
                |registry: Res<SnapshotRegistry>,
                 children: Query<&Children>,
                 meshes: Query<(&Aabb, &GlobalTransform)>| {
                    collect_snapshot_bounds(&registry, &children, &meshes)
                },
            )
            .unwrap()
    }

    #[test]
    fn fit_places_camera_in_front_and_above_the_centre() {
        let bounds = SceneBounds::new(Vec3::ZERO, Vec3::ONE);
        let frame = CameraFrame::fit(&bounds, FRAC_PI_3, FRAME_MARGIN);

        let expected_distance = 0.5 / (FRAC_PI_3 / 2.0).tan() * FRAME_MARGIN;
        assert!(frame.target.abs_diff_eq(Vec3::splat(0.5), 1e-6));
        assert!(
            frame
                .position
                .abs_diff_eq(Vec3::new(0.5, 1.0, 0.5 + expected_distance), 1e-5)
        );
    }

    #[test]
    fn degenerate_bounds_use_minimum_distance() {
        let point = SceneBounds::new(Vec3::splat(2.0), Vec3::splat(2.0));
        let frame = CameraFrame::fit(&point, FRAC_PI_3, FRAME_MARGIN);
        assert_eq!(frame.position, Vec3::new(2.0, 2.0, 2.0 + MIN_FRAME_DISTANCE));
    }

    #[test]
    fn identical_snapshots_frame_like_one() {
        let mut world = World::new();
        let roots: Vec<Entity> = (0..4)
            .map(|_| unit_cube_snapshot(&mut world, Vec3::ZERO))
            .collect();
        let mut registry = SnapshotRegistry::populate(roots);
        registry.show_model(2);
        world.insert_resource(registry);

        let bounds = bounds_of(&mut world).unwrap();
        assert_eq!(bounds, SceneBounds::new(Vec3::ZERO, Vec3::ONE));
    }

    #[test]
    fn hidden_snapshots_still_count() {
        let mut world = World::new();
        let first = unit_cube_snapshot(&mut world, Vec3::ZERO);
        let second = unit_cube_snapshot(&mut world, Vec3::new(10.0, 0.0, 0.0));
        world.insert_resource(SnapshotRegistry::populate([first, second]));

        let bounds = bounds_of(&mut world).unwrap();
        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn no_geometry_leaves_the_camera_alone() {
        let mut world = World::new();
        let empty_root = world.spawn(Transform::default()).id();
        world.insert_resource(SnapshotRegistry::populate([empty_root]));

        let framed = world
            .run_system_once(
                |registry: Res<SnapshotRegistry>,
                 children: Query<&Children>,
                 meshes: Query<(&Aabb, &GlobalTransform)>| {
                    let mut camera = Transform::from_xyz(0.0, 5.0, 10.0);
                    let mut orbit = OrbitCamera::default();
                    let framed = frame_snapshots(
                        &registry,
                        &children,
                        &meshes,
                        FRAC_PI_3,
                        FRAME_MARGIN,
                        &mut camera,
                        &mut orbit,
                    );
                    (framed, camera, orbit)
                },
            )
            .unwrap();

        assert!(!framed.0);
        assert_eq!(framed.1, Transform::from_xyz(0.0, 5.0, 10.0));
        assert_eq!(framed.2, OrbitCamera::default());
    }

    #[test]
    fn applying_a_frame_reseeds_the_orbit() {
        let frame = CameraFrame {
            position: Vec3::new(0.5, 1.0, 3.0),
            target: Vec3::splat(0.5),
        };
        let mut camera = Transform::default();
        let mut orbit = OrbitCamera::default();
        apply_camera_frame(frame, &mut camera, &mut orbit);

        assert_eq!(camera.translation, frame.position);
        assert_eq!(orbit.focus_point, frame.target);
        assert!(orbit.position().abs_diff_eq(frame.position, 1e-4));
    }
}
