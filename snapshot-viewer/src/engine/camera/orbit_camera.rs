use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;
use constants::render_settings::{
    CAMERA_FAR, CAMERA_NEAR, DEFAULT_CAMERA_POSITION, ORBIT_DAMPING_RATE, ORBIT_MAX_RADIUS,
    ORBIT_MIN_RADIUS, ORBIT_PAN_SENSITIVITY, ORBIT_PITCH_LIMIT, ORBIT_ROTATE_SENSITIVITY,
    ORBIT_ZOOM_STEP,
};

/// Marker for the single viewer camera.
#[derive(Component)]
pub struct ViewerCamera;

/// Orbit state around a focus point. The camera transform eases toward the pose
/// described here every frame.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub focus_point: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
}

impl OrbitCamera {
    /// Orbit state that reproduces a camera at `position` looking at `target`.
    pub fn from_look(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length().max(ORBIT_MIN_RADIUS);
        let yaw = offset.x.atan2(offset.z);
        let pitch = -(offset.y / radius).clamp(-1.0, 1.0).asin();

        Self {
            focus_point: target,
            yaw,
            pitch: pitch.clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT),
            radius,
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn position(&self) -> Vec3 {
        self.focus_point + self.rotation() * Vec3::Z * self.radius
    }

    pub fn target_transform(&self) -> Transform {
        Transform {
            translation: self.position(),
            rotation: self.rotation(),
            ..default()
        }
    }

    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ORBIT_ROTATE_SENSITIVITY;
        self.pitch = (self.pitch - delta.y * ORBIT_ROTATE_SENSITIVITY)
            .clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
    }

    /// Move the focus point in the view plane, scaled by distance so panning
    /// feels the same at any zoom level.
    pub fn pan(&mut self, delta: Vec2) {
        let rotation = self.rotation();
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        let scale = self.radius * ORBIT_PAN_SENSITIVITY;
        self.focus_point += (-right * delta.x + up * delta.y) * scale;
    }

    /// Positive `steps` dolly in, negative dolly out.
    pub fn zoom(&mut self, steps: f32) {
        let factor = (1.0 - ORBIT_ZOOM_STEP).powf(steps);
        self.radius = (self.radius * factor).clamp(ORBIT_MIN_RADIUS, ORBIT_MAX_RADIUS);
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_look(Vec3::from_array(DEFAULT_CAMERA_POSITION), Vec3::ZERO)
    }
}

/// Spawn the perspective camera at its default pose.
pub fn spawn_viewer_camera(commands: &mut Commands, fov_radians: f32) -> Entity {
    let orbit = OrbitCamera::default();
    let entity = commands
        .spawn((
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: fov_radians,
                near: CAMERA_NEAR,
                far: CAMERA_FAR,
                ..default()
            }),
            Tonemapping::AcesFitted,
            Transform::from_translation(orbit.position()).looking_at(Vec3::ZERO, Vec3::Y),
            ViewerCamera,
        ))
        .id();
    commands.insert_resource(orbit);
    entity
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<ViewerCamera>>,
    mut orbit: ResMut<OrbitCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();
    if mouse_delta != Vec2::ZERO {
        if mouse_button.pressed(MouseButton::Left) {
            orbit.orbit(mouse_delta);
        } else if mouse_button.any_pressed([MouseButton::Right, MouseButton::Middle]) {
            orbit.pan(mouse_delta);
        }
    }

    let mut scroll_accum = 0.0;
    for event in scroll_events.read() {
        scroll_accum += match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        orbit.zoom(scroll_accum);
    }

    let target = orbit.target_transform();
    let lerp_speed = (ORBIT_DAMPING_RATE * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform
        .translation
        .lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_look_round_trips_the_position() {
        let position = Vec3::new(3.0, 4.0, 12.0);
        let target = Vec3::new(1.0, -2.0, 0.5);
        let orbit = OrbitCamera::from_look(position, target);

        assert!(orbit.position().abs_diff_eq(position, 1e-4));
        assert!((orbit.radius - (position - target).length()).abs() < 1e-4);
    }

    #[test]
    fn target_transform_faces_the_focus_point() {
        let orbit = OrbitCamera::from_look(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO);
        let transform = orbit.target_transform();
        let to_focus = (orbit.focus_point - transform.translation).normalize();

        assert!(transform.forward().as_vec3().abs_diff_eq(to_focus, 1e-4));
    }

    #[test]
    fn pitch_and_radius_stay_clamped() {
        let mut orbit = OrbitCamera::default();
        orbit.orbit(Vec2::new(0.0, 1.0e6));
        assert_eq!(orbit.pitch, -ORBIT_PITCH_LIMIT);
        orbit.orbit(Vec2::new(0.0, -1.0e6));
        assert_eq!(orbit.pitch, ORBIT_PITCH_LIMIT);

        orbit.zoom(1000.0);
        assert_eq!(orbit.radius, ORBIT_MIN_RADIUS);
        orbit.zoom(-1000.0);
        assert_eq!(orbit.radius, ORBIT_MAX_RADIUS);
    }

    #[test]
    fn panning_keeps_the_view_direction() {
        let mut orbit = OrbitCamera::from_look(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let rotation = orbit.rotation();
        orbit.pan(Vec2::new(40.0, 0.0));

        assert_eq!(orbit.rotation(), rotation);
        assert!(orbit.focus_point.x < 0.0);
        assert!(orbit.focus_point.y.abs() < 1e-5);
    }
}
