/// Vertical field of view of the viewer camera, in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 60.0;

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 5000.0;

/// Camera position before auto-framing has run.
pub const DEFAULT_CAMERA_POSITION: [f32; 3] = [0.0, 5.0, 10.0];

/// Multiplier applied to the fitted distance so geometry never touches the frame edge.
pub const FRAME_MARGIN: f32 = 1.7;

/// Distance used when the framed volume has no extent.
pub const MIN_FRAME_DISTANCE: f32 = 1.0;

pub const AMBIENT_BRIGHTNESS: f32 = 700.0;
pub const DIRECTIONAL_ILLUMINANCE: f32 = 10_000.0;

/// Direction the key light shines from, not normalised.
pub const DIRECTIONAL_LIGHT_POSITION: [f32; 3] = [50.0, 50.0, 50.0];

pub const SKYBOX_BRIGHTNESS: f32 = 1000.0;
pub const ENVIRONMENT_INTENSITY: f32 = 900.0;

/// Frames every snapshot is drawn behind the loading screen so pipelines are ready
/// before the first slider move. Zero disables the warm-up pass.
pub const DEFAULT_WARM_UP_FRAMES: u32 = 3;

pub const ORBIT_ROTATE_SENSITIVITY: f32 = 0.005;
pub const ORBIT_PAN_SENSITIVITY: f32 = 0.0015;
pub const ORBIT_ZOOM_STEP: f32 = 0.1;
pub const ORBIT_MIN_RADIUS: f32 = 0.05;
pub const ORBIT_MAX_RADIUS: f32 = 4000.0;
pub const ORBIT_PITCH_LIMIT: f32 = 1.55;

/// Per-second easing rate of the camera toward its orbit target.
pub const ORBIT_DAMPING_RATE: f32 = 12.0;

/// Log filter applied to the engine log plugin.
pub const LOG_FILTER: &str = "wgpu=error,naga=warn,bevy_render=info,snapshot_viewer=info";
