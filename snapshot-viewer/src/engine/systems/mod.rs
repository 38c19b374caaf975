//! Runtime systems active once the viewer is running.

/// Frame rate notifications to the host and native FPS readout.
pub mod fps_tracking;

/// Slider input handling and the visibility switch.
pub mod selection;
