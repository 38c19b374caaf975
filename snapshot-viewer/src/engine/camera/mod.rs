//! Viewer camera: orbit navigation and automatic framing of the snapshot set.
//!
//! The camera is spawned once at startup with a fixed default pose. After every
//! snapshot is instanced, auto-framing moves it to fit the union of all snapshot
//! bounds and re-seeds the orbit controller from that pose.

/// Fit-to-bounds camera placement computed over every snapshot.
pub mod auto_frame;

/// Orbit camera resource and controller system.
pub mod orbit_camera;
