//! Asset definitions for the snapshot sequence.
//!
//! Handles the snapshot manifest, the handles of every requested glTF,
//! and world-space bounds used for camera framing.

/// World-space axis-aligned bounds and their union.
pub mod bounds;

/// Snapshot manifest: both accepted JSON shapes, ordering and display labels.
pub mod manifest;

/// Manifest, backdrop and per-snapshot glTF handles.
pub mod snapshot_assets;
