//! Shared constants for the snapshot viewer and its manifest tooling.

/// Asset locations and host page element ids.
pub mod path;

/// Camera, lighting and framing defaults.
pub mod render_settings;

/// User-visible status strings.
pub mod ui_text;
