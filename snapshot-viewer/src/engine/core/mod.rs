//! Core application setup and state management.
//!
//! Handles application lifecycle, viewer configuration, window setup and
//! the state transitions from loading through to the running viewer.

/// Application setup and plugin configuration.
///
/// Builds the single `App` with asset loaders, UI, RPC and the systems for
/// every application state.
pub mod app_setup;

/// Application state machine and loading progress transitions.
///
/// `Loading → Instancing → WarmingUp → Running`, with `Failed` reachable
/// from any loading state.
pub mod app_state;

/// Viewer options: built-in defaults plus page query overrides on the web.
pub mod config;

/// Platform-specific window configuration for native and WASM builds.
pub mod window_config;
