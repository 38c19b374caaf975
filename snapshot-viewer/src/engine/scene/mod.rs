//! Scene contents: snapshot roots, their registry, lights and the environment backdrop.

/// Skybox and reflection environment from the backdrop cubemap.
pub mod environment;

pub mod lighting;

/// Fixed-capacity snapshot registry and the visibility switch.
pub mod registry;

/// Spawning of snapshot scene roots.
pub mod spawner;
