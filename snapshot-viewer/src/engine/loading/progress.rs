use bevy::prelude::*;

/// Loading progress tracked across the startup states.
#[derive(Resource, Default)]
pub struct LoadingProgress {
    /// Backdrop applied, skipped, or failed under the optional policy.
    pub backdrop_resolved: bool,
    pub manifest_requested: bool,
    pub manifest_loaded: bool,
    pub snapshots_loaded: usize,
    pub snapshots_total: usize,
    pub registry_populated: bool,
    pub instances_ready: usize,
    /// Set on the first warm-up frame, before anything is drawn for warm-up.
    pub camera_framed: bool,
    pub warm_up_frames_elapsed: u32,
    /// Registry flags applied and slider configured.
    pub viewer_ready: bool,
}

impl LoadingProgress {
    pub fn all_instances_ready(&self) -> bool {
        self.registry_populated && self.instances_ready == self.snapshots_total
    }
}
