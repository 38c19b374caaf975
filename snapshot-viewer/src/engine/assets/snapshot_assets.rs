use bevy::gltf::Gltf;
use bevy::prelude::*;

use crate::engine::assets::manifest::SnapshotManifest;
use crate::engine::scene::environment::EnvironmentMaps;

/// Handles for everything the viewer loads at startup.
/// Index `i` of `snapshots` is the glTF for manifest entry `i`.
#[derive(Resource, Default)]
pub struct SnapshotAssets {
    pub manifest: Option<Handle<SnapshotManifest>>,
    pub backdrop: Option<Handle<Image>>,
    /// Prefiltered lighting maps requested alongside the backdrop.
    pub environment_maps: Option<EnvironmentMaps>,
    pub snapshots: Vec<Handle<Gltf>>,
    pub asset_paths: Vec<String>,
}

impl SnapshotAssets {
    /// Fan-out: request every snapshot at once. The asset server loads them concurrently.
    pub fn request_snapshots(&mut self, asset_server: &AssetServer, asset_paths: Vec<String>) {
        self.snapshots = asset_paths
            .iter()
            .map(|path| asset_server.load::<Gltf>(path.clone()))
            .collect();
        self.asset_paths = asset_paths;
    }

    pub fn snapshot_path(&self, index: usize) -> &str {
        self.asset_paths
            .get(index)
            .map(String::as_str)
            .unwrap_or_default()
    }
}
