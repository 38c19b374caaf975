/// Manifest document fetched at startup, relative to the asset root.
pub const DEFAULT_MANIFEST_PATH: &str = "models.json";

/// Directory prefix prepended to every manifest entry's file.
pub const MODEL_DIRECTORY: &str = "models";

/// Cubemap used for the skybox and reflection environment.
/// Either a KTX2 cubemap or a vertically stacked 6-face image.
pub const BACKDROP_PATH: &str = "environment/backdrop_cubemap.ktx2";

/// Query value that disables the backdrop entirely.
pub const BACKDROP_DISABLED: &str = "none";

/// Placeholder substituted in implicit manifest file templates.
pub const PATTERN_INDEX_PLACEHOLDER: &str = "{index}";

/// Upper bound on the file count of an implicit manifest.
pub const MAX_PATTERN_COUNT: usize = 10_000;

/// Model file extensions the viewer can load.
pub const MODEL_EXTENSIONS: &[&str] = &["glb", "gltf"];

/// Canvas element the wasm build renders into.
pub const CANVAS_SELECTOR: &str = "#bevy";

/// Range input on the host page driving snapshot selection.
pub const SLIDER_ELEMENT_ID: &str = "slider";

/// Text element on the host page showing the current snapshot label.
pub const LABEL_ELEMENT_ID: &str = "date-display";
