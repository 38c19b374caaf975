use bevy::prelude::*;
use constants::path::{
    BACKDROP_DISABLED, BACKDROP_PATH, DEFAULT_MANIFEST_PATH, MAX_PATTERN_COUNT, MODEL_DIRECTORY,
};
use constants::render_settings::{CAMERA_FOV_DEGREES, DEFAULT_WARM_UP_FRAMES, FRAME_MARGIN};

use crate::engine::assets::manifest::ManifestOrdering;

/// Where the snapshot list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// JSON document fetched through the asset server.
    Fetch { path: String },
    /// Fixed count of files named by a template; nothing is fetched.
    Pattern {
        template: String,
        start: usize,
        count: usize,
    },
}

impl ManifestSource {
    /// Path or template, for logs and error reports.
    pub fn location(&self) -> &str {
        match self {
            Self::Fetch { path } => path,
            Self::Pattern { template, .. } => template,
        }
    }
}

/// What a failed backdrop load means for the rest of startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackdropPolicy {
    /// Failure is terminal, same as a manifest failure.
    #[default]
    Required,
    /// Failure is logged and models load without skybox or reflections.
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for '{key}': expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("pattern asks for {count} files, more than the limit of {max}")]
    PatternTooLarge { count: usize, max: usize },
    #[error("pattern indices {start}+{count} overflow")]
    PatternOverflow { start: usize, count: usize },
    #[error("'{present}' needs '{missing}' as well")]
    IncompletePair {
        present: &'static str,
        missing: &'static str,
    },
}

/// Prefiltered image-based lighting maps, both KTX2 cubemaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentMapPaths {
    pub diffuse: String,
    pub specular: String,
}

/// Startup configuration of the viewer.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub manifest_source: ManifestSource,
    pub model_directory: String,
    pub ordering: ManifestOrdering,
    /// `None` skips the backdrop entirely.
    pub backdrop_path: Option<String>,
    pub backdrop_policy: BackdropPolicy,
    /// Lighting maps used instead of the raw backdrop when both are given.
    pub environment_maps: Option<EnvironmentMapPaths>,
    pub warm_up_frames: u32,
    pub frame_margin: f32,
    pub camera_fov_degrees: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            manifest_source: ManifestSource::Fetch {
                path: DEFAULT_MANIFEST_PATH.to_string(),
            },
            model_directory: MODEL_DIRECTORY.to_string(),
            ordering: ManifestOrdering::default(),
            backdrop_path: Some(BACKDROP_PATH.to_string()),
            backdrop_policy: BackdropPolicy::default(),
            environment_maps: None,
            warm_up_frames: DEFAULT_WARM_UP_FRAMES,
            frame_margin: FRAME_MARGIN,
            camera_fov_degrees: CAMERA_FOV_DEGREES,
        }
    }
}

impl ViewerConfig {
    /// Apply `key=value` overrides (page query parameters on the web).
    /// Every valid key is applied; invalid ones are collected and left at their previous value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(path) = lookup("manifest") {
            self.manifest_source = ManifestSource::Fetch { path };
        }
        if let Some(directory) = lookup("models") {
            self.model_directory = directory;
        }
        if let Some(backdrop) = lookup("backdrop") {
            self.backdrop_path = if backdrop.eq_ignore_ascii_case(BACKDROP_DISABLED) {
                None
            } else {
                Some(backdrop)
            };
        }
        if let Some(value) = lookup("backdrop_policy") {
            match value.to_ascii_lowercase().as_str() {
                "required" => self.backdrop_policy = BackdropPolicy::Required,
                "optional" => self.backdrop_policy = BackdropPolicy::Optional,
                _ => errors.push(invalid("backdrop_policy", value, "required|optional")),
            }
        }
        match (lookup("env_diffuse"), lookup("env_specular")) {
            (Some(diffuse), Some(specular)) => {
                self.environment_maps = Some(EnvironmentMapPaths { diffuse, specular })
            }
            (Some(_), None) => errors.push(ConfigError::IncompletePair {
                present: "env_diffuse",
                missing: "env_specular",
            }),
            (None, Some(_)) => errors.push(ConfigError::IncompletePair {
                present: "env_specular",
                missing: "env_diffuse",
            }),
            (None, None) => {}
        }
        if let Some(value) = lookup("order") {
            match value.to_ascii_lowercase().as_str() {
                "sorted" => self.ordering = ManifestOrdering::Sorted,
                "listed" => self.ordering = ManifestOrdering::Listed,
                _ => errors.push(invalid("order", value, "sorted|listed")),
            }
        }
        if let Some(value) = lookup("warm_up") {
            match value.parse::<u32>() {
                Ok(frames) => self.warm_up_frames = frames,
                Err(_) => errors.push(invalid("warm_up", value, "a frame count")),
            }
        }
        if let Some(value) = lookup("margin") {
            match value.parse::<f32>() {
                Ok(margin) if margin.is_finite() && margin > 0.0 => self.frame_margin = margin,
                _ => errors.push(invalid("margin", value, "a positive number")),
            }
        }
        if let Some(template) = lookup("pattern") {
            let start = match lookup("start").map(|value| value.parse::<usize>().map_err(|_| value)) {
                None => Ok(1),
                Some(Ok(start)) => Ok(start),
                Some(Err(value)) => Err(invalid("start", value, "a non-negative integer")),
            };
            let count = match lookup("count") {
                Some(value) => match value.parse::<usize>() {
                    Ok(count) if count > 0 => Ok(count),
                    _ => Err(invalid("count", value, "a positive integer")),
                },
                None => Err(invalid("count", String::new(), "a positive integer")),
            };
            match (start, count) {
                (Ok(_), Ok(count)) if count > MAX_PATTERN_COUNT => {
                    errors.push(ConfigError::PatternTooLarge {
                        count,
                        max: MAX_PATTERN_COUNT,
                    })
                }
                (Ok(start), Ok(count)) if start.checked_add(count).is_none() => {
                    errors.push(ConfigError::PatternOverflow { start, count })
                }
                (Ok(start), Ok(count)) => {
                    self.manifest_source = ManifestSource::Pattern {
                        template,
                        start,
                        count,
                    }
                }
                (start, count) => errors.extend(start.err().into_iter().chain(count.err())),
            }
        }

        errors
    }

    pub fn camera_fov_radians(&self) -> f32 {
        self.camera_fov_degrees.to_radians()
    }
}

fn invalid(key: &'static str, value: String, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value,
        expected,
    }
}

/// Insert the viewer configuration. Runs first at startup so every override
/// problem is logged.
pub fn configure_viewer(mut commands: Commands) {
    let config = load_viewer_config();
    info!("Viewer configuration: {:?}", config);
    commands.insert_resource(config);
}

/// Read overrides from the page URL query string.
#[cfg(target_arch = "wasm32")]
pub fn load_viewer_config() -> ViewerConfig {
    let mut config = ViewerConfig::default();

    let params = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok());

    if let Some(params) = params {
        for error in config.apply_overrides(|key| params.get(key)) {
            warn!("Ignoring viewer option: {}", error);
        }
    }
    config
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_viewer_config() -> ViewerConfig {
    ViewerConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_fetch_manifest_and_require_backdrop() {
        let config = ViewerConfig::default();
        assert_eq!(
            config.manifest_source,
            ManifestSource::Fetch {
                path: DEFAULT_MANIFEST_PATH.into()
            }
        );
        assert_eq!(config.backdrop_policy, BackdropPolicy::Required);
        assert_eq!(config.ordering, ManifestOrdering::Sorted);
        assert_eq!(config.frame_margin, FRAME_MARGIN);
    }

    #[test]
    fn valid_overrides_are_applied() {
        let mut config = ViewerConfig::default();
        let errors = config.apply_overrides(overrides(&[
            ("manifest", "scans/index.json"),
            ("backdrop", "none"),
            ("backdrop_policy", "Optional"),
            ("order", "listed"),
            ("warm_up", "0"),
            ("margin", "2.5"),
        ]));

        assert!(errors.is_empty());
        assert_eq!(
            config.manifest_source,
            ManifestSource::Fetch {
                path: "scans/index.json".into()
            }
        );
        assert_eq!(config.backdrop_path, None);
        assert_eq!(config.backdrop_policy, BackdropPolicy::Optional);
        assert_eq!(config.ordering, ManifestOrdering::Listed);
        assert_eq!(config.warm_up_frames, 0);
        assert_eq!(config.frame_margin, 2.5);
    }

    #[test]
    fn invalid_overrides_keep_defaults() {
        let mut config = ViewerConfig::default();
        let errors = config.apply_overrides(overrides(&[
            ("warm_up", "lots"),
            ("margin", "-1"),
            ("order", "random"),
        ]));

        assert_eq!(errors.len(), 3);
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn oversized_or_overflowing_patterns_are_ignored() {
        let mut config = ViewerConfig::default();
        let errors = config.apply_overrides(overrides(&[
            ("pattern", "day_{index}.glb"),
            ("start", &usize::MAX.to_string()),
            ("count", "2"),
        ]));
        assert_eq!(
            errors,
            [ConfigError::PatternOverflow {
                start: usize::MAX,
                count: 2,
            }]
        );

        let errors = config.apply_overrides(overrides(&[
            ("pattern", "day_{index}.glb"),
            ("count", &(MAX_PATTERN_COUNT + 1).to_string()),
        ]));
        assert_eq!(
            errors,
            [ConfigError::PatternTooLarge {
                count: MAX_PATTERN_COUNT + 1,
                max: MAX_PATTERN_COUNT,
            }]
        );
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn environment_maps_need_both_paths() {
        let mut config = ViewerConfig::default();
        let errors = config.apply_overrides(overrides(&[("env_diffuse", "env/diffuse.ktx2")]));
        assert_eq!(errors.len(), 1);
        assert_eq!(config.environment_maps, None);

        let errors = config.apply_overrides(overrides(&[
            ("env_diffuse", "env/diffuse.ktx2"),
            ("env_specular", "env/specular.ktx2"),
        ]));
        assert!(errors.is_empty());
        assert_eq!(
            config.environment_maps,
            Some(EnvironmentMapPaths {
                diffuse: "env/diffuse.ktx2".into(),
                specular: "env/specular.ktx2".into(),
            })
        );
    }

    #[test]
    fn pattern_source_needs_a_count() {
        let mut config = ViewerConfig::default();
        let errors = config.apply_overrides(overrides(&[("pattern", "day_{index}.glb")]));
        assert_eq!(errors.len(), 1);
        assert!(matches!(config.manifest_source, ManifestSource::Fetch { .. }));

        let errors = config.apply_overrides(overrides(&[
            ("pattern", "day_{index}.glb"),
            ("start", "0"),
            ("count", "4"),
        ]));
        assert!(errors.is_empty());
        assert_eq!(
            config.manifest_source,
            ManifestSource::Pattern {
                template: "day_{index}.glb".into(),
                start: 0,
                count: 4,
            }
        );
    }
}
