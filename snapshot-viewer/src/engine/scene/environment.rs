use bevy::core_pipeline::Skybox;
use bevy::prelude::*;
use bevy::render::render_resource::{TextureViewDescriptor, TextureViewDimension};
use constants::render_settings::{ENVIRONMENT_INTENSITY, SKYBOX_BRIGHTNESS};

const CUBE_FACES: u32 = 6;

/// Make a loaded backdrop image usable as a cube texture.
///
/// KTX2 cubemaps already carry six layers; a single 2D image must be six
/// square faces stacked vertically. Returns false when the image is neither.
pub fn prepare_cubemap(image: &mut Image) -> bool {
    let layers = image.texture_descriptor.size.depth_or_array_layers;
    if layers == 1 {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height != width * CUBE_FACES {
            return false;
        }
        image.reinterpret_stacked_2d_as_array(CUBE_FACES);
    } else if layers != CUBE_FACES {
        return false;
    }

    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    true
}

/// Prefiltered irradiance and radiance cubemaps for image-based lighting.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMaps {
    pub diffuse: Handle<Image>,
    pub specular: Handle<Image>,
}

/// Show the backdrop as the skybox and light the scene from `lighting`,
/// or from the raw backdrop when no prefiltered maps are available.
pub fn attach_backdrop(
    commands: &mut Commands,
    camera: Entity,
    backdrop: Handle<Image>,
    lighting: Option<EnvironmentMaps>,
) {
    let lighting = lighting.unwrap_or_else(|| EnvironmentMaps {
        diffuse: backdrop.clone(),
        specular: backdrop.clone(),
    });
    commands.entity(camera).insert((
        Skybox {
            image: backdrop,
            brightness: SKYBOX_BRIGHTNESS,
            ..default()
        },
        EnvironmentMapLight {
            diffuse_map: lighting.diffuse,
            specular_map: lighting.specular,
            intensity: ENVIRONMENT_INTENSITY,
            ..default()
        },
    ));
}
