use bevy::prelude::*;
use bevy::render::primitives::Aabb;

/// Axis-aligned world-space extents of one or more snapshots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl SceneBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// World-space bounds of a mesh's local AABB under its global transform.
    /// All eight corners are transformed so rotated meshes stay enclosed.
    pub fn from_aabb(aabb: &Aabb, transform: &GlobalTransform) -> Self {
        let center = Vec3::from(aabb.center);
        let half = Vec3::from(aabb.half_extents);

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in 0..8 {
            let sign = Vec3::new(
                if corner & 1 == 0 { -1.0 } else { 1.0 },
                if corner & 2 == 0 { -1.0 } else { 1.0 },
                if corner & 4 == 0 { -1.0 } else { 1.0 },
            );
            let world = transform.transform_point(center + half * sign);
            min = min.min(world);
            max = max.max(world);
        }
        Self { min, max }
    }

    pub fn union(&self, other: &SceneBounds) -> SceneBounds {
        SceneBounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Union of every item, `None` for an empty iterator.
    pub fn union_all(bounds: impl IntoIterator<Item = SceneBounds>) -> Option<SceneBounds> {
        bounds.into_iter().reduce(|acc, next| acc.union(&next))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }
}
