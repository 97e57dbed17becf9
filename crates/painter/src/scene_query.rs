//! Ray casts against `FloorCollider` entities.
//!
//! Colliders are snapshotted into the `ColliderScene` resource once per frame
//! so the core systems can cast against it without holding a query.

use bevy::math::bounding::{Aabb3d, RayCast3d};
use bevy::math::Vec3A;
use bevy::prelude::*;

use tiles::{GridConfig, RayHit, SceneQuery};

use crate::components::{FloorCollider, SceneLayer, SceneTag};

/// Tag given to colliders without a `SceneTag`.
pub const UNTAGGED: &str = "Untagged";

/// World-space box of one collider.
#[derive(Debug, Clone)]
pub struct ColliderBox {
    pub bounds: Aabb3d,
    pub layer: u8,
    pub tag: String,
}

impl ColliderBox {
    pub fn from_center(center: Vec3, half_extents: Vec3, layer: u8, tag: &str) -> Self {
        Self {
            bounds: Aabb3d::new(center, half_extents.abs()),
            layer,
            tag: tag.to_string(),
        }
    }

    /// Whether `point` lies strictly inside the box.
    fn encloses(&self, point: Vec3) -> bool {
        let point = Vec3A::from(point);
        point.cmpgt(self.bounds.min).all() && point.cmplt(self.bounds.max).all()
    }

    /// Entry distance of the ray into the box, if it enters within
    /// `max_distance`. Rays starting inside the box do not hit it.
    pub fn intersect(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        if self.encloses(origin) {
            return None;
        }
        let direction = Dir3::new(direction).ok()?;
        RayCast3d::new(origin, direction, max_distance).aabb_intersection_at(&self.bounds)
    }
}

/// Snapshot of every floor collider in the world.
#[derive(Resource, Debug, Clone, Default)]
pub struct ColliderScene {
    pub colliders: Vec<ColliderBox>,
}

impl ColliderScene {
    /// Nearest hit along the ray that the config does not ignore.
    pub fn closest_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        config: &GridConfig,
    ) -> Option<RayHit> {
        self.cast_ray(origin, direction, max_distance)
            .into_iter()
            .filter(|hit| !config.ignores(hit.layer, &hit.tag))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl SceneQuery for ColliderScene {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return Vec::new();
        }
        self.colliders
            .iter()
            .filter_map(|c| {
                c.intersect(origin, direction, max_distance).map(|distance| RayHit {
                    point: origin + direction * distance,
                    distance,
                    layer: c.layer,
                    tag: c.tag.clone(),
                })
            })
            .collect()
    }
}

/// Rebuild the collider snapshot from the current transforms.
pub fn refresh_collider_scene(
    colliders: Query<(
        &GlobalTransform,
        &FloorCollider,
        Option<&SceneLayer>,
        Option<&SceneTag>,
    )>,
    mut scene: ResMut<ColliderScene>,
) {
    scene.colliders.clear();
    for (transform, collider, layer, tag) in &colliders {
        let (scale, _, translation) = transform.to_scale_rotation_translation();
        scene.colliders.push(ColliderBox::from_center(
            translation,
            collider.half_extents * scale,
            layer.map_or(0, |l| l.0),
            tag.map_or(UNTAGGED, |t| t.0.as_str()),
        ));
    }
}
