//! World point → grid cell mapping and floor probing.

use bevy::prelude::*;

use crate::config::{
    GridConfig, LayerMask, BRUSH_TAG, RAYCAST_DISTANCE, RAYCAST_HEIGHT, Y_OFFSCREEN,
};

/// One intersection reported by a scene ray cast.
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
    pub layer: u8,
    pub tag: String,
}

/// Ray casts against the host scene.
pub trait SceneQuery {
    /// Every intersection of the ray within `max_distance`, in any order.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit>;
}

/// Round `v` to the nearest multiple of `pitch`, ties to even.
#[inline]
fn round_to_pitch(v: f32, pitch: f32) -> f32 {
    let inv = 1.0 / pitch;
    (v * inv).round_ties_even() / inv
}

/// Snap X and Z to the nearest multiple of `pitch`. Y is passed through.
pub fn align_to_grid(point: Vec3, pitch: f32) -> Vec3 {
    Vec3::new(
        round_to_pitch(point.x, pitch),
        point.y,
        round_to_pitch(point.z, pitch),
    )
}

/// Snap `y` to the nearest multiple of `pitch` when vertical snapping is on.
pub fn snap_vertical(y: f32, pitch: f32, enabled: bool) -> f32 {
    if enabled {
        round_to_pitch(y, pitch)
    } else {
        y
    }
}

/// Whether a hit on `layer` / `tag` is excluded from floor probing. The
/// brush cursor is always excluded.
pub fn is_ignored_hit(
    layer: u8,
    tag: &str,
    ignored_layers: LayerMask,
    ignored_tags: &[String],
) -> bool {
    tag == BRUSH_TAG
        || ignored_layers.contains(layer)
        || ignored_tags.iter().any(|t| t == tag)
}

/// Height of the highest surface under `point`, or `Y_OFFSCREEN`.
///
/// Casts from `RAYCAST_HEIGHT` above the point straight down for
/// `RAYCAST_DISTANCE`, skipping hits on ignored layers, ignored tags and the
/// brush cursor.
pub fn probe_floor_height(
    point: Vec3,
    scene: &impl SceneQuery,
    ignored_layers: LayerMask,
    ignored_tags: &[String],
) -> f32 {
    let origin = point + Vec3::Y * RAYCAST_HEIGHT;
    scene
        .cast_ray(origin, Vec3::NEG_Y, RAYCAST_DISTANCE)
        .into_iter()
        .filter(|hit| !is_ignored_hit(hit.layer, &hit.tag, ignored_layers, ignored_tags))
        .fold(Y_OFFSCREEN, |max_y, hit| max_y.max(hit.point.y))
}

/// False for the `Y_OFFSCREEN` sentinel returned when no floor was found.
#[inline]
pub fn is_floor(height: f32) -> bool {
    height > Y_OFFSCREEN
}

/// Grid mapping bound to a particular config.
#[derive(Debug, Clone, Copy)]
pub struct GridMapper<'a> {
    config: &'a GridConfig,
}

impl<'a> GridMapper<'a> {
    pub fn new(config: &'a GridConfig) -> Self {
        Self { config }
    }

    /// Align X/Z to the pitch and snap Y if vertical snapping is enabled.
    pub fn align(&self, point: Vec3) -> Vec3 {
        let aligned = align_to_grid(point, self.config.tile_size);
        Vec3::new(aligned.x, self.snap_vertical(point.y), aligned.z)
    }

    pub fn snap_vertical(&self, y: f32) -> f32 {
        snap_vertical(y, self.config.tile_size, self.config.align_y)
    }

    pub fn probe_floor_height(&self, point: Vec3, scene: &impl SceneQuery) -> f32 {
        probe_floor_height(
            point,
            scene,
            self.config.ignored_layers,
            &self.config.ignored_tags,
        )
    }
}
