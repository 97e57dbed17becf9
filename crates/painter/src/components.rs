use bevy::prelude::*;

/// Axis-aligned box the floor probe and cursor ray can hit.
///
/// The box is centred on the entity's global translation and scaled by its
/// global scale. Rotation is ignored.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct FloorCollider {
    pub half_extents: Vec3,
}

impl FloorCollider {
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }

    /// Box of the given full size.
    pub fn from_size(size: Vec3) -> Self {
        Self::new(size / 2.0)
    }
}

/// Physics-style layer of a collider (0..32). Colliders without one are on
/// layer 0.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneLayer(pub u8);

/// Tag of a collider, matched against `GridConfig::ignored_tags`.
#[derive(Component, Debug, Clone, PartialEq, Eq, Default)]
pub struct SceneTag(pub String);

impl SceneTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

/// Marker for the entity rendering the tile mesh.
#[derive(Component, Debug, Default)]
pub struct TileMeshEntity;
