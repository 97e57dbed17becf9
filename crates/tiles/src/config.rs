use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid_mapper::is_ignored_hit;

/// Height above a point at which the downward floor probe starts.
pub const RAYCAST_HEIGHT: f32 = 50.0;
/// Maximum length of the floor probe and of cursor picking rays.
pub const RAYCAST_DISTANCE: f32 = 100.0;
/// Sentinel returned by the floor probe when nothing supports the point.
pub const Y_OFFSCREEN: f32 = -10_000.0;

/// Tag carried by the brush cursor. Never treated as a floor.
pub const BRUSH_TAG: &str = "Brush";
/// Vertical lift of the brush cursor above the floor so it doesn't z-fight
/// with painted tiles.
pub const BRUSH_OFFSET: f32 = 0.02;

/// Brush side lengths in cells, indexed by `GridConfig::brush_index`.
pub const BRUSH_SCALES: [u32; 8] = [1, 3, 5, 7, 9, 11, 13, 15];
pub const MAX_BRUSH_INDEX: usize = BRUSH_SCALES.len() - 1;

pub const DEFAULT_TILE_SIZE: f32 = 1.0;
pub const DEFAULT_TILE_SCALE: f32 = 0.95;
pub const DEFAULT_Y_OFFSET: f32 = 0.01;

/// 32-bit physics-style layer mask. Bit `n` set means layer `n` is included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);

    pub fn from_layers(layers: &[u8]) -> Self {
        let mut mask = LayerMask::NONE;
        for &layer in layers {
            mask.insert(layer);
        }
        mask
    }

    #[inline]
    pub fn contains(self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }

    pub fn insert(&mut self, layer: u8) {
        if layer < 32 {
            self.0 |= 1 << layer;
        }
    }

    pub fn remove(&mut self, layer: u8) {
        if layer < 32 {
            self.0 &= !(1 << layer);
        }
    }
}

/// Settings of the grid instance being edited.
///
/// Read by the grid mapper (pitch, vertical snapping, probe filter) and by the
/// mesh builder (scale, vertical offset). Missing fields in serialized form
/// fall back to the defaults below.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// When false the designer ignores scene input.
    pub enabled: bool,
    /// World units between adjacent cells (the pitch).
    pub tile_size: f32,
    /// Side length of a rendered quad. Quads are drawn with half-extent
    /// `tile_scale / 2`, so values below `tile_size` leave visible gaps.
    pub tile_scale: f32,
    /// Lift applied to rendered quads above the probed floor.
    pub y_offset: f32,
    /// Brush radius: 0 => 1x1, 1 => 3x3, ... 7 => 15x15.
    pub brush_index: usize,
    /// Snap the floor height to the pitch as well.
    pub align_y: bool,
    /// Hits on objects with any of these tags are ignored by the floor probe.
    pub ignored_tags: Vec<String>,
    /// Hits on objects in any of these layers are ignored by the floor probe.
    pub ignored_layers: LayerMask,
    /// Spawn the tile mesh hidden (play-mode view of a designed level).
    pub hide_mesh_at_runtime: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tile_size: DEFAULT_TILE_SIZE,
            tile_scale: DEFAULT_TILE_SCALE,
            y_offset: DEFAULT_Y_OFFSET,
            brush_index: 0,
            align_y: false,
            ignored_tags: Vec::new(),
            ignored_layers: LayerMask::NONE,
            hide_mesh_at_runtime: false,
        }
    }
}

impl GridConfig {
    /// Half the side length of a rendered quad.
    pub fn half_extent(&self) -> f32 {
        self.tile_scale / 2.0
    }

    /// Brush radius in cells, clamped to the supported range.
    pub fn brush_radius(&self) -> i32 {
        self.brush_index.min(MAX_BRUSH_INDEX) as i32
    }

    /// Side length of the brush in cells.
    pub fn brush_scale(&self) -> u32 {
        BRUSH_SCALES[self.brush_index.min(MAX_BRUSH_INDEX)]
    }

    /// Human-readable brush label: the number of cells covered, e.g. "9".
    pub fn brush_label(&self) -> String {
        let side = self.brush_scale();
        (side * side).to_string()
    }

    /// World-space side length of the brush cursor.
    pub fn brush_world_size(&self) -> f32 {
        self.tile_size * self.brush_scale() as f32
    }

    /// Grow the brush by one step, stopping at the largest size.
    pub fn grow_brush(&mut self) {
        self.brush_index = (self.brush_index + 1).min(MAX_BRUSH_INDEX);
    }

    /// Shrink the brush by one step, stopping at 1x1.
    pub fn shrink_brush(&mut self) {
        self.brush_index = self.brush_index.saturating_sub(1);
    }

    /// Whether a probe hit on `layer` / `tag` should be skipped.
    pub fn ignores(&self, layer: u8, tag: &str) -> bool {
        is_ignored_hit(layer, tag, self.ignored_layers, &self.ignored_tags)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        if !self.tile_scale.is_finite() || self.tile_scale <= 0.0 {
            return Err(ConfigError::InvalidTileScale(self.tile_scale));
        }
        if !self.y_offset.is_finite() {
            return Err(ConfigError::InvalidYOffset(self.y_offset));
        }
        if self.brush_index > MAX_BRUSH_INDEX {
            return Err(ConfigError::BrushIndexOutOfRange(self.brush_index));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: GridConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
