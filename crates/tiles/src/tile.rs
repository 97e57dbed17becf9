//! Tile identity.
//!
//! A tile is the world-space anchor of one painted cell. Two tiles are the same
//! tile when their X and Z match approximately; Y only records the floor
//! height the tile was painted at.

use bevy::prelude::*;

/// World-space anchor of a painted cell.
pub type Tile = Vec3;

/// Smallest absolute tolerance, eight times the smallest subnormal `f32`.
const MIN_TOLERANCE: f32 = 1.1e-44;

/// Relative float comparison: equal within one millionth of the larger
/// magnitude. Values at or near zero must match (almost) exactly.
#[inline]
pub fn approximately(a: f32, b: f32) -> bool {
    (b - a).abs() < (1.0e-6 * a.abs().max(b.abs())).max(MIN_TOLERANCE)
}

/// True if `a` and `b` address the same grid cell (X/Z only).
#[inline]
pub fn same_cell(a: Vec3, b: Vec3) -> bool {
    approximately(a.x, b.x) && approximately(a.z, b.z)
}
