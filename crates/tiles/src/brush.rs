use bevy::prelude::*;

use crate::grid_mapper::align_to_grid;

/// Cell anchors covered by a brush of `radius` centred on `center`.
///
/// Yields `(2r+1)^2` positions spaced by `pitch`, X outer and Z inner, all at
/// the centre's height. Every cell is snapped onto the grid, so a cell gets
/// the same coordinates whichever brush centre reached it.
pub fn brush_cells(center: Vec3, pitch: f32, radius: i32) -> Vec<Vec3> {
    let radius = radius.max(0);
    let side = (2 * radius + 1) as usize;
    let mut cells = Vec::with_capacity(side * side);
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            let offset = Vec3::new(
                center.x + dx as f32 * pitch,
                center.y,
                center.z + dz as f32 * pitch,
            );
            cells.push(align_to_grid(offset, pitch));
        }
    }
    cells
}
