use bevy::prelude::*;

use tiles::config::BRUSH_OFFSET;
use tiles::GridConfig;

use crate::input::DesignerCursor;

pub const BRUSH_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.8);
pub const ERASE_BRUSH_COLOR: Color = Color::srgba(0.9, 0.15, 0.1, 0.8);

/// Corners of the brush square around `cell`, lifted just above the floor.
pub fn brush_outline(cell: Vec3, size: f32) -> [Vec3; 4] {
    let half = size / 2.0;
    let y = cell.y + BRUSH_OFFSET;
    [
        Vec3::new(cell.x - half, y, cell.z - half),
        Vec3::new(cell.x + half, y, cell.z - half),
        Vec3::new(cell.x + half, y, cell.z + half),
        Vec3::new(cell.x - half, y, cell.z + half),
    ]
}

/// Outline the cells the next stroke would touch.
pub fn draw_brush_cursor(
    cursor: Res<DesignerCursor>,
    config: Res<GridConfig>,
    keys: Res<ButtonInput<KeyCode>>,
    mut gizmos: Gizmos,
) {
    if !config.enabled {
        return;
    }
    let Some(cell) = cursor.cell else {
        return;
    };
    let color = if keys.pressed(crate::input::ERASE_MODIFIER) {
        ERASE_BRUSH_COLOR
    } else {
        BRUSH_COLOR
    };
    let corners = brush_outline(cell, config.brush_world_size());
    for i in 0..4 {
        gizmos.line(corners[i], corners[(i + 1) % 4], color);
    }
}
