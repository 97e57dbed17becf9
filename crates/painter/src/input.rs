//! Scene-view input: cursor picking, mouse buttons to `PaintInput`, and the
//! designer's keyboard shortcuts.

use bevy::prelude::*;

use tiles::config::RAYCAST_DISTANCE;
use tiles::grid_mapper::is_floor;
use tiles::{GridCommand, GridConfig, GridMapper, PaintInput};

use crate::scene_query::ColliderScene;

/// Held with the paint button to erase instead.
pub const ERASE_MODIFIER: KeyCode = KeyCode::ControlLeft;
pub const PAINT_BUTTON: MouseButton = MouseButton::Left;

pub const KEY_TOGGLE_DESIGNER: KeyCode = KeyCode::Tab;
pub const KEY_CLEAR: KeyCode = KeyCode::Delete;
pub const KEY_REBUILD: KeyCode = KeyCode::KeyR;
pub const KEY_SAVE: KeyCode = KeyCode::F5;
pub const KEY_BRUSH_UP: KeyCode = KeyCode::BracketRight;
pub const KEY_BRUSH_DOWN: KeyCode = KeyCode::BracketLeft;

/// What the pointer is over this frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct DesignerCursor {
    /// Closest non-ignored surface under the pointer.
    pub hit: Option<Vec3>,
    /// Grid cell under the pointer, at the floor height a tile there would
    /// get. `None` when the cell has no floor.
    pub cell: Option<Vec3>,
}

/// Resolve a pointer ray against the scene.
pub fn locate_cursor(
    origin: Vec3,
    direction: Vec3,
    scene: &ColliderScene,
    config: &GridConfig,
) -> DesignerCursor {
    let Some(hit) = scene.closest_hit(origin, direction, RAYCAST_DISTANCE, config) else {
        return DesignerCursor::default();
    };
    let mapper = GridMapper::new(config);
    let aligned = mapper.align(hit.point);
    let floor = mapper.probe_floor_height(aligned, scene);
    DesignerCursor {
        hit: Some(hit.point),
        cell: is_floor(floor)
            .then(|| Vec3::new(aligned.x, mapper.snap_vertical(floor), aligned.z)),
    }
}

/// Camera ray through the window cursor, if the cursor is over the window.
fn cursor_ray(
    windows: &Query<&Window>,
    camera_q: &Query<(&Camera, &GlobalTransform), With<Camera3d>>,
) -> Option<Ray3d> {
    let window = windows.get_single().ok()?;
    let (camera, cam_transform) = camera_q.get_single().ok()?;
    let screen_pos = window.cursor_position()?;
    camera.viewport_to_world(cam_transform, screen_pos).ok()
}

pub fn update_designer_cursor(
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    scene: Res<ColliderScene>,
    config: Res<GridConfig>,
    mut cursor: ResMut<DesignerCursor>,
) {
    let located = cursor_ray(&windows, &camera_q)
        .map(|ray| locate_cursor(ray.origin, *ray.direction, &scene, &config))
        .unwrap_or_default();
    if *cursor != located {
        *cursor = located;
    }
}

/// Translate the paint button into `PaintInput` events.
///
/// A press over a surface starts a stroke; while held, a `Moved` is sent each
/// time the pointer enters a new cell.
pub fn emit_paint_input(
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    cursor: Res<DesignerCursor>,
    config: Res<GridConfig>,
    mut last_cell: Local<Option<Vec3>>,
    mut inputs: EventWriter<PaintInput>,
) {
    if !config.enabled {
        *last_cell = None;
        return;
    }

    if let Some(point) = cursor.hit {
        let cell = GridMapper::new(&config).align(point);
        if buttons.just_pressed(PAINT_BUTTON) {
            inputs.send(PaintInput::Pressed {
                point,
                modifier: keys.pressed(ERASE_MODIFIER),
            });
            *last_cell = Some(cell);
        } else if buttons.pressed(PAINT_BUTTON) && *last_cell != Some(cell) {
            inputs.send(PaintInput::Moved { point });
            *last_cell = Some(cell);
        }
    }

    if buttons.just_released(PAINT_BUTTON) {
        inputs.send(PaintInput::Released);
        *last_cell = None;
    }
}

/// Tab toggles the designer; the other shortcuts only work while it is on.
pub fn designer_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    mut config: ResMut<GridConfig>,
    mut commands: EventWriter<GridCommand>,
) {
    if keys.just_pressed(KEY_TOGGLE_DESIGNER) {
        config.enabled = !config.enabled;
        info!(
            "Grid designer {}",
            if config.enabled { "enabled" } else { "disabled" }
        );
    }
    if !config.enabled {
        return;
    }

    if keys.just_pressed(KEY_CLEAR) {
        commands.send(GridCommand::Clear);
    }
    if keys.just_pressed(KEY_REBUILD) {
        commands.send(GridCommand::Rebuild);
    }
    if keys.just_pressed(KEY_SAVE) {
        commands.send(GridCommand::Save);
    }
    if keys.just_pressed(KEY_BRUSH_UP) {
        config.grow_brush();
        info!("Brush size {}", config.brush_label());
    }
    if keys.just_pressed(KEY_BRUSH_DOWN) {
        config.shrink_brush();
        info!("Brush size {}", config.brush_label());
    }
}
