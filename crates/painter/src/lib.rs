//! Bevy scene-view integration for the grid designer: picks the cell under
//! the mouse, turns clicks and drags into paint input, draws the brush and
//! keeps the tile mesh asset up to date.

use bevy::prelude::*;

pub mod brush_preview;
pub mod components;
pub mod input;
pub mod mesh_sync;
pub mod scene_query;

pub use components::{FloorCollider, SceneLayer, SceneTag, TileMeshEntity};
pub use input::DesignerCursor;
pub use scene_query::ColliderScene;

use tiles::{TilesPlugin, TilesSet};

pub struct GridDesignerPlugin;

impl Plugin for GridDesignerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(TilesPlugin::<ColliderScene>::default());

        app.init_resource::<DesignerCursor>()
            .add_systems(Startup, mesh_sync::spawn_tile_mesh)
            .add_systems(
                Update,
                (
                    scene_query::refresh_collider_scene,
                    input::update_designer_cursor,
                    input::designer_shortcuts,
                    input::emit_paint_input,
                )
                    .chain()
                    .in_set(TilesSet::Input),
            )
            .add_systems(
                Update,
                (
                    mesh_sync::commit_tile_mesh,
                    mesh_sync::sync_tile_mesh_visibility,
                )
                    .in_set(TilesSet::Commit),
            )
            .add_systems(
                Update,
                brush_preview::draw_brush_cursor.after(TilesSet::Input),
            );
    }
}
