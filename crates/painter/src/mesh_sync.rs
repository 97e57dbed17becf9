//! Keeps the rendered tile mesh in step with `TileGrid`.
//!
//! A single entity owns the mesh asset. After strokes and commands have been
//! applied, a dirty grid is written into the asset in place, once per frame.

use bevy::prelude::*;

use tiles::{GridConfig, TileGrid};

use crate::components::TileMeshEntity;

/// Base colour of the painted tiles.
pub const TILE_COLOR: Color = Color::srgb(0.25, 0.6, 0.85);

/// Handle of the tile mesh asset.
#[derive(Resource, Debug, Clone)]
pub struct TileMeshHandle(pub Handle<Mesh>);

/// Whether the tile mesh should currently be drawn. Hidden in play mode
/// (designer disabled) when `hide_mesh_at_runtime` is set.
pub fn tile_mesh_visibility(config: &GridConfig) -> Visibility {
    if config.hide_mesh_at_runtime && !config.enabled {
        Visibility::Hidden
    } else {
        Visibility::Inherited
    }
}

pub fn spawn_tile_mesh(
    mut commands: Commands,
    grid: Res<TileGrid>,
    config: Res<GridConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let handle = meshes.add(grid.mesh().to_mesh());
    let mut entity = commands.spawn((
        TileMeshEntity,
        Mesh3d(handle.clone()),
        Transform::default(),
        tile_mesh_visibility(&config),
    ));
    if let Some(mut materials) = materials {
        entity.insert(MeshMaterial3d(materials.add(StandardMaterial {
            base_color: TILE_COLOR,
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        })));
    }
    commands.insert_resource(TileMeshHandle(handle));
    info!("Spawned tile mesh with {} tiles", grid.tile_count());
}

/// Write the grid's buffers into the mesh asset if they changed.
pub fn commit_tile_mesh(
    mut grid: ResMut<TileGrid>,
    handle: Option<Res<TileMeshHandle>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Some(handle) = handle else {
        return;
    };
    // Peek first so the resource isn't flagged as changed every frame.
    if !grid.is_dirty() {
        return;
    }
    grid.take_dirty();
    let Some(mesh) = meshes.get_mut(&handle.0) else {
        warn!("Tile mesh asset missing; dropping update");
        return;
    };
    grid.mesh().write_to(mesh);
    debug!(
        "Committed tile mesh: {} quads, {} indices",
        grid.mesh().quad_count(),
        grid.mesh().indices().len()
    );
}

/// Re-apply the runtime visibility rule when the config changes.
pub fn sync_tile_mesh_visibility(
    config: Res<GridConfig>,
    mut query: Query<&mut Visibility, With<TileMeshEntity>>,
) {
    if !config.is_changed() {
        return;
    }
    let wanted = tile_mesh_visibility(&config);
    for mut visibility in &mut query {
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
}
