use std::marker::PhantomData;

use bevy::prelude::*;

pub mod brush;
pub mod config;
pub mod error;
pub mod grid_mapper;
pub mod invariants;
pub mod mesh_builder;
pub mod paint_tool;
pub mod tile;
pub mod tile_file;
pub mod tile_grid;
pub mod tile_set;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use config::{GridConfig, LayerMask};
pub use error::{ConfigError, TileFileError, TileMeshError};
pub use grid_mapper::{
    align_to_grid, probe_floor_height, snap_vertical, GridMapper, RayHit, SceneQuery,
};
pub use invariants::{check_tile_mesh_invariants, InvariantViolation, TileMeshViolations};
pub use mesh_builder::{MeshSink, TileMeshBuilder};
pub use paint_tool::{BrushStroke, PaintInput, PaintTool, PaintToolState, StrokeMode};
pub use tile::Tile;
pub use tile_file::{load_grid, load_tiles, save_tiles, TileFile};
pub use tile_grid::{CellOutcome, CycleReport, TileGrid};
pub use tile_set::{TileSet, TileStore};

/// Whole-grid edits requested by the host.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCommand {
    /// Remove every tile and empty the mesh.
    Clear,
    /// Redraw all tiles with the current scale and vertical offset.
    Rebuild,
    /// Write the tiles to the session's `TileFile`.
    Save,
}

/// Ordered phases of a designer frame in the `Update` schedule.
///
/// Configured as a chain: `Input` → `Apply` → `Commit`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TilesSet {
    /// Host input translated into `PaintInput` / `GridCommand` events.
    Input,
    /// Paint tool advanced, strokes and commands applied to the grid.
    Apply,
    /// Mesh pushed to the renderer and invariants checked.
    Commit,
}

/// Turn pointer input into brush strokes. Input is dropped while the
/// designer is disabled.
pub fn advance_paint_tool(
    mut inputs: EventReader<PaintInput>,
    mut tool: ResMut<PaintTool>,
    config: Res<GridConfig>,
    mut strokes: EventWriter<BrushStroke>,
) {
    for input in inputs.read() {
        if !config.enabled {
            if tool.is_active() {
                tool.reset();
            }
            continue;
        }
        if let Some(stroke) = tool.handle(*input, &config) {
            strokes.send(stroke);
        }
    }
}

/// Apply every pending brush stroke to the grid, probing floors in `Q`.
pub fn apply_brush_strokes<Q: SceneQuery + Resource>(
    mut strokes: EventReader<BrushStroke>,
    config: Res<GridConfig>,
    scene: Res<Q>,
    mut grid: ResMut<TileGrid>,
) {
    for stroke in strokes.read() {
        match stroke.mode {
            StrokeMode::Paint => match grid.paint(stroke.center, &config, &*scene) {
                Ok(report) => debug!(
                    "Paint cycle at {}: {} added, {} already painted, {} without floor",
                    stroke.center, report.added, report.unchanged, report.skipped_no_floor
                ),
                Err(e) => {
                    warn!("Paint cycle at {} aborted: {e}", stroke.center);
                    return;
                }
            },
            StrokeMode::Erase => {
                let report = grid.erase(stroke.center, &config);
                debug!(
                    "Erase cycle at {}: {} removed, {} empty",
                    stroke.center, report.removed, report.unchanged
                );
            }
        }
    }
}

pub fn handle_grid_commands(
    mut commands: EventReader<GridCommand>,
    config: Res<GridConfig>,
    tile_file: Option<Res<TileFile>>,
    mut grid: ResMut<TileGrid>,
) {
    for command in commands.read() {
        match command {
            GridCommand::Clear => {
                let removed = grid.tile_count();
                grid.clear();
                info!("Cleared grid ({removed} tiles removed)");
            }
            GridCommand::Rebuild => match grid.rebuild(&config) {
                Ok(()) => info!(
                    "Rebuilt grid mesh: {} tiles at scale {} offset {}",
                    grid.tile_count(),
                    config.tile_scale,
                    config.y_offset
                ),
                Err(e) => warn!("Grid rebuild failed: {e}"),
            },
            GridCommand::Save => {
                let Some(file) = tile_file.as_deref() else {
                    warn!("No tile file configured, tiles not saved");
                    continue;
                };
                match save_tiles(grid.tiles(), &file.path) {
                    Ok(()) => info!(
                        "Saved {} tiles to {}",
                        grid.tile_count(),
                        file.path.display()
                    ),
                    Err(e) => warn!("Could not save tiles to {}: {e}", file.path.display()),
                }
            }
        }
    }
}

/// Core designer plugin: config, grid, paint tool and their systems.
///
/// `Q` is the scene the floor probe casts against. It is initialised from
/// `Default` unless the host inserted it first; the same applies to
/// `GridConfig` and `TileGrid`. Without a host `TileGrid`, the grid starts
/// from the tiles saved in `TileFile` when that resource is present.
pub struct TilesPlugin<Q> {
    marker: PhantomData<fn() -> Q>,
}

impl<Q> Default for TilesPlugin<Q> {
    fn default() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<Q: SceneQuery + Resource + Default> Plugin for TilesPlugin<Q> {
    fn build(&self, app: &mut App) {
        app.init_resource::<GridConfig>();
        if !app.world().contains_resource::<TileGrid>() {
            let world = app.world();
            let grid = tile_file::initial_grid(
                world.get_resource::<TileFile>(),
                world.resource::<GridConfig>(),
            );
            app.insert_resource(grid);
        }

        app.init_resource::<PaintTool>()
            .init_resource::<TileMeshViolations>()
            .init_resource::<Q>()
            .add_event::<PaintInput>()
            .add_event::<BrushStroke>()
            .add_event::<GridCommand>()
            .configure_sets(
                Update,
                (TilesSet::Input, TilesSet::Apply, TilesSet::Commit).chain(),
            )
            .add_systems(
                Update,
                (
                    handle_grid_commands,
                    advance_paint_tool,
                    apply_brush_strokes::<Q>,
                )
                    .chain()
                    .in_set(TilesSet::Apply),
            )
            .add_systems(
                Update,
                invariants::validate_tile_mesh.in_set(TilesSet::Commit),
            );
    }
}
