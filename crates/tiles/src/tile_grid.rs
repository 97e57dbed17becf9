//! The grid instance being edited: painted tiles plus their mesh.

use bevy::prelude::*;

use crate::brush::brush_cells;
use crate::config::GridConfig;
use crate::error::TileMeshError;
use crate::grid_mapper::{is_floor, GridMapper, SceneQuery};
use crate::mesh_builder::TileMeshBuilder;
use crate::tile_set::TileSet;

/// What happened to a single cell during a brush cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOutcome {
    Added,
    Removed,
    /// Nothing under the cell to stand a tile on.
    NoFloor,
    /// Already painted (paint) or not painted (erase).
    Unchanged,
}

/// Tally of one brush cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub added: usize,
    pub removed: usize,
    pub skipped_no_floor: usize,
    pub unchanged: usize,
}

impl CycleReport {
    fn record(&mut self, outcome: CellOutcome) {
        match outcome {
            CellOutcome::Added => self.added += 1,
            CellOutcome::Removed => self.removed += 1,
            CellOutcome::NoFloor => self.skipped_no_floor += 1,
            CellOutcome::Unchanged => self.unchanged += 1,
        }
    }

    pub fn changed(&self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

/// Painted tiles and the mesh drawn for them, kept in index correspondence.
#[derive(Resource, Debug, Default)]
pub struct TileGrid {
    tiles: TileSet,
    mesh: TileMeshBuilder,
    dirty: bool,
}

impl TileGrid {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            tiles: TileSet::new(),
            mesh: TileMeshBuilder::new(config.half_extent()),
            dirty: false,
        }
    }

    /// Grid over previously painted tiles, with the mesh redrawn for them.
    pub fn from_tiles(tiles: TileSet, config: &GridConfig) -> Result<Self, TileMeshError> {
        let mut grid = Self {
            tiles,
            mesh: TileMeshBuilder::new(config.half_extent()),
            dirty: false,
        };
        grid.rebuild(config)?;
        Ok(grid)
    }

    /// Assemble a grid from parts that may disagree, for invariant tests.
    #[cfg(test)]
    pub(crate) fn from_parts(tiles: TileSet, mesh: TileMeshBuilder) -> Self {
        Self {
            tiles,
            mesh,
            dirty: true,
        }
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub fn mesh(&self) -> &TileMeshBuilder {
        &self.mesh
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn contains_tile_at(&self, position: Vec3) -> bool {
        self.tiles.contains(position)
    }

    /// True if the mesh changed since the last `take_dirty`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and reset the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Paint one cell: find the floor under it and, if the cell is empty,
    /// store the tile and draw its quad.
    pub fn paint_cell(
        &mut self,
        position: Vec3,
        config: &GridConfig,
        scene: &impl SceneQuery,
    ) -> Result<CellOutcome, TileMeshError> {
        let mapper = GridMapper::new(config);
        let floor = mapper.probe_floor_height(position, scene);
        if !is_floor(floor) {
            return Ok(CellOutcome::NoFloor);
        }
        let tile = Vec3::new(position.x, mapper.snap_vertical(floor), position.z);
        if self.tiles.contains(tile) {
            return Ok(CellOutcome::Unchanged);
        }
        // Draw first so a failed allocation leaves tiles and quads in step.
        self.mesh.add_quad(tile, config.y_offset)?;
        self.tiles.append(tile);
        self.dirty = true;
        Ok(CellOutcome::Added)
    }

    /// Erase one cell if it holds a tile.
    pub fn erase_cell(&mut self, position: Vec3) -> CellOutcome {
        if self.tiles.remove_at(position).is_none() {
            return CellOutcome::Unchanged;
        }
        if !self.mesh.remove_quad(position) {
            warn!("Erased tile at {position} had no quad; mesh is out of step with tiles");
        }
        self.dirty = true;
        CellOutcome::Removed
    }

    /// Paint every cell under the brush centred on `center`.
    pub fn paint(
        &mut self,
        center: Vec3,
        config: &GridConfig,
        scene: &impl SceneQuery,
    ) -> Result<CycleReport, TileMeshError> {
        let mut report = CycleReport::default();
        for cell in brush_cells(center, config.tile_size, config.brush_radius()) {
            report.record(self.paint_cell(cell, config, scene)?);
        }
        Ok(report)
    }

    /// Erase every cell under the brush centred on `center`.
    pub fn erase(&mut self, center: Vec3, config: &GridConfig) -> CycleReport {
        let mut report = CycleReport::default();
        for cell in brush_cells(center, config.tile_size, config.brush_radius()) {
            report.record(self.erase_cell(cell));
        }
        report
    }

    /// Drop all tiles and empty the mesh.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.mesh.clear();
        self.dirty = true;
    }

    /// Redraw every stored tile with the current scale and offset.
    pub fn rebuild(&mut self, config: &GridConfig) -> Result<(), TileMeshError> {
        let mut mesh = TileMeshBuilder::new(config.half_extent());
        for tile in self.tiles.iter() {
            mesh.add_quad(tile, config.y_offset)?;
        }
        self.mesh = mesh;
        self.dirty = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_mapper::RayHit;

    /// Infinite floor at a fixed height.
    struct FlatFloor(f32);

    impl SceneQuery for FlatFloor {
        fn cast_ray(&self, origin: Vec3, _direction: Vec3, max_distance: f32) -> Vec<RayHit> {
            let distance = origin.y - self.0;
            if (0.0..=max_distance).contains(&distance) {
                vec![RayHit {
                    point: Vec3::new(origin.x, self.0, origin.z),
                    distance,
                    layer: 0,
                    tag: "Untagged".to_string(),
                }]
            } else {
                Vec::new()
            }
        }
    }

    struct Void;

    impl SceneQuery for Void {
        fn cast_ray(&self, _: Vec3, _: Vec3, _: f32) -> Vec<RayHit> {
            Vec::new()
        }
    }

    fn unit_config() -> GridConfig {
        GridConfig {
            tile_size: 1.0,
            tile_scale: 1.0,
            y_offset: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_paint_cell_adds_tile_and_quad() {
        let config = unit_config();
        let mut grid = TileGrid::new(&config);
        let outcome = grid.paint_cell(Vec3::ZERO, &config, &FlatFloor(0.0)).unwrap();
        assert_eq!(outcome, CellOutcome::Added);
        assert_eq!(grid.tile_count(), 1);
        assert_eq!(grid.mesh().quad_count(), 1);
        assert!(grid.is_dirty());
    }

    #[test]
    fn test_paint_cell_uses_floor_height() {
        let config = unit_config();
        let mut grid = TileGrid::new(&config);
        grid.paint_cell(Vec3::new(1.0, 0.0, 1.0), &config, &FlatFloor(2.25))
            .unwrap();
        assert_eq!(grid.tiles().get(0), Some(Vec3::new(1.0, 2.25, 1.0)));
    }

    #[test]
    fn test_paint_cell_snaps_floor_height_when_aligned() {
        let config = GridConfig {
            align_y: true,
            ..unit_config()
        };
        let mut grid = TileGrid::new(&config);
        grid.paint_cell(Vec3::ZERO, &config, &FlatFloor(2.25)).unwrap();
        assert_eq!(grid.tiles().get(0), Some(Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_paint_cell_without_floor_is_skipped() {
        let config = unit_config();
        let mut grid = TileGrid::new(&config);
        let outcome = grid.paint_cell(Vec3::ZERO, &config, &Void).unwrap();
        assert_eq!(outcome, CellOutcome::NoFloor);
        assert_eq!(grid.tile_count(), 0);
        assert!(!grid.is_dirty());
    }

    #[test]
    fn test_paint_cell_twice_is_unchanged() {
        let config = unit_config();
        let mut grid = TileGrid::new(&config);
        grid.paint_cell(Vec3::ZERO, &config, &FlatFloor(0.0)).unwrap();
        let outcome = grid.paint_cell(Vec3::ZERO, &config, &FlatFloor(0.0)).unwrap();
        assert_eq!(outcome, CellOutcome::Unchanged);
        assert_eq!(grid.tile_count(), 1);
        assert_eq!(grid.mesh().quad_count(), 1);
    }

    #[test]
    fn test_erase_missing_cell_is_unchanged() {
        let config = unit_config();
        let mut grid = TileGrid::new(&config);
        assert_eq!(grid.erase_cell(Vec3::ZERO), CellOutcome::Unchanged);
        assert!(!grid.is_dirty());
    }

    #[test]
    fn test_erase_tile_without_quad_still_removes_tile() {
        let mut tiles = TileSet::new();
        tiles.append(Vec3::X);
        let mut mesh = TileMeshBuilder::new(0.5);
        mesh.add_quad(Vec3::ZERO, 0.0).unwrap();
        let mut grid = TileGrid::from_parts(tiles, mesh);

        assert_eq!(grid.erase_cell(Vec3::X), CellOutcome::Removed);
        assert_eq!(grid.tile_count(), 0);
        // The stray quad is left for the invariant check to report.
        assert_eq!(grid.mesh().quad_count(), 1);
        assert!(!crate::invariants::check_tile_mesh_invariants(&grid).is_empty());
    }

    #[test]
    fn test_three_tiles_then_erase_middle() {
        let config = unit_config();
        let mut grid = TileGrid::new(&config);
        let floor = FlatFloor(0.0);
        grid.paint_cell(Vec3::new(0.0, 0.0, 0.0), &config, &floor).unwrap();
        grid.paint_cell(Vec3::new(1.0, 0.0, 0.0), &config, &floor).unwrap();
        grid.paint_cell(Vec3::new(0.0, 0.0, 1.0), &config, &floor).unwrap();
        assert_eq!(grid.tile_count(), 3);
        assert_eq!(grid.mesh().positions().len(), 12);
        assert_eq!(grid.mesh().indices().len(), 18);

        assert_eq!(grid.erase_cell(Vec3::new(1.0, 0.0, 0.0)), CellOutcome::Removed);
        assert_eq!(grid.tile_count(), 2);
        assert_eq!(grid.mesh().positions().len(), 8);
        assert!(grid.mesh().indices().iter().all(|&i| i < 8));

        // Quad blocks still line up with the remaining tiles.
        let p = grid.mesh().positions();
        assert_eq!(p[0], [0.5, 0.0, 0.5]);
        assert_eq!(p[4], [0.5, 0.0, 1.5]);
    }

    #[test]
    fn test_paint_brush_cycle_reports_counts() {
        let config = GridConfig {
            brush_index: 1,
            ..unit_config()
        };
        let mut grid = TileGrid::new(&config);
        let floor = FlatFloor(0.0);
        grid.paint_cell(Vec3::new(5.0, 0.0, 5.0), &config, &floor).unwrap();

        let report = grid.paint(Vec3::new(5.0, 0.0, 5.0), &config, &floor).unwrap();
        assert_eq!(report.added, 8);
        assert_eq!(report.unchanged, 1);
        assert!(report.changed());
        assert_eq!(grid.tile_count(), 9);
    }

    #[test]
    fn test_erase_brush_cycle_reports_counts() {
        let config = GridConfig {
            brush_index: 1,
            ..unit_config()
        };
        let mut grid = TileGrid::new(&config);
        grid.paint(Vec3::ZERO, &config, &FlatFloor(0.0)).unwrap();
        let report = grid.erase(Vec3::new(1.0, 0.0, 0.0), &config);
        // Brush at x=1 overlaps columns 0 and 1 of the painted 3x3.
        assert_eq!(report.removed, 6);
        assert_eq!(report.unchanged, 3);
        assert_eq!(grid.tile_count(), 3);
        assert_eq!(grid.mesh().quad_count(), 3);
    }

    #[test]
    fn test_paint_over_void_reports_skips() {
        let config = GridConfig {
            brush_index: 1,
            ..unit_config()
        };
        let mut grid = TileGrid::new(&config);
        let report = grid.paint(Vec3::ZERO, &config, &Void).unwrap();
        assert_eq!(report.skipped_no_floor, 9);
        assert!(!report.changed());
    }

    #[test]
    fn test_fractional_pitch_brushes_share_cells() {
        let config = GridConfig {
            tile_size: 0.01,
            tile_scale: 0.01,
            brush_index: 7,
            ..unit_config()
        };
        let mut grid = TileGrid::new(&config);
        let floor = FlatFloor(0.0);
        grid.paint(Vec3::new(-0.05, 0.0, 0.0), &config, &floor).unwrap();
        assert_eq!(grid.tile_count(), 225);

        let single = GridConfig {
            brush_index: 0,
            ..config
        };
        let report = grid.paint(Vec3::ZERO, &single, &floor).unwrap();
        assert_eq!(report.unchanged, 1);
        assert_eq!(grid.tile_count(), 225);
        assert_eq!(grid.erase(Vec3::ZERO, &single).removed, 1);
        assert_eq!(grid.tile_count(), 224);
    }

    #[test]
    fn test_take_dirty_resets_flag() {
        let config = unit_config();
        let mut grid = TileGrid::new(&config);
        grid.paint_cell(Vec3::ZERO, &config, &FlatFloor(0.0)).unwrap();
        assert!(grid.take_dirty());
        assert!(!grid.take_dirty());
    }

    #[test]
    fn test_clear_empties_tiles_and_mesh() {
        let config = unit_config();
        let mut grid = TileGrid::new(&config);
        grid.paint_cell(Vec3::ZERO, &config, &FlatFloor(0.0)).unwrap();
        grid.clear();
        assert_eq!(grid.tile_count(), 0);
        assert!(grid.mesh().is_empty());
        assert!(grid.is_dirty());
    }

    #[test]
    fn test_from_tiles_redraws_stored_tiles() {
        let config = unit_config();
        let mut tiles = TileSet::new();
        tiles.append(Vec3::new(0.0, 1.0, 0.0));
        tiles.append(Vec3::new(2.0, 0.0, 3.0));
        let grid = TileGrid::from_tiles(tiles, &config).unwrap();
        assert_eq!(grid.mesh().quad_count(), 2);
        assert_eq!(grid.mesh().positions()[0], [0.5, 1.0, 0.5]);
        assert_eq!(grid.mesh().positions()[4], [2.5, 0.0, 3.5]);
        assert!(grid.is_dirty());
    }

    #[test]
    fn test_rebuild_applies_new_scale_and_offset_to_all() {
        let mut config = unit_config();
        let mut grid = TileGrid::new(&config);
        grid.paint_cell(Vec3::ZERO, &config, &FlatFloor(0.0)).unwrap();
        grid.paint_cell(Vec3::X, &config, &FlatFloor(0.0)).unwrap();

        config.tile_scale = 0.5;
        config.y_offset = 0.1;
        grid.rebuild(&config).unwrap();

        assert_eq!(grid.mesh().half_extent(), 0.25);
        assert_eq!(grid.mesh().quad_count(), 2);
        assert_eq!(grid.mesh().positions()[0], [0.25, 0.1, 0.25]);
        assert_eq!(grid.mesh().positions()[4], [1.25, 0.1, 0.25]);
        // Erasing still finds quads drawn by the rebuild.
        assert_eq!(grid.erase_cell(Vec3::X), CellOutcome::Removed);
        assert_eq!(grid.mesh().quad_count(), 1);
    }
}
