//! # TestGrid: headless harness for the grid designer
//!
//! Wraps a `bevy::app::App` with `MinimalPlugins` and `TilesPlugin<StubScene>`
//! so paint sessions can be driven through real events and schedules without
//! a window or renderer.

use bevy::app::App;
use bevy::prelude::*;

use crate::config::GridConfig;
use crate::grid_mapper::{RayHit, SceneQuery};
use crate::invariants::{check_tile_mesh_invariants, InvariantViolation, TileMeshViolations};
use crate::paint_tool::{PaintInput, PaintTool, PaintToolState};
use crate::tile_file::TileFile;
use crate::tile_grid::TileGrid;
use crate::{GridCommand, TilesPlugin};

/// Axis-aligned horizontal rectangle the floor probe can land on.
#[derive(Debug, Clone, PartialEq)]
pub struct StubFloor {
    pub min: Vec2,
    pub max: Vec2,
    pub height: f32,
    pub layer: u8,
    pub tag: String,
}

impl StubFloor {
    pub fn new(min: Vec2, max: Vec2, height: f32) -> Self {
        Self {
            min,
            max,
            height,
            layer: 0,
            tag: "Untagged".to_string(),
        }
    }

    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    fn covers(&self, x: f32, z: f32) -> bool {
        (self.min.x..=self.max.x).contains(&x) && (self.min.y..=self.max.y).contains(&z)
    }
}

/// Scene made of flat floors, answering vertical rays only.
#[derive(Resource, Debug, Clone, Default)]
pub struct StubScene {
    pub floors: Vec<StubFloor>,
}

impl SceneQuery for StubScene {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit> {
        if direction != Vec3::NEG_Y {
            return Vec::new();
        }
        self.floors
            .iter()
            .filter(|f| f.covers(origin.x, origin.z))
            .filter_map(|f| {
                let distance = origin.y - f.height;
                (0.0..=max_distance).contains(&distance).then(|| RayHit {
                    point: Vec3::new(origin.x, f.height, origin.z),
                    distance,
                    layer: f.layer,
                    tag: f.tag.clone(),
                })
            })
            .collect()
    }
}

/// A headless designer session.
///
/// Builder methods set up the config and scene; `press` / `drag` / `release`
/// feed pointer input and run one update each, after which the grid can be
/// inspected.
pub struct TestGrid {
    app: App,
}

impl Default for TestGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl TestGrid {
    /// Default config over an empty scene.
    pub fn new() -> Self {
        Self::with_config(GridConfig::default())
    }

    pub fn with_config(config: GridConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(config);
        app.add_plugins(TilesPlugin::<StubScene>::default());
        Self { app }
    }

    /// Session whose tiles are loaded from and saved to `file`.
    pub fn with_tile_file(config: GridConfig, file: TileFile) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(config);
        app.insert_resource(file);
        app.add_plugins(TilesPlugin::<StubScene>::default());
        Self { app }
    }

    /// Add a floor spanning `[min, max]` in X/Z at `height`.
    pub fn with_floor(mut self, min: Vec2, max: Vec2, height: f32) -> Self {
        self.add_floor(StubFloor::new(min, max, height));
        self
    }

    /// Ground plane at height 0 covering ±`half` in X and Z.
    pub fn with_ground(self, half: f32) -> Self {
        self.with_floor(Vec2::splat(-half), Vec2::splat(half), 0.0)
    }

    pub fn add_floor(&mut self, floor: StubFloor) {
        self.app
            .world_mut()
            .resource_mut::<StubScene>()
            .floors
            .push(floor);
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    pub fn send_input(&mut self, input: PaintInput) -> &mut Self {
        self.app.world_mut().send_event(input);
        self.app.update();
        self
    }

    pub fn press(&mut self, x: f32, z: f32) -> &mut Self {
        self.send_input(PaintInput::Pressed {
            point: Vec3::new(x, 0.0, z),
            modifier: false,
        })
    }

    /// Press with the erase modifier held.
    pub fn press_erase(&mut self, x: f32, z: f32) -> &mut Self {
        self.send_input(PaintInput::Pressed {
            point: Vec3::new(x, 0.0, z),
            modifier: true,
        })
    }

    pub fn drag(&mut self, x: f32, z: f32) -> &mut Self {
        self.send_input(PaintInput::Moved {
            point: Vec3::new(x, 0.0, z),
        })
    }

    pub fn release(&mut self) -> &mut Self {
        self.send_input(PaintInput::Released)
    }

    /// Press, release: one brush cycle.
    pub fn click(&mut self, x: f32, z: f32) -> &mut Self {
        self.press(x, z).release()
    }

    pub fn click_erase(&mut self, x: f32, z: f32) -> &mut Self {
        self.press_erase(x, z).release()
    }

    pub fn command(&mut self, command: GridCommand) -> &mut Self {
        self.app.world_mut().send_event(command);
        self.app.update();
        self
    }

    pub fn update(&mut self) -> &mut Self {
        self.app.update();
        self
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    pub fn app(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn grid(&self) -> &TileGrid {
        self.app.world().resource::<TileGrid>()
    }

    pub fn config(&self) -> &GridConfig {
        self.app.world().resource::<GridConfig>()
    }

    pub fn config_mut(&mut self) -> Mut<'_, GridConfig> {
        self.app.world_mut().resource_mut::<GridConfig>()
    }

    pub fn tool_state(&self) -> PaintToolState {
        self.app.world().resource::<PaintTool>().state()
    }

    pub fn tile_count(&self) -> usize {
        self.grid().tile_count()
    }

    pub fn has_tile(&self, x: f32, z: f32) -> bool {
        self.grid().contains_tile_at(Vec3::new(x, 0.0, z))
    }

    /// Height the tile in cell (x, z) was painted at.
    pub fn tile_height(&self, x: f32, z: f32) -> Option<f32> {
        let tiles = self.grid().tiles();
        tiles
            .index_of(Vec3::new(x, 0.0, z))
            .and_then(|i| tiles.get(i))
            .map(|t| t.y)
    }

    pub fn violations(&self) -> Vec<InvariantViolation> {
        check_tile_mesh_invariants(self.grid())
    }

    /// Violation count recorded by the in-app validation system.
    pub fn logged_violations(&self) -> usize {
        self.app.world().resource::<TileMeshViolations>().last_count
    }

    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    pub fn assert_consistent(&self) {
        let violations = self.violations();
        assert!(
            violations.is_empty(),
            "tile mesh out of step with tiles: {violations:?}"
        );
    }
}
