//! Floor probing through the full paint pipeline: stacked floors, filters,
//! vertical snapping and cells with nothing underneath.

use bevy::prelude::*;

use crate::config::{GridConfig, LayerMask, BRUSH_TAG};
use crate::test_harness::{StubFloor, TestGrid};

#[test]
fn tile_takes_height_of_highest_floor() {
    let mut grid = TestGrid::new()
        .with_ground(10.0)
        .with_floor(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0), 3.5);
    grid.click(0.0, 0.0).click(5.0, 5.0);
    assert_eq!(grid.tile_height(0.0, 0.0), Some(3.5));
    assert_eq!(grid.tile_height(5.0, 5.0), Some(0.0));
    // Quad is drawn at floor height plus the vertical offset.
    let y = grid.grid().mesh().positions()[0][1];
    assert!((y - 3.51).abs() < 1e-5);
}

#[test]
fn cells_without_floor_are_skipped() {
    let config = GridConfig {
        brush_index: 1,
        ..Default::default()
    };
    // Floor only covers x >= 0.
    let mut grid = TestGrid::with_config(config)
        .with_floor(Vec2::new(-0.1, -5.0), Vec2::new(5.0, 5.0), 0.0);
    grid.click(0.0, 0.0);
    assert_eq!(grid.tile_count(), 6);
    assert!(!grid.has_tile(-1.0, 0.0));
    assert!(grid.has_tile(1.0, 1.0));
    grid.assert_consistent();
}

#[test]
fn ignored_layer_is_seen_through() {
    let config = GridConfig {
        ignored_layers: LayerMask::from_layers(&[8]),
        ..Default::default()
    };
    let mut grid = TestGrid::with_config(config).with_ground(10.0);
    grid.add_floor(StubFloor::new(Vec2::splat(-2.0), Vec2::splat(2.0), 4.0).with_layer(8));
    grid.click(0.0, 0.0);
    assert_eq!(grid.tile_height(0.0, 0.0), Some(0.0));
}

#[test]
fn ignored_tag_is_seen_through() {
    let config = GridConfig {
        ignored_tags: vec!["Canopy".to_string()],
        ..Default::default()
    };
    let mut grid = TestGrid::with_config(config).with_ground(10.0);
    grid.add_floor(StubFloor::new(Vec2::splat(-2.0), Vec2::splat(2.0), 6.0).with_tag("Canopy"));
    grid.click(1.0, 1.0);
    assert_eq!(grid.tile_height(1.0, 1.0), Some(0.0));
}

#[test]
fn brush_cursor_is_never_a_floor() {
    let mut grid = TestGrid::new().with_ground(10.0);
    grid.add_floor(StubFloor::new(Vec2::splat(-1.0), Vec2::splat(1.0), 0.02).with_tag(BRUSH_TAG));
    grid.click(0.0, 0.0);
    assert_eq!(grid.tile_height(0.0, 0.0), Some(0.0));
}

#[test]
fn only_ignored_surfaces_means_no_floor() {
    let config = GridConfig {
        ignored_layers: LayerMask::from_layers(&[2]),
        ..Default::default()
    };
    let mut grid = TestGrid::with_config(config);
    grid.add_floor(StubFloor::new(Vec2::splat(-5.0), Vec2::splat(5.0), 0.0).with_layer(2));
    grid.click(0.0, 0.0);
    assert_eq!(grid.tile_count(), 0);
}

#[test]
fn vertical_snap_rounds_floor_height() {
    let config = GridConfig {
        align_y: true,
        tile_size: 0.5,
        ..Default::default()
    };
    let mut grid = TestGrid::with_config(config)
        .with_floor(Vec2::splat(-5.0), Vec2::splat(5.0), 1.3);
    grid.click(0.0, 0.0);
    assert_eq!(grid.tile_height(0.0, 0.0), Some(1.5));
}

#[test]
fn floor_out_of_probe_reach_is_missed() {
    // Probe starts 50 above the cursor and reaches 100 down.
    let mut grid = TestGrid::new().with_floor(Vec2::splat(-5.0), Vec2::splat(5.0), -75.0);
    grid.click(0.0, 0.0);
    assert_eq!(grid.tile_count(), 0);
}

#[test]
fn erase_ignores_tile_height() {
    let mut grid = TestGrid::new().with_floor(Vec2::splat(-5.0), Vec2::splat(5.0), 2.0);
    grid.click(1.0, 1.0);
    assert_eq!(grid.tile_height(1.0, 1.0), Some(2.0));
    grid.click_erase(1.0, 1.0);
    assert_eq!(grid.tile_count(), 0);
    grid.assert_consistent();
}
