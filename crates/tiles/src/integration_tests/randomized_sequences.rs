//! Seeded random paint/erase sessions. After every step the tile set and
//! mesh must still correspond block for block, and the tile set must match a
//! simple model of which cells are painted.

use std::collections::BTreeSet;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::GridConfig;
use crate::grid_mapper::{align_to_grid, GridMapper, RayHit, SceneQuery};
use crate::invariants::check_tile_mesh_invariants;
use crate::test_harness::TestGrid;
use crate::tile_grid::TileGrid;

struct Ground;

impl SceneQuery for Ground {
    fn cast_ray(&self, origin: Vec3, _direction: Vec3, _max_distance: f32) -> Vec<RayHit> {
        vec![RayHit {
            point: Vec3::new(origin.x, 0.0, origin.z),
            distance: origin.y,
            layer: 0,
            tag: "Untagged".to_string(),
        }]
    }
}

fn cell(x: i32, z: i32) -> Vec3 {
    Vec3::new(x as f32, 0.0, z as f32)
}

#[test]
fn random_cell_edits_match_model() {
    for seed in [1_u64, 7, 42, 1234] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let config = GridConfig::default();
        let mut grid = TileGrid::new(&config);
        let mut model = BTreeSet::new();

        for step in 0..400 {
            let (x, z) = (rng.gen_range(-6..=6), rng.gen_range(-6..=6));
            if rng.gen_bool(0.6) {
                grid.paint_cell(cell(x, z), &config, &Ground).unwrap();
                model.insert((x, z));
            } else {
                grid.erase_cell(cell(x, z));
                model.remove(&(x, z));
            }
            let violations = check_tile_mesh_invariants(&grid);
            assert!(
                violations.is_empty(),
                "seed {seed} step {step}: {violations:?}"
            );
            assert_eq!(grid.tile_count(), model.len(), "seed {seed} step {step}");
        }

        for &(x, z) in &model {
            assert!(grid.contains_tile_at(cell(x, z)), "seed {seed}: lost ({x}, {z})");
        }
    }
}

#[test]
fn random_brush_cycles_keep_mesh_in_step() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xC0FFEE);
    let mut config = GridConfig {
        tile_scale: 0.9,
        ..Default::default()
    };
    let mut grid = TileGrid::new(&config);

    for step in 0..150 {
        config.brush_index = rng.gen_range(0..=3);
        let center = cell(rng.gen_range(-10..=10), rng.gen_range(-10..=10));
        if rng.gen_bool(0.55) {
            grid.paint(center, &config, &Ground).unwrap();
        } else {
            grid.erase(center, &config);
        }
        assert_eq!(
            check_tile_mesh_invariants(&grid),
            Vec::new(),
            "step {step}"
        );
    }
}

/// Grid index of an aligned coordinate.
fn grid_index(v: f32, pitch: f32) -> i32 {
    (v / pitch).round() as i32
}

#[test]
fn random_fractional_pitch_brush_cycles_match_model() {
    for (seed, pitch) in [(3_u64, 0.1_f32), (11, 0.25), (29, 0.01), (57, 0.3)] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut config = GridConfig {
            tile_size: pitch,
            tile_scale: pitch * 0.9,
            ..Default::default()
        };
        let mut grid = TileGrid::new(&config);
        let mut model = BTreeSet::new();

        for step in 0..120 {
            config.brush_index = rng.gen_range(0..=3);
            let radius = config.brush_radius();
            let point = Vec3::new(
                rng.gen_range(-12.0..12.0) * pitch,
                0.0,
                rng.gen_range(-12.0..12.0) * pitch,
            );
            let center = GridMapper::new(&config).align(point);
            let (ix, iz) = (grid_index(center.x, pitch), grid_index(center.z, pitch));
            let paint = rng.gen_bool(0.6);
            if paint {
                grid.paint(center, &config, &Ground).unwrap();
            } else {
                grid.erase(center, &config);
            }
            for dx in -radius..=radius {
                for dz in -radius..=radius {
                    if paint {
                        model.insert((ix + dx, iz + dz));
                    } else {
                        model.remove(&(ix + dx, iz + dz));
                    }
                }
            }
            assert_eq!(
                grid.tile_count(),
                model.len(),
                "pitch {pitch} seed {seed} step {step}"
            );
            assert!(check_tile_mesh_invariants(&grid).is_empty());
        }

        for &(x, z) in &model {
            let anchor = align_to_grid(Vec3::new(x as f32 * pitch, 0.0, z as f32 * pitch), pitch);
            assert!(
                grid.contains_tile_at(anchor),
                "pitch {pitch}: lost ({x}, {z})"
            );
        }
    }
}

#[test]
fn random_rebuilds_preserve_tile_order() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut config = GridConfig::default();
    let mut grid = TileGrid::new(&config);

    for _ in 0..60 {
        grid.paint_cell(cell(rng.gen_range(-8..=8), rng.gen_range(-8..=8)), &config, &Ground)
            .unwrap();
    }
    let before: Vec<Vec3> = grid.tiles().iter().collect();

    for _ in 0..5 {
        config.tile_scale = rng.gen_range(0.2..1.0);
        config.y_offset = rng.gen_range(0.0..0.1);
        grid.rebuild(&config).unwrap();
        assert!(check_tile_mesh_invariants(&grid).is_empty());
    }
    let after: Vec<Vec3> = grid.tiles().iter().collect();
    assert_eq!(before, after);
}

#[test]
fn random_pointer_session_through_app() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut session = TestGrid::new().with_ground(30.0);

    for _ in 0..40 {
        session.config_mut().brush_index = rng.gen_range(0..=2);
        let erase = rng.gen_bool(0.3);
        let (x, z) = (rng.gen_range(-12.0..12.0), rng.gen_range(-12.0..12.0));
        if erase {
            session.press_erase(x, z);
        } else {
            session.press(x, z);
        }
        for _ in 0..rng.gen_range(0..4) {
            let (dx, dz) = (rng.gen_range(-1.5..1.5), rng.gen_range(-1.5..1.5));
            session.drag(x + dx, z + dz);
        }
        session.release();
        session.assert_consistent();
    }
    assert_eq!(session.logged_violations(), 0);
}
